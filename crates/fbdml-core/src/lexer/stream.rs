//! Markable character cursor over the statement text.

use core::cmp::Ordering;

/// Result of looking at a position relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// A character, ASCII-lowercased.
    Char(char),
    /// The position lies past the end of the input.
    Eof,
    /// The position is not defined (offset zero, or before the start).
    Undefined,
}

impl Lookahead {
    /// Returns true if this is exactly the character `c`.
    #[must_use]
    pub const fn is(self, c: char) -> bool {
        matches!(self, Self::Char(x) if x == c)
    }

    /// Returns the character, if any.
    #[must_use]
    pub const fn char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Eof | Self::Undefined => None,
        }
    }

    /// Returns true for an ASCII digit.
    #[must_use]
    pub const fn is_digit(self) -> bool {
        matches!(self, Self::Char(c) if c.is_ascii_digit())
    }

    /// Returns true if the character satisfies `predicate`.
    pub fn is_some_and(self, predicate: impl FnOnce(char) -> bool) -> bool {
        self.char().is_some_and(predicate)
    }
}

/// A checkpoint produced by [`CharStream::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
}

/// A case-insensitive, rewindable cursor over the raw statement text.
///
/// Lookahead is reported ASCII-lowercased so keyword rules can compare
/// against a single spelling; the original text is recovered by slicing
/// the input with byte offsets from [`CharStream::index`].
pub struct CharStream<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> CharStream<'a> {
    /// Creates a stream positioned at the first character of `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    /// Looks at the character `i` positions away from the cursor.
    ///
    /// `la(1)` is the next character to be consumed, `la(-1)` the one
    /// consumed last. `la(0)` is always [`Lookahead::Undefined`].
    #[must_use]
    pub fn la(&self, i: isize) -> Lookahead {
        let index = match i.cmp(&0) {
            Ordering::Equal => return Lookahead::Undefined,
            Ordering::Greater => self.pos + i.unsigned_abs() - 1,
            Ordering::Less => match self.pos.checked_sub(i.unsigned_abs()) {
                Some(index) => index,
                None => return Lookahead::Undefined,
            },
        };
        self.chars
            .get(index)
            .map_or(Lookahead::Eof, |&(_, c)| Lookahead::Char(c.to_ascii_lowercase()))
    }

    /// Returns the next character as written, without case folding.
    #[must_use]
    pub fn original(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    /// Advances past one character. Does nothing at end of input.
    pub fn consume(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    /// Consumes `text` if the upcoming characters match it case-insensitively.
    ///
    /// Nothing is consumed on a partial match.
    pub fn match_str(&mut self, text: &str) -> bool {
        let matches = text
            .chars()
            .zip(1_isize..)
            .all(|(expected, i)| self.la(i).is(expected.to_ascii_lowercase()));
        if matches {
            for _ in text.chars() {
                self.consume();
            }
        }
        matches
    }

    /// Records the current position.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark { pos: self.pos }
    }

    /// Returns to a position recorded by [`CharStream::mark`].
    pub fn rewind(&mut self, mark: Mark) {
        self.pos = mark.pos;
    }

    /// Runs `attempt` from the current position and rewinds unless it
    /// reports success.
    ///
    /// Attempts may nest; each level restores only its own checkpoint.
    pub fn speculate(&mut self, attempt: impl FnOnce(&mut Self) -> bool) -> bool {
        let mark = self.mark();
        let matched = attempt(self);
        if !matched {
            self.rewind(mark);
        }
        matched
    }

    /// Returns the byte offset of the next character.
    #[must_use]
    pub fn index(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.input.len(), |&(offset, _)| offset)
    }

    /// Returns true when every character has been consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Returns the original text between two byte offsets.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookahead_is_lowercased() {
        let stream = CharStream::new("InSeRt");
        assert_eq!(stream.la(1), Lookahead::Char('i'));
        assert_eq!(stream.la(2), Lookahead::Char('n'));
        assert_eq!(stream.la(3), Lookahead::Char('s'));
        assert_eq!(stream.slice(0, 6), "InSeRt");
        assert_eq!(stream.original(), Some('I'));
    }

    #[test]
    fn test_lookahead_sentinels() {
        let mut stream = CharStream::new("ab");
        assert_eq!(stream.la(0), Lookahead::Undefined);
        assert_eq!(stream.la(-1), Lookahead::Undefined);
        assert_eq!(stream.la(3), Lookahead::Eof);
        stream.consume();
        assert_eq!(stream.la(-1), Lookahead::Char('a'));
        stream.consume();
        stream.consume();
        assert!(stream.is_eof());
        assert_eq!(stream.la(1), Lookahead::Eof);
        assert_eq!(stream.index(), 2);
    }

    #[test]
    fn test_mark_and_rewind() {
        let mut stream = CharStream::new("abc");
        let mark = stream.mark();
        stream.consume();
        stream.consume();
        assert_eq!(stream.la(1), Lookahead::Char('c'));
        stream.rewind(mark);
        assert_eq!(stream.la(1), Lookahead::Char('a'));
    }

    #[test]
    fn test_nested_speculation() {
        let mut stream = CharStream::new("abcd");
        let outer = stream.speculate(|s| {
            s.consume();
            let inner = s.speculate(|s| {
                s.consume();
                s.la(1).is('x')
            });
            assert!(!inner);
            assert_eq!(s.la(1), Lookahead::Char('b'));
            s.consume();
            true
        });
        assert!(outer);
        assert_eq!(stream.la(1), Lookahead::Char('c'));
    }

    #[test]
    fn test_match_str_is_all_or_nothing() {
        let mut stream = CharStream::new("''x");
        assert!(!stream.match_str("'''"));
        assert_eq!(stream.index(), 0);
        assert!(stream.match_str("''"));
        assert_eq!(stream.index(), 2);
    }

    #[test]
    fn test_index_is_byte_offset() {
        let mut stream = CharStream::new("\u{0442}a");
        stream.consume();
        assert_eq!(stream.index(), 2);
        assert_eq!(stream.la(1), Lookahead::Char('a'));
    }
}
