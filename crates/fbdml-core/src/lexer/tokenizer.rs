//! DML tokenizer implementation.

use super::stream::{CharStream, Lookahead};
use super::{Keyword, Span, Token, TokenKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

const STRING_ESCAPE: &str = "''";
const IDENTIFIER_ESCAPE: &str = "\"\"";

/// A lexer that tokenizes a single DML statement.
///
/// Whitespace and comments are emitted on the hidden channel. Input that
/// matches no rule becomes an [`TokenKind::Error`] token and a lexical
/// diagnostic; scanning then resumes after it.
pub struct Lexer<'a> {
    /// Cursor over the statement text.
    stream: CharStream<'a>,
    /// The byte position of the start of the current token.
    start: usize,
    /// Lexical problems found so far.
    diagnostics: Diagnostics,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            stream: CharStream::new(input),
            start: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    fn la(&self, i: isize) -> Lookahead {
        self.stream.la(i)
    }

    fn consume(&mut self) {
        self.stream.consume();
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.la(1).is_some_and(&predicate) {
            self.consume();
        }
    }

    /// Creates a span from start to current position.
    fn make_span(&self) -> Span {
        Span::new(self.start, self.stream.index())
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Returns the text of the token scanned so far.
    fn text(&self) -> &'a str {
        self.stream.slice(self.start, self.stream.index())
    }

    /// Returns the text between a prefix of `prefix` bytes and the closing quote.
    fn inner_text(&self, prefix: usize) -> &'a str {
        let end = self.stream.index().saturating_sub(1);
        self.stream.slice(self.start + prefix, end)
    }

    /// Records a lexical diagnostic and returns the matching error token.
    fn error(&mut self, message: String) -> Token {
        let span = self.make_span();
        self.diagnostics.record(DiagnosticKind::Lexical, message.clone(), span);
        Token::new(TokenKind::Error(message), span)
    }

    /// Returns true if a number starts `offset` characters ahead.
    fn number_ahead(&self, offset: isize) -> bool {
        self.la(offset).is_digit() || (self.la(offset).is('.') && self.la(offset + 1).is_digit())
    }

    /// Consumes a literal delimited by `quote` in which `escape` stands for
    /// one quote character.
    ///
    /// Returns false if the input ends before the closing quote.
    fn scan_delimited(&mut self, quote: char, escape: &str) -> bool {
        self.consume();
        loop {
            match self.la(1) {
                Lookahead::Char(c) if c == quote => {
                    if !self.stream.speculate(|s| s.match_str(escape)) {
                        self.consume();
                        return true;
                    }
                }
                Lookahead::Char(_) => self.consume(),
                Lookahead::Eof | Lookahead::Undefined => return false,
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        self.consume();
        self.consume_while(is_identifier_part);

        let text = self.text();
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_owned())),
        }
    }

    /// Scans a double-quoted identifier.
    fn scan_quoted_identifier(&mut self) -> Token {
        if !self.scan_delimited('"', IDENTIFIER_ESCAPE) {
            return self.error(String::from("unterminated quoted identifier"));
        }
        let name = self.inner_text(1).replace(IDENTIFIER_ESCAPE, "\"");
        self.make_token(TokenKind::QuotedIdentifier(name))
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> Token {
        if !self.scan_delimited('\'', STRING_ESCAPE) {
            return self.error(String::from("unterminated string literal"));
        }
        let value = self.inner_text(1).replace(STRING_ESCAPE, "'");
        self.make_token(TokenKind::String(value))
    }

    /// Scans an alternative-quoting string (e.g., `q'{it's}'`).
    fn scan_q_string(&mut self) -> Token {
        self.consume(); // q
        self.consume(); // '
        let Some(open) = self.stream.original() else {
            return self.error(String::from("unterminated string literal"));
        };
        let close = match open {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            '<' => '>',
            c => c,
        };
        self.consume();

        let content_start = self.stream.index();
        loop {
            match self.stream.original() {
                Some(c) if c == close && self.la(2).is('\'') => {
                    let value = self.stream.slice(content_start, self.stream.index());
                    self.consume();
                    self.consume();
                    return self.make_token(TokenKind::String(value.to_owned()));
                }
                Some(_) => self.consume(),
                None => return self.error(String::from("unterminated string literal")),
            }
        }
    }

    /// Scans a binary string literal (e.g., `x'0AFF'`).
    fn scan_binary_string(&mut self) -> Token {
        self.consume(); // x
        if !self.scan_delimited('\'', STRING_ESCAPE) {
            return self.error(String::from("unterminated binary string literal"));
        }
        let digits = self.inner_text(2);
        if digits.len() % 2 != 0 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return self.error(format!("invalid binary string literal x'{digits}'"));
        }
        self.make_token(TokenKind::String(digits.to_owned()))
    }

    /// Scans an integer or real literal, with an optional leading minus.
    fn scan_number(&mut self) -> Token {
        if self.la(1).is('-') {
            self.consume();
        }
        self.consume_while(|c| c.is_ascii_digit());

        if self.la(1).is('.') && self.la(2).is_digit() {
            self.consume();
            self.consume_while(|c| c.is_ascii_digit());
            return self.make_token(TokenKind::Real);
        }
        self.make_token(TokenKind::Integer)
    }

    /// Scans a `--` comment up to the end of the line.
    fn scan_line_comment(&mut self) -> Token {
        self.consume();
        self.consume();
        self.consume_while(|c| c != '\n' && c != '\r');
        self.make_token(TokenKind::Comment)
    }

    /// Scans a `/* ... */` comment.
    fn scan_block_comment(&mut self) -> Token {
        self.consume();
        self.consume();
        loop {
            match self.la(1) {
                Lookahead::Char('*') if self.la(2).is('/') => {
                    self.consume();
                    self.consume();
                    return self.make_token(TokenKind::Comment);
                }
                Lookahead::Char(_) => self.consume(),
                Lookahead::Eof | Lookahead::Undefined => {
                    return self.error(String::from("unterminated block comment"));
                }
            }
        }
    }

    /// Scans punctuation and operators.
    fn scan_operator(&mut self, c: char) -> Token {
        self.consume();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '?' => TokenKind::Question,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Eq,
            '|' if self.la(1).is('|') => {
                self.consume();
                TokenKind::Concat
            }
            '<' if self.la(1).is('=') => {
                self.consume();
                TokenKind::LtEq
            }
            '<' if self.la(1).is('>') => {
                self.consume();
                TokenKind::NotEq
            }
            '<' => TokenKind::Lt,
            '>' if self.la(1).is('=') => {
                self.consume();
                TokenKind::GtEq
            }
            '>' => TokenKind::Gt,
            '!' | '^' | '~' if self.la(1).is('=') => {
                self.consume();
                TokenKind::NotEq
            }
            _ => {
                let found = self.text();
                return self.error(format!("unexpected character '{found}'"));
            }
        };
        self.make_token(kind)
    }

    /// Scans the next token, hidden or not.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.start = self.stream.index();

        let c = match self.la(1) {
            Lookahead::Char(c) => c,
            Lookahead::Eof | Lookahead::Undefined => return self.make_token(TokenKind::Eof),
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_while(is_whitespace);
                self.make_token(TokenKind::Whitespace)
            }
            '-' if self.la(2).is('-') => self.scan_line_comment(),
            '/' if self.la(2).is('*') => self.scan_block_comment(),
            '-' if self.number_ahead(2) => self.scan_number(),
            '.' if self.la(2).is_digit() => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier(),
            'q' if self.la(2).is('\'') => self.scan_q_string(),
            'x' if self.la(2).is('\'') => self.scan_binary_string(),
            // A lone colon is punctuation; followed by a name it starts one.
            ':' if !self.la(2).is_some_and(is_identifier_part) => self.scan_operator(c),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => self.scan_operator(c),
        }
    }

    /// Tokenizes the entire input, dropping hidden tokens.
    ///
    /// The returned vector always ends with an EOF token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.collect_tokens(false)
    }

    /// Tokenizes the entire input, keeping whitespace and comments.
    #[must_use]
    pub fn tokenize_all(&mut self) -> Vec<Token> {
        self.collect_tokens(true)
    }

    fn collect_tokens(&mut self, keep_hidden: bool) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            if keep_hidden || !token.is_hidden() {
                tokens.push(token);
            }
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Returns the lexical diagnostics recorded so far.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes the lexer, handing its diagnostics over to the caller.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{000C}')
}

const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, '_' | ':' | '$')
}

const fn is_identifier_part(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | ':' | '$' | '-')
}
