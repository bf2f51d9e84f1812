//! Token types for the DML lexer.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::Span;

/// Keywords recognized by the DML grammar.
///
/// The set is closed: any other word lexes as an identifier, and a word in
/// this set can never be used as an unquoted identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Keyword {
    // Statements
    Insert,
    Into,
    Update,
    Delete,
    From,
    Set,
    Or,
    Values,
    Default,
    Matching,
    Returning,
    Select,
    Execute,
    Procedure,

    // Value expressions
    As,
    Cast,
    Collate,
    Null,
    Next,
    Value,
    For,
    GenId,
    DbKey,
    Substring,
    Trim,
    Both,
    Leading,
    Trailing,
    Extract,

    // Aggregates
    All,
    Distinct,
    Count,
    Sum,
    Avg,
    Minimum,
    Maximum,

    // Context variables
    CurrentUser,
    CurrentRole,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,

    // Data types
    Bigint,
    Blob,
    Char,
    Character,
    Date,
    Decimal,
    Double,
    Float,
    Int,
    Integer,
    Numeric,
    Precision,
    Segment,
    Size,
    Smallint,
    SubType,
    Time,
    Timestamp,
    Varchar,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INSERT" => Some(Self::Insert),
            "INTO" => Some(Self::Into),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "FROM" => Some(Self::From),
            "SET" => Some(Self::Set),
            "OR" => Some(Self::Or),
            "VALUES" => Some(Self::Values),
            "DEFAULT" => Some(Self::Default),
            "MATCHING" => Some(Self::Matching),
            "RETURNING" => Some(Self::Returning),
            "SELECT" => Some(Self::Select),
            "EXECUTE" => Some(Self::Execute),
            "PROCEDURE" => Some(Self::Procedure),
            "AS" => Some(Self::As),
            "CAST" => Some(Self::Cast),
            "COLLATE" => Some(Self::Collate),
            "NULL" => Some(Self::Null),
            "NEXT" => Some(Self::Next),
            "VALUE" => Some(Self::Value),
            "FOR" => Some(Self::For),
            "GEN_ID" => Some(Self::GenId),
            "DB_KEY" => Some(Self::DbKey),
            "SUBSTRING" => Some(Self::Substring),
            "TRIM" => Some(Self::Trim),
            "BOTH" => Some(Self::Both),
            "LEADING" => Some(Self::Leading),
            "TRAILING" => Some(Self::Trailing),
            "EXTRACT" => Some(Self::Extract),
            "ALL" => Some(Self::All),
            "DISTINCT" => Some(Self::Distinct),
            "COUNT" => Some(Self::Count),
            "SUM" => Some(Self::Sum),
            "AVG" => Some(Self::Avg),
            "MIN" => Some(Self::Minimum),
            "MAX" => Some(Self::Maximum),
            "CURRENT_USER" => Some(Self::CurrentUser),
            "CURRENT_ROLE" => Some(Self::CurrentRole),
            "CURRENT_DATE" => Some(Self::CurrentDate),
            "CURRENT_TIME" => Some(Self::CurrentTime),
            "CURRENT_TIMESTAMP" => Some(Self::CurrentTimestamp),
            "BIGINT" => Some(Self::Bigint),
            "BLOB" => Some(Self::Blob),
            "CHAR" => Some(Self::Char),
            "CHARACTER" => Some(Self::Character),
            "DATE" => Some(Self::Date),
            "DECIMAL" => Some(Self::Decimal),
            "DOUBLE" => Some(Self::Double),
            "FLOAT" => Some(Self::Float),
            "INT" => Some(Self::Int),
            "INTEGER" => Some(Self::Integer),
            "NUMERIC" => Some(Self::Numeric),
            "PRECISION" => Some(Self::Precision),
            "SEGMENT" => Some(Self::Segment),
            "SIZE" => Some(Self::Size),
            "SMALLINT" => Some(Self::Smallint),
            "SUB_TYPE" => Some(Self::SubType),
            "TIME" => Some(Self::Time),
            "TIMESTAMP" => Some(Self::Timestamp),
            "VARCHAR" => Some(Self::Varchar),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::From => "FROM",
            Self::Set => "SET",
            Self::Or => "OR",
            Self::Values => "VALUES",
            Self::Default => "DEFAULT",
            Self::Matching => "MATCHING",
            Self::Returning => "RETURNING",
            Self::Select => "SELECT",
            Self::Execute => "EXECUTE",
            Self::Procedure => "PROCEDURE",
            Self::As => "AS",
            Self::Cast => "CAST",
            Self::Collate => "COLLATE",
            Self::Null => "NULL",
            Self::Next => "NEXT",
            Self::Value => "VALUE",
            Self::For => "FOR",
            Self::GenId => "GEN_ID",
            Self::DbKey => "DB_KEY",
            Self::Substring => "SUBSTRING",
            Self::Trim => "TRIM",
            Self::Both => "BOTH",
            Self::Leading => "LEADING",
            Self::Trailing => "TRAILING",
            Self::Extract => "EXTRACT",
            Self::All => "ALL",
            Self::Distinct => "DISTINCT",
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Minimum => "MIN",
            Self::Maximum => "MAX",
            Self::CurrentUser => "CURRENT_USER",
            Self::CurrentRole => "CURRENT_ROLE",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::Bigint => "BIGINT",
            Self::Blob => "BLOB",
            Self::Char => "CHAR",
            Self::Character => "CHARACTER",
            Self::Date => "DATE",
            Self::Decimal => "DECIMAL",
            Self::Double => "DOUBLE",
            Self::Float => "FLOAT",
            Self::Int => "INT",
            Self::Integer => "INTEGER",
            Self::Numeric => "NUMERIC",
            Self::Precision => "PRECISION",
            Self::Segment => "SEGMENT",
            Self::Size => "SIZE",
            Self::Smallint => "SMALLINT",
            Self::SubType => "SUB_TYPE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Varchar => "VARCHAR",
        }
    }
}

/// The channel a token is emitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Channel {
    /// Tokens the parser consumes.
    Default,
    /// Whitespace and comments, kept for tooling but never parsed.
    Hidden,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42 or -7)
    Integer,
    /// Real literal, always with a decimal point (e.g., 3.14 or .5)
    Real,
    /// String literal with quote escapes decoded
    String(String),

    // Identifiers and keywords
    /// Unquoted identifier, original spelling kept
    Identifier(String),
    /// Double-quoted identifier with `""` decoded
    QuotedIdentifier(String),
    /// Keyword
    Keyword(Keyword),

    // Operators
    /// =
    Eq,
    /// <> != ^= ~=
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// ||
    Concat,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ?
    Question,

    // Hidden
    /// Run of whitespace
    Whitespace,
    /// `--` line comment or `/* */` block comment
    Comment,

    // Special
    /// End of input
    Eof,
    /// Unrecognized input
    Error(String),
}

impl TokenKind {
    /// Returns the channel tokens of this kind are emitted on.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Whitespace | Self::Comment => Channel::Hidden,
            _ => Channel::Default,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer literal"),
            Self::Real => f.write_str("real literal"),
            Self::String(_) => f.write_str("string literal"),
            Self::Identifier(name) => write!(f, "identifier {name}"),
            Self::QuotedIdentifier(name) => write!(f, "quoted identifier \"{name}\""),
            Self::Keyword(keyword) => f.write_str(keyword.as_str()),
            Self::Eq => f.write_str("'='"),
            Self::NotEq => f.write_str("'<>'"),
            Self::Lt => f.write_str("'<'"),
            Self::LtEq => f.write_str("'<='"),
            Self::Gt => f.write_str("'>'"),
            Self::GtEq => f.write_str("'>='"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Concat => f.write_str("'||'"),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
            Self::LeftBracket => f.write_str("'['"),
            Self::RightBracket => f.write_str("']'"),
            Self::Comma => f.write_str("','"),
            Self::Semicolon => f.write_str("';'"),
            Self::Dot => f.write_str("'.'"),
            Self::Colon => f.write_str("':'"),
            Self::Question => f.write_str("'?'"),
            Self::Whitespace => f.write_str("whitespace"),
            Self::Comment => f.write_str("comment"),
            Self::Eof => f.write_str("end of input"),
            Self::Error(message) => write!(f, "invalid input ({message})"),
        }
    }
}

/// A token with its span in the statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the statement text.
    pub span: Span,
    /// The channel the token was emitted on.
    pub channel: Channel,
}

impl Token {
    /// Creates a new token on the channel its kind belongs to.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        let channel = kind.channel();
        Self {
            kind,
            span,
            channel,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this token is on the hidden channel.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.channel, Channel::Hidden)
    }

    /// Returns true if this is a lexical error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the source text of this token.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.slice(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("INSERT"), Some(Keyword::Insert));
        assert_eq!(Keyword::from_str("insert"), Some(Keyword::Insert));
        assert_eq!(Keyword::from_str("InSeRt"), Some(Keyword::Insert));
        assert_eq!(Keyword::from_str("min"), Some(Keyword::Minimum));
        assert_eq!(Keyword::from_str("current_timestamp"), Some(Keyword::CurrentTimestamp));
        assert_eq!(Keyword::from_str("WHERE"), None);
        assert_eq!(Keyword::from_str("inserts"), None);
    }

    #[test]
    fn test_keyword_as_str_round_trips() {
        for keyword in [
            Keyword::Returning,
            Keyword::SubType,
            Keyword::GenId,
            Keyword::Maximum,
            Keyword::DbKey,
        ] {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn test_hidden_channel() {
        let ws = Token::new(TokenKind::Whitespace, Span::new(0, 1));
        let comment = Token::new(TokenKind::Comment, Span::new(1, 5));
        let comma = Token::new(TokenKind::Comma, Span::new(5, 6));
        assert!(ws.is_hidden());
        assert!(comment.is_hidden());
        assert!(!comma.is_hidden());
        assert_eq!(comma.channel, Channel::Default);
    }

    #[test]
    fn test_token_as_keyword() {
        let insert = Token::new(TokenKind::Keyword(Keyword::Insert), Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(insert.as_keyword(), Some(Keyword::Insert));
        assert_eq!(plus.as_keyword(), None);
    }

    #[test]
    fn test_token_text() {
        let sql = "INSERT INTO t";
        let token = Token::new(TokenKind::Identifier(String::from("t")), Span::new(12, 13));
        assert_eq!(token.text(sql), "t");
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Keyword(Keyword::Into).to_string(), "INTO");
        assert_eq!(TokenKind::RightParen.to_string(), "')'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
