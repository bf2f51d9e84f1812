//! Parser error types.

use core::fmt::Display;

use crate::lexer::{Span, TokenKind};

/// A parse error.
///
/// Only [`ParseError::Empty`], [`ParseError::Unsupported`] and
/// [`ParseError::TooDeep`] ever reach callers of [`crate::parse`]. A
/// [`ParseError::Syntax`] raised inside a rule is turned into a diagnostic
/// at the statement level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The statement contains no tokens.
    #[error("Empty statement")]
    Empty,

    /// The statement does not start with a supported DML keyword.
    #[error(
        "Unsupported statement: expected INSERT, UPDATE, or DELETE, found {found} at position {}..{}",
        .span.start,
        .span.end
    )]
    Unsupported {
        /// The first token of the statement.
        found: TokenKind,
        /// Its location.
        span: Span,
    },

    /// A grammar rule could not match the input.
    #[error("{message} at position {}..{}", .span.start, .span.end)]
    Syntax {
        /// What went wrong.
        message: String,
        /// Where it went wrong.
        span: Span,
    },

    /// Values are nested deeper than the parser accepts.
    #[error("Nesting exceeds {limit} levels at position {}..{}", .span.start, .span.end)]
    TooDeep {
        /// The nesting limit.
        limit: usize,
        /// The token at which the limit was crossed.
        span: Span,
    },
}

impl ParseError {
    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Display, found: &TokenKind, span: Span) -> Self {
        Self::Syntax {
            message: format!("Unexpected token: expected {expected}, found {found}"),
            span,
        }
    }

    /// Returns the location of the error, if it has one.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::Empty => None,
            Self::Unsupported { span, .. }
            | Self::Syntax { span, .. }
            | Self::TooDeep { span, .. } => Some(*span),
        }
    }

    /// Returns true if parsing can continue after recording this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
