//! Mismatch bookkeeping shared by the lexer and the parser.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::lexer::Span;

/// How a problem in the statement was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DiagnosticKind {
    /// Unrecognized character or unterminated literal; the lexer skipped it.
    Lexical,
    /// A stray token was dropped or a missing one assumed; parsing went on.
    RecoverableMismatch,
    /// The grammar could not continue; the parser skipped to the statement end.
    Syntax,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical => "lexical error",
            Self::RecoverableMismatch => "recovered",
            Self::Syntax => "syntax error",
        })
    }
}

/// A single recorded problem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at position {}..{}",
            self.kind, self.message, self.span.start, self.span.end
        )
    }
}

/// Mismatch counter and ordered messages for one parse.
///
/// Every recorded diagnostic counts as a mismatch. A statement whose
/// count is non-zero must not be rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostics {
    mismatch_count: usize,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mismatch_count: 0,
            entries: Vec::new(),
        }
    }

    /// Records a diagnostic and bumps the mismatch counter.
    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.mismatch_count += 1;
        self.entries.push(Diagnostic {
            kind,
            message: message.into(),
            span,
        });
    }

    /// Returns the number of mismatches seen.
    #[must_use]
    pub const fn mismatch_count(&self) -> usize {
        self.mismatch_count
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the recorded diagnostics in the order they occurred.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Returns the diagnostics rendered as messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Returns true if any diagnostic of `kind` was recorded.
    #[must_use]
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}
