//! DML Lexer/Tokenizer
//!
//! A hand-written lexer over a rewindable character stream. Keywords are
//! matched case-insensitively; identifiers and literals keep their source
//! spelling through token spans.

mod span;
mod stream;
mod token;
mod tokenizer;

pub use span::Span;
pub use stream::{CharStream, Lookahead, Mark};
pub use token::{Channel, Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
