//! DML Parser
//!
//! A hand-written recursive descent parser with Pratt value parsing,
//! single-token error recovery and speculative sub-parses.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::{MAX_DEPTH, Parser};
