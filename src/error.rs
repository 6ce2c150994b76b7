use thiserror::Error;

use crate::token::ListingError;

/// Structural failures the engine cannot recover from locally. Semantic
/// problems are never reported here; they become diagnostics.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("token stream ended while expecting {expected}")]
    UnexpectedEof { expected: String },

    #[error("line {line}: expected {expected}, found {found} `{value}`")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: &'static str,
        value: String,
    },

    #[error("line {line}: `{literal}` is not a valid integer")]
    InvalidInteger { line: usize, literal: String },

    #[error("failed to write midcode trace")]
    Trace(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("bad token listing: {0}")]
    Listing(#[from] ListingError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
