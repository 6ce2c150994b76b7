pub mod analyzer;
pub mod error;
pub mod midcode;
pub mod parser;
pub mod token;

use std::io::Write;

pub use error::{CompileError, ParseError};
use parser::{Compilation, Parser};
use token::{read_listing, Token};

pub fn compile(tokens: Vec<Token>) -> Result<Compilation, ParseError> {
    Parser::new(tokens).parse()
}

/// Like [`compile`], also writing each instruction to `trace` as it is
/// emitted.
pub fn compile_with_trace<W: Write>(
    tokens: Vec<Token>,
    trace: W,
) -> Result<Compilation, ParseError> {
    Parser::with_trace(tokens, trace).parse()
}

/// Compiles a token listing as produced by the scanner.
pub fn compile_listing(listing: &str) -> Result<Compilation, CompileError> {
    let tokens = read_listing(listing)?;
    Ok(compile(tokens)?)
}
