mod ast;
mod expr;
mod parser;
mod stmt;

pub use ast::*;
pub use parser::*;
