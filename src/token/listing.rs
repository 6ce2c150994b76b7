use thiserror::Error;

use super::{Token, TokenKind};

#[derive(Debug, Error, PartialEq)]
pub enum ListingError {
    #[error("row {row}: expected `<line> <CLASS> <value>`")]
    MissingField { row: usize },

    #[error("row {row}: `{found}` is not a line number")]
    BadLineNumber { row: usize, found: String },

    #[error("row {row}: unknown token class `{class}`")]
    UnknownClass { row: usize, class: String },
}

/// Reads the scanner's token listing, one token per row:
///
/// ```text
/// 1 INTTK int
/// 1 IDENFR main
/// 3 STRCON hello, world
/// ```
///
/// The value is everything after the single space that follows the class,
/// so string literals keep their inner spaces and may be empty.
pub fn read_listing(listing: &str) -> Result<Vec<Token>, ListingError> {
    let mut tokens = vec![];

    for (i, row) in listing.lines().enumerate() {
        let row_number = i + 1;
        if row.trim().is_empty() {
            continue;
        }
        let row = row.trim_start();

        let (line, rest) = row
            .split_once(' ')
            .ok_or(ListingError::MissingField { row: row_number })?;
        let line = line.parse().map_err(|_| ListingError::BadLineNumber {
            row: row_number,
            found: line.to_string(),
        })?;

        let (class, value) = rest.split_once(' ').unwrap_or((rest, ""));
        let kind = TokenKind::from_class(class).ok_or_else(|| ListingError::UnknownClass {
            row: row_number,
            class: class.to_string(),
        })?;

        tokens.push(Token::new(kind, value, line));
    }

    Ok(tokens)
}

/// Inverse of [`read_listing`].
pub fn write_listing(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{} {} {}\n", t.line, t.kind.class_name(), t.value))
        .collect()
}
