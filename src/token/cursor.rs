use crate::analyzer::{Diagnostic, DiagnosticKind};
use crate::error::ParseError;

use super::{Token, TokenKind};

/// Owns the token stream and the read position. Look-ahead goes through
/// [`TokenCursor::peek`] and never moves the position.
#[derive(Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    pub fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.peek(offset).map(|t| t.kind)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    pub fn current(&self) -> Result<&Token, ParseError> {
        self.peek(0).ok_or_else(|| ParseError::UnexpectedEof {
            expected: "a token".to_string(),
        })
    }

    /// Line of the most recently consumed token. Diagnostics about a
    /// missing terminal are reported here, since the terminal belonged
    /// right after it.
    pub fn last_line(&self) -> usize {
        if self.index == 0 {
            return self.tokens.first().map(|t| t.line).unwrap_or(0);
        }
        let last = self.index.min(self.tokens.len()) - 1;
        self.tokens[last].line
    }

    pub fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.current()?.clone();
        self.index += 1;
        Ok(token)
    }

    pub fn consume(&mut self, kind: TokenKind) -> Option<Token> {
        if !self.is(kind) {
            return None;
        }
        let token = self.tokens[self.index].clone();
        self.index += 1;
        Some(token)
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let Some(t) = self.peek(0) else {
            return Err(ParseError::UnexpectedEof {
                expected: kind.class_name().to_string(),
            });
        };
        if t.kind != kind {
            return Err(ParseError::UnexpectedToken {
                line: t.line,
                expected: kind.class_name().to_string(),
                found: t.kind.class_name(),
                value: t.value.clone(),
            });
        }
        self.advance()
    }

    /// Consumes `kind` if it is next. Otherwise nothing is consumed and the
    /// `missing` diagnostic is produced, so parsing continues as if the
    /// terminal had been written.
    pub fn expect_or_diagnose(
        &mut self,
        kind: TokenKind,
        missing: DiagnosticKind,
    ) -> (Option<Token>, Option<Diagnostic>) {
        match self.consume(kind) {
            Some(token) => (Some(token), None),
            None => (None, Some(Diagnostic::new(self.last_line(), missing))),
        }
    }

    /// Skips everything up to and including the next `kind`.
    pub fn skip_past(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        loop {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof {
                    expected: kind.class_name().to_string(),
                });
            }
            let t = self.advance()?;
            if t.kind == kind {
                return Ok(());
            }
        }
    }

    /// Skips a parenthesised group starting at the current `(`, including
    /// any nested groups and the matching `)`.
    pub fn skip_balanced_parens(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::OpenParen)?;
        let mut depth = 1;
        while depth > 0 {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof {
                    expected: TokenKind::CloseParen.class_name().to_string(),
                });
            }
            match self.advance()?.kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => depth -= 1,
                _ => (),
            }
        }
        Ok(())
    }
}
