mod common;

use common::scan;
use midc::analyzer::{Diagnostic, DiagnosticKind};
use midc::token::{TokenCursor, TokenKind};
use midc::ParseError;

#[test]
fn test_peek_does_not_move() {
    let cursor = TokenCursor::new(scan("int a;"));
    assert_eq!(cursor.peek_kind(2), Some(TokenKind::SemiColon));
    assert_eq!(cursor.peek(3), None);
    assert_eq!(cursor.position(), 0);
    assert!(cursor.is(TokenKind::Int));
}

#[test]
fn test_expect_or_diagnose_is_idempotent() {
    let mut cursor = TokenCursor::new(scan("a = 1\nb"));
    for _ in 0..3 {
        cursor.advance().unwrap();
    }

    let (token, diagnostic) =
        cursor.expect_or_diagnose(TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
    assert_eq!(token, None);
    assert_eq!(
        diagnostic,
        Some(Diagnostic::new(1, DiagnosticKind::MissingSemicolon))
    );

    let again = cursor.expect_or_diagnose(TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
    assert_eq!(again, (None, diagnostic));
    assert_eq!(cursor.position(), 3);

    let (token, diagnostic) =
        cursor.expect_or_diagnose(TokenKind::Ident, DiagnosticKind::MissingSemicolon);
    assert_eq!(token.unwrap().value, "b");
    assert_eq!(diagnostic, None);
    assert!(cursor.is_eof());
}

#[test]
fn test_skips() {
    let mut cursor = TokenCursor::new(scan("f(g(1), (2)); x = 1; y"));
    cursor.advance().unwrap();
    cursor.skip_balanced_parens().unwrap();
    assert!(cursor.is(TokenKind::SemiColon));

    cursor.skip_past(TokenKind::SemiColon).unwrap();
    cursor.skip_past(TokenKind::SemiColon).unwrap();
    assert_eq!(cursor.current().unwrap().value, "y");

    let Err(ParseError::UnexpectedEof { .. }) = cursor.skip_past(TokenKind::SemiColon) else {
        panic!();
    };
}

#[test]
fn test_expect_reports_found_token() {
    let mut cursor = TokenCursor::new(scan("int\n5"));
    cursor.expect(TokenKind::Int).unwrap();
    let Err(ParseError::UnexpectedToken { line, found, value, .. }) =
        cursor.expect(TokenKind::Ident)
    else {
        panic!();
    };
    assert_eq!((line, found, value.as_str()), (2, "INTCON", "5"));
    assert_eq!(cursor.last_line(), 1);
}
