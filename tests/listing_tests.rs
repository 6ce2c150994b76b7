mod common;

use midc::analyzer::DiagnosticKind;
use midc::compile_listing;
use midc::token::{read_listing, write_listing, ListingError, Token, TokenKind};
use midc::CompileError;

#[test]
fn test_read_listing() {
    let listing = "1 VOIDTK void\n1 MAINTK main\n\n2 STRCON hello, world\n3 STRCON \n";
    let tokens = read_listing(listing).unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Void, "void", 1),
            Token::new(TokenKind::Main, "main", 1),
            Token::new(TokenKind::StrCon, "hello, world", 2),
            Token::new(TokenKind::StrCon, "", 3),
        ]
    );
}

#[test]
fn test_read_listing_errors() {
    assert_eq!(
        read_listing("1 INTTK int\n7"),
        Err(ListingError::MissingField { row: 2 })
    );
    assert_eq!(
        read_listing("x INTTK int"),
        Err(ListingError::BadLineNumber {
            row: 1,
            found: "x".to_string()
        })
    );
    assert_eq!(
        read_listing("1 INTTK int\n2 FLOATTK float"),
        Err(ListingError::UnknownClass {
            row: 2,
            class: "FLOATTK".to_string()
        })
    );
}

#[test]
fn test_write_listing_matches_scanner_format() {
    let tokens = common::scan("void main() {\nprintf(\"a b\");\n}");
    let listing = write_listing(&tokens);
    assert!(listing.starts_with("1 VOIDTK void\n1 MAINTK main\n1 LPARENT (\n"));
    assert!(listing.contains("2 STRCON a b\n"));
    assert_eq!(read_listing(&listing).unwrap(), tokens);
}

#[test]
fn test_compile_listing() {
    let listing = "\
1 VOIDTK void
1 MAINTK main
1 LPARENT (
1 RPARENT )
1 LBRACE {
2 INTTK int
2 IDENFR a
2 SEMICN ;
3 IDENFR a
3 ASSIGN =
3 INTCON 1
4 RBRACE }
";
    let compilation = compile_listing(listing).unwrap();
    assert_eq!(
        compilation.diagnostic_kinds(),
        vec![DiagnosticKind::MissingSemicolon]
    );
    assert_eq!(compilation.diagnostics[0].to_string(), "3 k");
    assert!(compilation.trace().contains("a = 1\n"));

    let Err(CompileError::Listing(_)) = compile_listing("1 BOGUS x") else {
        panic!();
    };
}
