#![allow(dead_code)]

use midc::parser::Compilation;
use midc::token::{Token, TokenKind};
use phf::phf_map;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "const" => TokenKind::Const,
    "int" => TokenKind::Int,
    "char" => TokenKind::Char,
    "void" => TokenKind::Void,
    "main" => TokenKind::Main,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "do" => TokenKind::Do,
    "while" => TokenKind::While,
    "for" => TokenKind::For,
    "scanf" => TokenKind::Scanf,
    "printf" => TokenKind::Printf,
    "return" => TokenKind::Return,
};

static TWO_SYMBOLS: phf::Map<&'static str, TokenKind> = phf_map! {
    "<=" => TokenKind::LessEqual,
    ">=" => TokenKind::GreaterEqual,
    "==" => TokenKind::DoubleEqual,
    "!=" => TokenKind::NotEqual,
};

static ONE_SYMBOL: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '*' => TokenKind::Mult,
    '/' => TokenKind::Div,
    '<' => TokenKind::LessThan,
    '>' => TokenKind::GreaterThan,
    '=' => TokenKind::Assign,
    ';' => TokenKind::SemiColon,
    ',' => TokenKind::Comma,
    '(' => TokenKind::OpenParen,
    ')' => TokenKind::CloseParen,
    '[' => TokenKind::OpenSquareBrace,
    ']' => TokenKind::CloseSquareBrace,
    '{' => TokenKind::OpenCurlyBrace,
    '}' => TokenKind::CloseCurlyBrace,
};

/// Minimal scanner for test sources. Line numbers start at 1.
pub fn scan(source: &str) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = vec![];
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let c2: String = chars[i..].iter().take(2).collect();

        if c == '\n' {
            line += 1;
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let s: String = chars[i..].iter().take_while(|c| c.is_ascii_digit()).collect();
            i += s.len();
            tokens.push(Token::new(TokenKind::IntCon, s, line));
        } else if c.is_ascii_alphabetic() || c == '_' {
            let s: String = chars[i..]
                .iter()
                .take_while(|&&c| c.is_ascii_alphanumeric() || c == '_')
                .collect();
            i += s.len();
            let kind = KEYWORDS.get(s.as_str()).copied().unwrap_or(TokenKind::Ident);
            tokens.push(Token::new(kind, s, line));
        } else if c == '\'' {
            tokens.push(Token::new(TokenKind::CharCon, chars[i + 1].to_string(), line));
            i += 3;
        } else if c == '"' {
            let s: String = chars[i + 1..].iter().take_while(|&&c| c != '"').collect();
            i += s.chars().count() + 2;
            tokens.push(Token::new(TokenKind::StrCon, s, line));
        } else if let Some(kind) = TWO_SYMBOLS.get(c2.as_str()) {
            tokens.push(Token::new(*kind, c2, line));
            i += 2;
        } else if let Some(kind) = ONE_SYMBOL.get(&c) {
            tokens.push(Token::new(*kind, c.to_string(), line));
            i += 1;
        } else {
            panic!("can't tokenize {:?} on line {}", c, line);
        }
    }

    tokens
}

pub fn compile(source: &str) -> Compilation {
    midc::compile(scan(source)).unwrap()
}

pub fn wrap_in_main(body: &str) -> String {
    format!("void main() {{\n{}\n}}", body)
}

pub fn trace_lines(compilation: &Compilation) -> Vec<String> {
    compilation.trace().lines().map(str::to_string).collect()
}
