use phf::phf_map;

pub static TOKEN_CLASSES: phf::Map<&'static str, TokenKind> = phf_map! {
    "IDENFR" => TokenKind::Ident,
    "INTCON" => TokenKind::IntCon,
    "CHARCON" => TokenKind::CharCon,
    "STRCON" => TokenKind::StrCon,
    "CONSTTK" => TokenKind::Const,
    "INTTK" => TokenKind::Int,
    "CHARTK" => TokenKind::Char,
    "VOIDTK" => TokenKind::Void,
    "MAINTK" => TokenKind::Main,
    "IFTK" => TokenKind::If,
    "ELSETK" => TokenKind::Else,
    "DOTK" => TokenKind::Do,
    "WHILETK" => TokenKind::While,
    "FORTK" => TokenKind::For,
    "SCANFTK" => TokenKind::Scanf,
    "PRINTFTK" => TokenKind::Printf,
    "RETURNTK" => TokenKind::Return,
    "PLUS" => TokenKind::Plus,
    "MINU" => TokenKind::Minus,
    "MULT" => TokenKind::Mult,
    "DIV" => TokenKind::Div,
    "LSS" => TokenKind::LessThan,
    "LEQ" => TokenKind::LessEqual,
    "GRE" => TokenKind::GreaterThan,
    "GEQ" => TokenKind::GreaterEqual,
    "EQL" => TokenKind::DoubleEqual,
    "NEQ" => TokenKind::NotEqual,
    "ASSIGN" => TokenKind::Assign,
    "SEMICN" => TokenKind::SemiColon,
    "COMMA" => TokenKind::Comma,
    "LPARENT" => TokenKind::OpenParen,
    "RPARENT" => TokenKind::CloseParen,
    "LBRACK" => TokenKind::OpenSquareBrace,
    "RBRACK" => TokenKind::CloseSquareBrace,
    "LBRACE" => TokenKind::OpenCurlyBrace,
    "RBRACE" => TokenKind::CloseCurlyBrace,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    IntCon,
    CharCon,
    StrCon,

    Const,
    Int,
    Char,
    Void,
    Main,

    If,
    Else,
    Do,
    While,
    For,
    Scanf,
    Printf,
    Return,

    Plus,
    Minus,
    Mult,
    Div,

    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    DoubleEqual,
    NotEqual,

    Assign,
    SemiColon,
    Comma,
    OpenParen,
    CloseParen,
    OpenSquareBrace,
    CloseSquareBrace,
    OpenCurlyBrace,
    CloseCurlyBrace,
}

impl TokenKind {
    pub fn from_class(class: &str) -> Option<TokenKind> {
        TOKEN_CLASSES.get(class).copied()
    }

    /// Name the scanner uses for this class in its listing.
    pub fn class_name(&self) -> &'static str {
        match self {
            TokenKind::Ident => "IDENFR",
            TokenKind::IntCon => "INTCON",
            TokenKind::CharCon => "CHARCON",
            TokenKind::StrCon => "STRCON",
            TokenKind::Const => "CONSTTK",
            TokenKind::Int => "INTTK",
            TokenKind::Char => "CHARTK",
            TokenKind::Void => "VOIDTK",
            TokenKind::Main => "MAINTK",
            TokenKind::If => "IFTK",
            TokenKind::Else => "ELSETK",
            TokenKind::Do => "DOTK",
            TokenKind::While => "WHILETK",
            TokenKind::For => "FORTK",
            TokenKind::Scanf => "SCANFTK",
            TokenKind::Printf => "PRINTFTK",
            TokenKind::Return => "RETURNTK",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINU",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::LessThan => "LSS",
            TokenKind::LessEqual => "LEQ",
            TokenKind::GreaterThan => "GRE",
            TokenKind::GreaterEqual => "GEQ",
            TokenKind::DoubleEqual => "EQL",
            TokenKind::NotEqual => "NEQ",
            TokenKind::Assign => "ASSIGN",
            TokenKind::SemiColon => "SEMICN",
            TokenKind::Comma => "COMMA",
            TokenKind::OpenParen => "LPARENT",
            TokenKind::CloseParen => "RPARENT",
            TokenKind::OpenSquareBrace => "LBRACK",
            TokenKind::CloseSquareBrace => "RBRACK",
            TokenKind::OpenCurlyBrace => "LBRACE",
            TokenKind::CloseCurlyBrace => "RBRACE",
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            TokenKind::LessThan
                | TokenKind::LessEqual
                | TokenKind::GreaterThan
                | TokenKind::GreaterEqual
                | TokenKind::DoubleEqual
                | TokenKind::NotEqual
        )
    }

    pub fn is_type_specifier(&self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Char)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
        }
    }
}
