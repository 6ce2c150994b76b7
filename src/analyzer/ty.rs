use crate::token::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Char,
    Int,
}

impl Type {
    pub fn from_specifier(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::Int => Some(Type::Int),
            TokenKind::Char => Some(Type::Char),
            TokenKind::Void => Some(Type::Void),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Char => "char",
            Type::Int => "int",
        }
    }

    /// One character per parameter in a function's signature string.
    pub fn signature_code(&self) -> char {
        match self {
            Type::Int => '0',
            Type::Char => '1',
            Type::Void => panic!("void is not a parameter type"),
        }
    }

    pub fn from_signature_code(c: char) -> Option<Type> {
        match c {
            '0' => Some(Type::Int),
            '1' => Some(Type::Char),
            _ => None,
        }
    }
}
