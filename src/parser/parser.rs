use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::analyzer::{
    Diagnostic, DiagnosticKind, Diagnostics, Kind, Scope, ScopedSymbolTable, StringTable,
    SymbolTable, Type,
};
use crate::error::ParseError;
use crate::midcode::{render, Allocator, Midcode, MidcodeEmitter};
use crate::token::{Token, TokenCursor, TokenKind};

use super::{Rule, SyntaxNode};

/// Key of the global scope in [`Compilation::symbol_tables`].
pub const GLOBAL_TABLE: &str = "global";

/// Everything one run hands to the backend.
#[derive(Debug)]
pub struct Compilation {
    pub midcode: Vec<Midcode>,
    pub strings: StringTable,
    /// Local scope of every function keyed by its name, plus the global
    /// scope under [`GLOBAL_TABLE`].
    pub symbol_tables: BTreeMap<String, SymbolTable>,
    pub diagnostics: Vec<Diagnostic>,
    pub tree: SyntaxNode,
    pub reg_count: usize,
    pub label_count: usize,
}

impl Compilation {
    pub fn trace(&self) -> String {
        render(&self.midcode)
    }

    pub fn diagnostic_kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.iter().map(|d| d.kind).collect()
    }

    pub fn symbol_table(&self, function: &str) -> Option<&SymbolTable> {
        self.symbol_tables.get(function)
    }
}

/// Recursive-descent parser that checks and emits midcode while it parses.
/// Every grammar procedure advances the cursor, adds its syntax subtree,
/// consults the symbol table and calls the emitter in one pass.
pub struct Parser<W: Write = io::Sink> {
    pub(super) cursor: TokenCursor,
    pub(super) symbols: ScopedSymbolTable,
    pub(super) strings: StringTable,
    pub(super) emitter: MidcodeEmitter<W>,
    pub(super) alloc: Allocator,
    pub(super) diagnostics: Diagnostics,
    current_function: String,
    symbol_tables: BTreeMap<String, SymbolTable>,
}

impl Parser<io::Sink> {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_trace(tokens, io::sink())
    }
}

impl<W: Write> Parser<W> {
    pub fn with_trace(tokens: Vec<Token>, trace: W) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            symbols: ScopedSymbolTable::new(),
            strings: StringTable::new(),
            emitter: MidcodeEmitter::new(trace),
            alloc: Allocator::new(),
            diagnostics: Diagnostics::new(),
            current_function: String::new(),
            symbol_tables: BTreeMap::new(),
        }
    }

    pub fn parse(mut self) -> Result<Compilation, ParseError> {
        let mut root = SyntaxNode::new(Rule::Program);
        self.parse_program(&mut root)?;

        let (midcode, _) = self.emitter.finish()?;
        Ok(Compilation {
            midcode,
            strings: self.strings,
            symbol_tables: self.symbol_tables,
            diagnostics: self.diagnostics.into_vec(),
            tree: root,
            reg_count: self.alloc.reg_count(),
            label_count: self.alloc.label_count(),
        })
    }

    pub(super) fn error(&mut self, line: usize, kind: DiagnosticKind) {
        self.diagnostics.record(line, kind);
    }

    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.cursor.peek(0) {
            Some(t) => ParseError::UnexpectedToken {
                line: t.line,
                expected: expected.to_string(),
                found: t.kind.class_name(),
                value: t.value.clone(),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    /// Consumes any token as a leaf of `node`.
    pub(super) fn leaf(&mut self, node: &mut SyntaxNode) -> Result<Token, ParseError> {
        let token = self.cursor.advance()?;
        node.add_token(token.clone());
        Ok(token)
    }

    pub(super) fn terminal(
        &mut self,
        node: &mut SyntaxNode,
        kind: TokenKind,
    ) -> Result<Token, ParseError> {
        let token = self.cursor.expect(kind)?;
        node.add_token(token.clone());
        Ok(token)
    }

    pub(super) fn optional_terminal(&mut self, node: &mut SyntaxNode, kind: TokenKind) -> bool {
        match self.cursor.consume(kind) {
            Some(token) => {
                node.add_token(token);
                true
            }
            None => false,
        }
    }

    /// A terminal that may be left out: its absence is diagnosed and
    /// parsing carries on as if it were there.
    pub(super) fn recoverable_terminal(
        &mut self,
        node: &mut SyntaxNode,
        kind: TokenKind,
        missing: DiagnosticKind,
    ) {
        let (token, diagnostic) = self.cursor.expect_or_diagnose(kind, missing);
        if let Some(token) = token {
            node.add_token(token);
        }
        if let Some(diagnostic) = diagnostic {
            self.diagnostics.push(diagnostic);
        }
    }

    pub(super) fn ident(&mut self, node: &mut SyntaxNode) -> Result<Token, ParseError> {
        self.terminal(node, TokenKind::Ident)
    }

    /// int | char
    pub(super) fn type_specifier(&mut self, node: &mut SyntaxNode) -> Result<Type, ParseError> {
        let kind = self.cursor.current()?.kind;
        if !kind.is_type_specifier() {
            return Err(self.unexpected("INTTK or CHARTK"));
        }
        self.leaf(node)?;
        Ok(if kind == TokenKind::Int {
            Type::Int
        } else {
            Type::Char
        })
    }

    /// integer = ["+" | "-"] unsigned
    pub(super) fn parse_integer(&mut self, node: &mut SyntaxNode) -> Result<i64, ParseError> {
        let negative = match self.cursor.peek_kind(0) {
            Some(TokenKind::Plus) => {
                self.leaf(node)?;
                false
            }
            Some(TokenKind::Minus) => {
                self.leaf(node)?;
                true
            }
            _ => false,
        };
        let value = self.parse_unsigned(node.add_rule(Rule::UnsignedInteger))?;
        Ok(if negative { -value } else { value })
    }

    pub(super) fn parse_unsigned(&mut self, node: &mut SyntaxNode) -> Result<i64, ParseError> {
        let token = self.terminal(node, TokenKind::IntCon)?;
        token.value.parse().map_err(|_| ParseError::InvalidInteger {
            line: token.line,
            literal: token.value.clone(),
        })
    }

    pub(super) fn check_redefinition(&mut self, name: &Token, scope: Scope) {
        if self.symbols.lookup(&name.value, scope).is_some() {
            self.error(name.line, DiagnosticKind::Redefinition);
        }
    }

    fn is_function_head(&self) -> bool {
        self.cursor.peek_kind(2) == Some(TokenKind::OpenParen)
    }

    pub(super) fn is_variable_define(&self) -> bool {
        self.cursor
            .peek_kind(0)
            .is_some_and(|kind| kind.is_type_specifier())
            && !self.is_function_head()
    }

    /// program = { const_declare | variable_declare | function } main
    fn parse_program(&mut self, root: &mut SyntaxNode) -> Result<(), ParseError> {
        while let Some(kind) = self.cursor.peek_kind(0) {
            match kind {
                TokenKind::Const => {
                    self.parse_const_declare(root.add_rule(Rule::ConstDeclare), Scope::Global)?
                }
                TokenKind::Int | TokenKind::Char if self.is_function_head() => {
                    self.parse_return_function(root.add_rule(Rule::ReturnFunction))?
                }
                TokenKind::Int | TokenKind::Char => self
                    .parse_variable_declare(root.add_rule(Rule::VariableDeclare), Scope::Global)?,
                TokenKind::Void if self.cursor.peek_kind(1) == Some(TokenKind::Main) => {
                    self.parse_main_function(root.add_rule(Rule::MainFunction))?
                }
                TokenKind::Void => self.parse_void_function(root.add_rule(Rule::VoidFunction))?,
                _ => return Err(self.unexpected("a declaration or function")),
            }
        }

        self.symbol_tables
            .insert(GLOBAL_TABLE.to_string(), self.symbols.snapshot(Scope::Global));
        Ok(())
    }

    /// const_declare = { "const" const_define ";" }
    pub(super) fn parse_const_declare(
        &mut self,
        node: &mut SyntaxNode,
        scope: Scope,
    ) -> Result<(), ParseError> {
        while self.cursor.is(TokenKind::Const) {
            self.terminal(node, TokenKind::Const)?;
            self.parse_const_define(node.add_rule(Rule::ConstDefine), scope)?;
            self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
        }
        Ok(())
    }

    /// const_define = ("int" | "char") ident "=" value { "," ident "=" value }
    fn parse_const_define(&mut self, node: &mut SyntaxNode, scope: Scope) -> Result<(), ParseError> {
        let ty = self.type_specifier(node)?;
        loop {
            let name = self.ident(node)?;
            self.check_redefinition(&name, scope);
            self.terminal(node, TokenKind::Assign)?;
            let value = self.parse_const_value(node, ty)?;
            self.symbols
                .declare(&name.value, Kind::Const, ty, scope)
                .const_value = Some(value);

            if !self.optional_terminal(node, TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    }

    /// Literal for a constant of type `ty`. A literal of the other type is
    /// still recorded, with an `InvalidConstDefinition` diagnostic.
    fn parse_const_value(&mut self, node: &mut SyntaxNode, ty: Type) -> Result<String, ParseError> {
        let token = self.cursor.current()?.clone();
        let is_integer = matches!(
            token.kind,
            TokenKind::IntCon | TokenKind::Plus | TokenKind::Minus
        );

        if ty == Type::Char && token.kind == TokenKind::CharCon {
            self.leaf(node)?;
            return Ok(format!("'{}'", token.value));
        }
        if ty == Type::Int && is_integer {
            let value = self.parse_integer(node.add_rule(Rule::Integer))?;
            return Ok(value.to_string());
        }

        self.error(token.line, DiagnosticKind::InvalidConstDefinition);
        if is_integer {
            let value = self.parse_integer(node.add_rule(Rule::Integer))?;
            Ok(value.to_string())
        } else {
            self.leaf(node)?;
            Ok(match token.kind {
                TokenKind::CharCon => format!("'{}'", token.value),
                _ => token.value,
            })
        }
    }

    /// variable_declare = { variable_define ";" }
    pub(super) fn parse_variable_declare(
        &mut self,
        node: &mut SyntaxNode,
        scope: Scope,
    ) -> Result<(), ParseError> {
        while self.is_variable_define() {
            self.parse_variable_define(node.add_rule(Rule::VariableDefine), scope)?;
            self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
        }
        Ok(())
    }

    /// variable_define = ("int" | "char") ident ["[" unsigned "]"] { "," ... }
    fn parse_variable_define(
        &mut self,
        node: &mut SyntaxNode,
        scope: Scope,
    ) -> Result<(), ParseError> {
        let ty = self.type_specifier(node)?;
        loop {
            let name = self.ident(node)?;
            self.check_redefinition(&name, scope);

            let length = if self.optional_terminal(node, TokenKind::OpenSquareBrace) {
                let length = self.parse_unsigned(node.add_rule(Rule::UnsignedInteger))?;
                self.recoverable_terminal(
                    node,
                    TokenKind::CloseSquareBrace,
                    DiagnosticKind::MissingClosingBracket,
                );
                Some(length as usize)
            } else {
                None
            };

            match length {
                Some(length) => {
                    self.symbols
                        .declare(&name.value, Kind::Array, ty, scope)
                        .array_length = Some(length);
                }
                None => {
                    self.symbols.declare(&name.value, Kind::Variable, ty, scope);
                }
            }
            self.emitter.variable(ty, &name.value, length)?;

            if !self.optional_terminal(node, TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    }

    /// Declares the function globally and starts a fresh local scope.
    fn open_function(&mut self, name: &Token, ty: Type) {
        self.check_redefinition(name, Scope::Global);
        self.symbols
            .declare(&name.value, Kind::Function, ty, Scope::Global);
        self.symbols.reset(Scope::Local);
        self.current_function = name.value.clone();
    }

    /// return_function = head_state "(" parameter_table ")" "{" composite "}"
    fn parse_return_function(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        let head = node.add_rule(Rule::HeadState);
        let ty = self.type_specifier(head)?;
        let name = self.ident(head)?;
        self.open_function(&name, ty);
        self.parse_function_rest(node, ty)
    }

    /// void_function = "void" ident "(" parameter_table ")" "{" composite "}"
    fn parse_void_function(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        self.terminal(node, TokenKind::Void)?;
        let name = self.ident(node)?;
        self.open_function(&name, Type::Void);
        self.parse_function_rest(node, Type::Void)
    }

    /// main_function = "void" "main" "(" ")" "{" composite "}"
    fn parse_main_function(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        self.terminal(node, TokenKind::Void)?;
        let name = self.terminal(node, TokenKind::Main)?;
        self.open_function(&name, Type::Void);
        self.terminal(node, TokenKind::OpenParen)?;
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);
        self.emitter.func_declare(Type::Void, &name.value)?;
        self.parse_function_body(node, Type::Void)
    }

    fn parse_function_rest(&mut self, node: &mut SyntaxNode, ty: Type) -> Result<(), ParseError> {
        self.terminal(node, TokenKind::OpenParen)?;
        let params = self.parse_parameter_table(node.add_rule(Rule::ParameterTable))?;
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);

        self.emitter.func_declare(ty, &self.current_function)?;
        for (param_ty, param) in params {
            self.emitter.parameter(param_ty, &param)?;
        }
        self.parse_function_body(node, ty)
    }

    /// parameter_table = [ type ident { "," type ident } ]
    ///
    /// Each parameter type is appended to the current function's signature.
    fn parse_parameter_table(
        &mut self,
        node: &mut SyntaxNode,
    ) -> Result<Vec<(Type, String)>, ParseError> {
        let mut params = vec![];
        while self
            .cursor
            .peek_kind(0)
            .is_some_and(|kind| kind.is_type_specifier())
        {
            let ty = self.type_specifier(node)?;
            let name = self.ident(node)?;
            self.check_redefinition(&name, Scope::Local);
            if let Some(f) = self.symbols.lookup_mut(&self.current_function, Scope::Global) {
                f.add_parameter(ty);
            }
            self.symbols
                .declare(&name.value, Kind::Parameter, ty, Scope::Local);
            params.push((ty, name.value));

            if !self.optional_terminal(node, TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_function_body(&mut self, node: &mut SyntaxNode, ty: Type) -> Result<(), ParseError> {
        self.terminal(node, TokenKind::OpenCurlyBrace)?;
        self.parse_composite(node.add_rule(Rule::CompositeSentence), ty)?;
        if ty == Type::Void {
            self.emitter.ret_void()?;
        }
        self.emitter.function_end()?;
        self.terminal(node, TokenKind::CloseCurlyBrace)?;

        self.symbol_tables.insert(
            std::mem::take(&mut self.current_function),
            self.symbols.snapshot(Scope::Local),
        );
        Ok(())
    }

    /// composite = [const_declare] [variable_declare] sentence_collection
    fn parse_composite(&mut self, node: &mut SyntaxNode, return_type: Type) -> Result<(), ParseError> {
        if self.cursor.is(TokenKind::Const) {
            self.parse_const_declare(node.add_rule(Rule::ConstDeclare), Scope::Local)?;
        }
        if self.is_variable_define() {
            self.parse_variable_declare(node.add_rule(Rule::VariableDeclare), Scope::Local)?;
        }

        let returns =
            self.parse_sentence_collection(node.add_rule(Rule::SentenceCollection), return_type)?;
        if return_type != Type::Void && !returns {
            let line = self.cursor.current()?.line;
            self.error(line, DiagnosticKind::MissingOrWrongReturn);
        }
        Ok(())
    }
}
