use std::io::Write;

use crate::analyzer::{DiagnosticKind, Kind, Symbol, Type};
use crate::error::ParseError;
use crate::midcode::{ArithOp, Label, Operand, Reg, Relation};
use crate::token::TokenKind;

use super::{Parser, Rule, SyntaxNode};

impl<W: Write> Parser<W> {
    /// expression = ["+" | "-"] item { ("+" | "-") item }
    ///
    /// The type is `char` only for a single unsigned char factor.
    pub(super) fn parse_expression(
        &mut self,
        node: &mut SyntaxNode,
    ) -> Result<(Type, Operand), ParseError> {
        let sign = match self.cursor.peek_kind(0) {
            Some(kind @ (TokenKind::Plus | TokenKind::Minus)) => {
                self.leaf(node)?;
                ArithOp::from_token(kind)
            }
            _ => None,
        };

        let (mut ty, mut value) = self.parse_item(node.add_rule(Rule::Item))?;
        if let Some(sign) = sign {
            ty = Type::Int;
            if sign == ArithOp::Sub {
                value = self.negate(value)?;
            }
        }

        let mut acc = None;
        while let Some(op) = self.additive_op() {
            self.leaf(node)?;
            let (_, rhs) = self.parse_item(node.add_rule(Rule::Item))?;
            value = self.combine(&mut acc, op, value, rhs)?;
            ty = Type::Int;
        }

        node.set_operand(value.clone());
        Ok((ty, value))
    }

    /// item = factor { ("*" | "/") factor }
    fn parse_item(&mut self, node: &mut SyntaxNode) -> Result<(Type, Operand), ParseError> {
        let (mut ty, mut value) = self.parse_factor(node.add_rule(Rule::Factor))?;

        let mut acc = None;
        while let Some(op) = self.multiplicative_op() {
            self.leaf(node)?;
            let (_, rhs) = self.parse_factor(node.add_rule(Rule::Factor))?;
            value = self.combine(&mut acc, op, value, rhs)?;
            ty = Type::Int;
        }

        node.set_operand(value.clone());
        Ok((ty, value))
    }

    /// factor = ident | ident "[" expression "]" | call | "(" expression ")"
    ///        | integer | char
    fn parse_factor(&mut self, node: &mut SyntaxNode) -> Result<(Type, Operand), ParseError> {
        let token = self.cursor.current()?.clone();
        let (ty, value) = match token.kind {
            TokenKind::Ident if self.cursor.peek_kind(1) == Some(TokenKind::OpenParen) => {
                self.parse_call_factor(node)?
            }
            TokenKind::Ident => self.parse_identifier_factor(node)?,
            TokenKind::OpenParen => {
                self.leaf(node)?;
                let (_, value) = self.parse_expression(node.add_rule(Rule::Expression))?;
                self.recoverable_terminal(
                    node,
                    TokenKind::CloseParen,
                    DiagnosticKind::MissingClosingParen,
                );
                (Type::Int, value)
            }
            TokenKind::CharCon => {
                self.leaf(node)?;
                (Type::Char, Operand::named(format!("'{}'", token.value)))
            }
            TokenKind::IntCon | TokenKind::Plus | TokenKind::Minus => {
                let value = self.parse_integer(node.add_rule(Rule::Integer))?;
                (Type::Int, Operand::named(value.to_string()))
            }
            _ => return Err(self.unexpected("an expression")),
        };

        node.set_operand(value.clone());
        Ok((ty, value))
    }

    fn parse_identifier_factor(
        &mut self,
        node: &mut SyntaxNode,
    ) -> Result<(Type, Operand), ParseError> {
        let name = self.ident(node)?;
        let symbol = self.symbols.lookup_nearest(&name.value).cloned();
        let ty = match &symbol {
            None => {
                self.error(name.line, DiagnosticKind::Undefined);
                Type::Int
            }
            Some(s) if s.ty == Type::Void => Type::Int,
            Some(s) => s.ty,
        };

        if self.optional_terminal(node, TokenKind::OpenSquareBrace) {
            let (index_ty, index) = self.parse_expression(node.add_rule(Rule::Expression))?;
            if index_ty != Type::Int {
                self.error(self.cursor.last_line(), DiagnosticKind::IllegalArrayIndex);
            }
            let dst = self.alloc.fresh_reg();
            self.emitter.load_array(dst, &name.value, index)?;
            self.recoverable_terminal(
                node,
                TokenKind::CloseSquareBrace,
                DiagnosticKind::MissingClosingBracket,
            );
            return Ok((ty, dst.into()));
        }

        // constants are replaced by their value
        let value = match symbol {
            Some(Symbol {
                kind: Kind::Const,
                const_value: Some(value),
                ..
            }) => Operand::named(value),
            _ => Operand::named(name.value),
        };
        Ok((ty, value))
    }

    /// A call used as a value. Its result is moved into a fresh register.
    fn parse_call_factor(&mut self, node: &mut SyntaxNode) -> Result<(Type, Operand), ParseError> {
        let name = self.cursor.current()?.value.clone();
        let Some(callee) = self.symbols.lookup_function(&name).cloned() else {
            self.skip_undefined_call(node)?;
            return Ok((Type::Int, Operand::named(name)));
        };

        self.parse_call(node.add_rule(Rule::ReturnCallSentence), &callee)?;
        let dst = self.alloc.fresh_reg();
        self.emitter.assign_return(dst)?;
        let ty = match callee.ty {
            Type::Char => Type::Char,
            _ => Type::Int,
        };
        Ok((ty, dst.into()))
    }

    /// Skips `name(...)` for a name that is not a known function.
    pub(super) fn skip_undefined_call(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        let name = self.leaf(node)?;
        self.error(name.line, DiagnosticKind::Undefined);
        self.cursor.skip_balanced_parens()
    }

    /// call = ident "(" value_parameter_table ")"
    ///
    /// Emits `save`, one `push` per argument and `call`. Arguments are
    /// checked against the callee's signature, count first.
    pub(super) fn parse_call(
        &mut self,
        node: &mut SyntaxNode,
        callee: &Symbol,
    ) -> Result<(), ParseError> {
        let name = self.ident(node)?;
        self.terminal(node, TokenKind::OpenParen)?;
        self.emitter.save(&name.value)?;

        let signature =
            self.parse_value_parameter_table(node.add_rule(Rule::ValueParameterTable), &name.value)?;
        if callee.parameter_count() != signature.len() {
            self.error(name.line, DiagnosticKind::ParameterCountMismatch);
        } else if callee.parameters != signature {
            self.error(name.line, DiagnosticKind::ParameterTypeMismatch);
        }

        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);
        self.emitter.call(&name.value)?;
        Ok(())
    }

    /// Returns the argument types as signature codes.
    fn parse_value_parameter_table(
        &mut self,
        node: &mut SyntaxNode,
        function: &str,
    ) -> Result<String, ParseError> {
        let mut signature = String::new();
        if self.cursor.is(TokenKind::CloseParen) || self.cursor.is(TokenKind::SemiColon) {
            return Ok(signature);
        }

        loop {
            let (ty, value) = self.parse_expression(node.add_rule(Rule::Expression))?;
            self.emitter.push(function, value, signature.len())?;
            signature.push(ty.signature_code());
            if !self.optional_terminal(node, TokenKind::Comma) {
                break;
            }
        }
        Ok(signature)
    }

    /// condition = expression [relation expression]
    ///
    /// Jumps to `label` when the condition is false, or when it is true if
    /// `is_false_branch` is unset.
    pub(super) fn parse_condition(
        &mut self,
        node: &mut SyntaxNode,
        label: Label,
        is_false_branch: bool,
    ) -> Result<(), ParseError> {
        let (ty, lhs) = self.parse_expression(node.add_rule(Rule::Expression))?;
        if ty != Type::Int {
            self.error(self.cursor.last_line(), DiagnosticKind::IllegalConditionType);
        }

        let relation = self.cursor.peek_kind(0).and_then(Relation::from_token);
        match relation {
            Some(relation) => {
                self.leaf(node)?;
                let (ty, rhs) = self.parse_expression(node.add_rule(Rule::Expression))?;
                if ty != Type::Int {
                    self.error(self.cursor.last_line(), DiagnosticKind::IllegalConditionType);
                }
                self.emitter.branch(relation, lhs, rhs, label, is_false_branch)?;
            }
            None => self.emitter.branch_zero(lhs, label, is_false_branch)?,
        }
        Ok(())
    }

    fn additive_op(&self) -> Option<ArithOp> {
        self.cursor
            .peek_kind(0)
            .and_then(ArithOp::from_token)
            .filter(|op| matches!(op, ArithOp::Add | ArithOp::Sub))
    }

    fn multiplicative_op(&self) -> Option<ArithOp> {
        self.cursor
            .peek_kind(0)
            .and_then(ArithOp::from_token)
            .filter(|op| matches!(op, ArithOp::Mul | ArithOp::Div))
    }

    /// Folds a literal, otherwise negates into a fresh register.
    fn negate(&mut self, value: Operand) -> Result<Operand, ParseError> {
        if let Some(n) = value.as_int_literal() {
            return Ok(Operand::named((-n).to_string()));
        }
        let dst = self.alloc.fresh_reg();
        self.emitter.neg(dst, value)?;
        Ok(dst.into())
    }

    /// `lhs op rhs` into the chain's result register. The first combination
    /// of a chain allocates it; later ones accumulate into the same one.
    fn combine(
        &mut self,
        acc: &mut Option<Reg>,
        op: ArithOp,
        lhs: Operand,
        rhs: Operand,
    ) -> Result<Operand, ParseError> {
        let dst = match *acc {
            Some(reg) => reg,
            None => {
                let reg = self.alloc.fresh_reg();
                *acc = Some(reg);
                reg
            }
        };

        match (lhs, rhs) {
            (Operand::Reg(l), Operand::Reg(r)) => self.emitter.reg_op_reg(dst, l, r, op)?,
            (Operand::Reg(l), Operand::Named(r)) => self.emitter.reg_op_number(dst, l, &r, op)?,
            (Operand::Named(l), Operand::Reg(r)) => self.emitter.number_op_reg(dst, &l, r, op)?,
            (Operand::Named(l), Operand::Named(r)) => {
                self.emitter.number_op_number(dst, &l, &r, op)?
            }
        }
        Ok(Operand::Reg(dst))
    }
}
