use std::io::Write;

use crate::analyzer::{DiagnosticKind, Kind, Type};
use crate::error::ParseError;
use crate::midcode::ArithOp;
use crate::token::{Token, TokenKind};

use super::{Parser, Rule, SyntaxNode};

impl<W: Write> Parser<W> {
    /// Statements up to the closing brace of the enclosing block. Returns
    /// whether any of them is guaranteed to return a value.
    pub(super) fn parse_sentence_collection(
        &mut self,
        node: &mut SyntaxNode,
        return_type: Type,
    ) -> Result<bool, ParseError> {
        let mut returns = false;
        while !self.cursor.is(TokenKind::CloseCurlyBrace) {
            let sentence = self.parse_sentence(node.add_rule(Rule::Sentence), return_type)?;
            returns = returns || sentence;
        }
        Ok(returns)
    }

    /// Returns whether the statement is guaranteed to return a value.
    pub(super) fn parse_sentence(
        &mut self,
        node: &mut SyntaxNode,
        return_type: Type,
    ) -> Result<bool, ParseError> {
        let kind = self.cursor.current()?.kind;
        match kind {
            TokenKind::If => self.parse_if(node.add_rule(Rule::IfSentence), return_type),
            TokenKind::While => self.parse_while(node.add_rule(Rule::LoopSentence), return_type),
            TokenKind::Do => self.parse_do_while(node.add_rule(Rule::LoopSentence), return_type),
            TokenKind::For => self.parse_for(node.add_rule(Rule::LoopSentence), return_type),
            TokenKind::OpenCurlyBrace => {
                self.terminal(node, TokenKind::OpenCurlyBrace)?;
                let returns = self
                    .parse_sentence_collection(node.add_rule(Rule::SentenceCollection), return_type)?;
                self.terminal(node, TokenKind::CloseCurlyBrace)?;
                Ok(returns)
            }
            TokenKind::Ident => {
                self.parse_ident_sentence(node)?;
                Ok(false)
            }
            TokenKind::Scanf => {
                self.parse_scanf(node.add_rule(Rule::ScanfSentence))?;
                self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
                Ok(false)
            }
            TokenKind::Printf => {
                self.parse_printf(node.add_rule(Rule::PrintfSentence))?;
                self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
                Ok(false)
            }
            TokenKind::Return => {
                let returns = self.parse_return(node.add_rule(Rule::ReturnSentence), return_type)?;
                self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
                Ok(returns)
            }
            TokenKind::SemiColon => {
                self.terminal(node, TokenKind::SemiColon)?;
                Ok(false)
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// if_sentence = "if" "(" condition ")" sentence ["else" sentence]
    fn parse_if(&mut self, node: &mut SyntaxNode, return_type: Type) -> Result<bool, ParseError> {
        self.terminal(node, TokenKind::If)?;
        let else_label = self.alloc.fresh_label();
        self.terminal(node, TokenKind::OpenParen)?;
        self.parse_condition(node.add_rule(Rule::Condition), else_label, true)?;
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);

        let then_returns = self.parse_sentence(node.add_rule(Rule::Sentence), return_type)?;
        let end_label = self.alloc.fresh_label();
        self.emitter.jump(end_label)?;
        self.emitter.label(else_label)?;

        let else_returns = if self.optional_terminal(node, TokenKind::Else) {
            self.parse_sentence(node.add_rule(Rule::Sentence), return_type)?
        } else {
            false
        };
        self.emitter.label(end_label)?;
        Ok(then_returns && else_returns)
    }

    /// "while" "(" condition ")" sentence
    fn parse_while(&mut self, node: &mut SyntaxNode, return_type: Type) -> Result<bool, ParseError> {
        self.terminal(node, TokenKind::While)?;
        let loop_label = self.alloc.fresh_label();
        self.emitter.label(loop_label)?;

        self.terminal(node, TokenKind::OpenParen)?;
        let end_label = self.alloc.fresh_label();
        self.parse_condition(node.add_rule(Rule::Condition), end_label, true)?;
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);

        // the body may never run
        self.parse_sentence(node.add_rule(Rule::Sentence), return_type)?;
        self.emitter.jump(loop_label)?;
        self.emitter.label(end_label)?;
        Ok(false)
    }

    /// "do" sentence "while" "(" condition ")"
    fn parse_do_while(
        &mut self,
        node: &mut SyntaxNode,
        return_type: Type,
    ) -> Result<bool, ParseError> {
        self.terminal(node, TokenKind::Do)?;
        let do_label = self.alloc.fresh_label();
        self.emitter.label(do_label)?;

        let returns = self.parse_sentence(node.add_rule(Rule::Sentence), return_type)?;
        self.recoverable_terminal(node, TokenKind::While, DiagnosticKind::MissingWhileInDoWhile);
        self.terminal(node, TokenKind::OpenParen)?;
        self.parse_condition(node.add_rule(Rule::Condition), do_label, false)?;
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);
        Ok(returns)
    }

    /// "for" "(" ident "=" expression ";" condition ";"
    ///       ident "=" ident ("+" | "-") step ")" sentence
    ///
    /// The step assignment is emitted after the body.
    fn parse_for(&mut self, node: &mut SyntaxNode, return_type: Type) -> Result<bool, ParseError> {
        self.terminal(node, TokenKind::For)?;
        self.terminal(node, TokenKind::OpenParen)?;

        let init = self.ident(node)?;
        self.check_assignable(&init);
        self.terminal(node, TokenKind::Assign)?;
        let (_, value) = self.parse_expression(node.add_rule(Rule::Expression))?;
        self.emitter.assign(&init.value, value)?;

        let for_label = self.alloc.fresh_label();
        self.emitter.label(for_label)?;
        self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);

        let end_label = self.alloc.fresh_label();
        self.parse_condition(node.add_rule(Rule::Condition), end_label, true)?;
        self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);

        let target = self.ident(node)?;
        self.check_assignable(&target);
        self.terminal(node, TokenKind::Assign)?;
        let source = self.ident(node)?;
        if self.symbols.lookup_nearest(&source.value).is_none() {
            self.error(source.line, DiagnosticKind::Undefined);
        }
        let op = match self.cursor.peek_kind(0) {
            Some(TokenKind::Plus) => ArithOp::Add,
            Some(TokenKind::Minus) => ArithOp::Sub,
            _ => return Err(self.unexpected("PLUS or MINU")),
        };
        self.leaf(node)?;
        let step_node = node.add_rule(Rule::Step);
        let step = self.parse_unsigned(step_node.add_rule(Rule::UnsignedInteger))?;
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);

        self.parse_sentence(node.add_rule(Rule::Sentence), return_type)?;
        self.emitter.step(&target.value, &source.value, op, step)?;
        self.emitter.jump(for_label)?;
        self.emitter.label(end_label)?;
        Ok(false)
    }

    /// Diagnoses an assignment to an unknown name or to a constant.
    fn check_assignable(&mut self, name: &Token) {
        match self.symbols.lookup_nearest(&name.value).map(|s| s.kind) {
            None => self.error(name.line, DiagnosticKind::Undefined),
            Some(Kind::Const) => self.error(name.line, DiagnosticKind::AssignToConst),
            Some(_) => {}
        }
    }

    /// Assignment or call statement, told apart by the token after the name.
    fn parse_ident_sentence(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        let name = self.cursor.current()?.value.clone();

        if self.cursor.peek_kind(1) == Some(TokenKind::OpenParen) {
            let callee = self.symbols.lookup_function(&name).cloned();
            match callee {
                Some(callee) => {
                    let rule = if callee.ty == Type::Void {
                        Rule::VoidCallSentence
                    } else {
                        Rule::ReturnCallSentence
                    };
                    self.parse_call(node.add_rule(rule), &callee)?;
                }
                None => self.skip_undefined_call(node)?,
            }
            self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
            return Ok(());
        }

        if self.symbols.lookup_nearest(&name).is_none() {
            let token = self.cursor.advance()?;
            self.error(token.line, DiagnosticKind::Undefined);
            return self.cursor.skip_past(TokenKind::SemiColon);
        }

        self.parse_assign(node.add_rule(Rule::AssignSentence))?;
        self.recoverable_terminal(node, TokenKind::SemiColon, DiagnosticKind::MissingSemicolon);
        Ok(())
    }

    /// assign_sentence = ident ["[" expression "]"] "=" expression
    fn parse_assign(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        let name = self.ident(node)?;
        self.check_assignable(&name);

        let index = if self.optional_terminal(node, TokenKind::OpenSquareBrace) {
            let (ty, index) = self.parse_expression(node.add_rule(Rule::Expression))?;
            if ty != Type::Int {
                self.error(self.cursor.last_line(), DiagnosticKind::IllegalArrayIndex);
            }
            self.recoverable_terminal(
                node,
                TokenKind::CloseSquareBrace,
                DiagnosticKind::MissingClosingBracket,
            );
            Some(index)
        } else {
            None
        };

        self.terminal(node, TokenKind::Assign)?;
        let (_, value) = self.parse_expression(node.add_rule(Rule::Expression))?;
        match index {
            Some(index) => self.emitter.assign_array(&name.value, index, value)?,
            None => self.emitter.assign(&name.value, value)?,
        }
        Ok(())
    }

    /// "scanf" "(" ident { "," ident } ")"
    fn parse_scanf(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        self.terminal(node, TokenKind::Scanf)?;
        self.terminal(node, TokenKind::OpenParen)?;
        loop {
            let name = self.ident(node)?;
            match self.symbols.lookup_nearest(&name.value).map(|s| s.ty) {
                Some(Type::Char) => self.emitter.scanf(Type::Char, &name.value)?,
                Some(_) => self.emitter.scanf(Type::Int, &name.value)?,
                None => self.error(name.line, DiagnosticKind::Undefined),
            }
            if !self.optional_terminal(node, TokenKind::Comma) {
                break;
            }
        }
        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);
        Ok(())
    }

    /// "printf" "(" (string ["," expression] | expression) ")"
    fn parse_printf(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        self.terminal(node, TokenKind::Printf)?;
        self.terminal(node, TokenKind::OpenParen)?;

        if self.cursor.is(TokenKind::StrCon) {
            let literal = self.leaf(node.add_rule(Rule::StringLiteral))?;
            let index = self.strings.intern(&literal.value);
            self.emitter.printf_string(index)?;
            if self.optional_terminal(node, TokenKind::Comma) {
                self.print_expression(node)?;
            }
        } else {
            self.print_expression(node)?;
        }

        self.recoverable_terminal(node, TokenKind::CloseParen, DiagnosticKind::MissingClosingParen);
        Ok(())
    }

    fn print_expression(&mut self, node: &mut SyntaxNode) -> Result<(), ParseError> {
        let (ty, value) = self.parse_expression(node.add_rule(Rule::Expression))?;
        match ty {
            Type::Char => self.emitter.printf_char(value)?,
            _ => self.emitter.printf_int(value)?,
        }
        self.emitter.printf_end()?;
        Ok(())
    }

    /// "return" ["(" expression ")"]. Returns whether a value is returned.
    fn parse_return(&mut self, node: &mut SyntaxNode, return_type: Type) -> Result<bool, ParseError> {
        self.terminal(node, TokenKind::Return)?;

        let ty = if self.optional_terminal(node, TokenKind::OpenParen) {
            let (ty, value) = self.parse_expression(node.add_rule(Rule::Expression))?;
            self.emitter.ret(value)?;
            self.recoverable_terminal(
                node,
                TokenKind::CloseParen,
                DiagnosticKind::MissingClosingParen,
            );
            ty
        } else {
            self.emitter.ret_void()?;
            Type::Void
        };

        let line = self.cursor.last_line();
        if return_type == Type::Void && ty != Type::Void {
            self.error(line, DiagnosticKind::ReturnInVoidFunction);
        } else if return_type != ty {
            self.error(line, DiagnosticKind::MissingOrWrongReturn);
        }
        Ok(ty != Type::Void)
    }
}
