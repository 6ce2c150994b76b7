use std::fmt;

use crate::token::TokenKind;

/// Virtual register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reg(pub usize);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub usize);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label_{}", self.0)
    }
}

/// Either a virtual register or something the backend can use directly:
/// a variable name, an integer literal or a quoted char literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Reg(Reg),
    Named(String),
}

impl Operand {
    pub fn named(name: impl Into<String>) -> Self {
        Operand::Named(name.into())
    }

    pub fn is_reg(&self) -> bool {
        matches!(self, Operand::Reg(_))
    }

    pub fn as_reg(&self) -> Option<Reg> {
        match self {
            Operand::Reg(r) => Some(*r),
            Operand::Named(_) => None,
        }
    }

    pub fn as_int_literal(&self) -> Option<i64> {
        match self {
            Operand::Named(s) => s.parse().ok(),
            Operand::Reg(_) => None,
        }
    }
}

impl From<Reg> for Operand {
    fn from(reg: Reg) -> Self {
        Operand::Reg(reg)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{}", r),
            Operand::Named(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_token(kind: TokenKind) -> Option<ArithOp> {
        match kind {
            TokenKind::Plus => Some(ArithOp::Add),
            TokenKind::Minus => Some(ArithOp::Sub),
            TokenKind::Mult => Some(ArithOp::Mul),
            TokenKind::Div => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Which operands of an arithmetic instruction live in registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandShape {
    RegOpReg,
    RegOpNumber,
    NumberOpReg,
    NumberOpNumber,
}

impl OperandShape {
    pub fn of(lhs: &Operand, rhs: &Operand) -> Self {
        match (lhs.is_reg(), rhs.is_reg()) {
            (true, true) => OperandShape::RegOpReg,
            (true, false) => OperandShape::RegOpNumber,
            (false, true) => OperandShape::NumberOpReg,
            (false, false) => OperandShape::NumberOpNumber,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Eq,
    Ne,
    Lt,
    Ge,
    Le,
    Gt,
}

impl Relation {
    pub fn from_token(kind: TokenKind) -> Option<Relation> {
        match kind {
            TokenKind::DoubleEqual => Some(Relation::Eq),
            TokenKind::NotEqual => Some(Relation::Ne),
            TokenKind::LessThan => Some(Relation::Lt),
            TokenKind::GreaterEqual => Some(Relation::Ge),
            TokenKind::LessEqual => Some(Relation::Le),
            TokenKind::GreaterThan => Some(Relation::Gt),
            _ => None,
        }
    }

    pub fn negate(&self) -> Relation {
        match self {
            Relation::Eq => Relation::Ne,
            Relation::Ne => Relation::Eq,
            Relation::Lt => Relation::Ge,
            Relation::Ge => Relation::Lt,
            Relation::Le => Relation::Gt,
            Relation::Gt => Relation::Le,
        }
    }

    /// Relation to branch on. A false branch jumps when the condition does
    /// not hold, so it uses the complementary opcode.
    pub fn branch(&self, is_false_branch: bool) -> Relation {
        if is_false_branch {
            self.negate()
        } else {
            *self
        }
    }

    pub fn opcode(&self) -> &'static str {
        match self {
            Relation::Eq => "beq",
            Relation::Ne => "bne",
            Relation::Lt => "blt",
            Relation::Ge => "bge",
            Relation::Le => "ble",
            Relation::Gt => "bgt",
        }
    }
}

/// Register and label numbering for a whole compilation unit. Numbers are
/// never reused, even across functions, so backends must not assume they
/// start over per function.
#[derive(Debug, Default)]
pub struct Allocator {
    reg_count: usize,
    label_count: usize,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_reg(&mut self) -> Reg {
        let reg = Reg(self.reg_count);
        self.reg_count += 1;
        reg
    }

    pub fn fresh_label(&mut self) -> Label {
        let label = Label(self.label_count);
        self.label_count += 1;
        label
    }

    pub fn reg_count(&self) -> usize {
        self.reg_count
    }

    pub fn label_count(&self) -> usize {
        self.label_count
    }
}
