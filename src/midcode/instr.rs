use std::fmt;

use crate::analyzer::Type;

use super::{ArithOp, Label, Operand, OperandShape, Reg, Relation};

/// One midcode instruction. `Display` gives the trace line.
#[derive(Clone, Debug, PartialEq)]
pub enum Midcode {
    Param {
        ty: Type,
        name: String,
    },
    Var {
        ty: Type,
        name: String,
        length: Option<usize>,
    },
    FuncDeclare {
        ty: Type,
        name: String,
    },

    Label(Label),
    Jump(Label),
    Branch {
        relation: Relation,
        lhs: Operand,
        rhs: Operand,
        label: Label,
    },
    Bez {
        value: Operand,
        label: Label,
    },
    Bnz {
        value: Operand,
        label: Label,
    },

    Arith {
        op: ArithOp,
        dst: Reg,
        lhs: Operand,
        rhs: Operand,
    },
    Neg {
        dst: Reg,
        value: Operand,
    },
    Step {
        target: String,
        source: String,
        op: ArithOp,
        step: i64,
    },

    Load {
        dst: Reg,
        name: String,
    },
    LoadArray {
        dst: Reg,
        name: String,
        index: Operand,
    },
    Assign {
        name: String,
        value: Operand,
    },
    AssignArray {
        name: String,
        index: Operand,
        value: Operand,
    },

    Save {
        function: String,
    },
    Push {
        function: String,
        value: Operand,
        position: usize,
    },
    Call {
        function: String,
    },
    AssignReturn {
        dst: Reg,
    },
    FunctionEnd,

    Scanf {
        ty: Type,
        name: String,
    },
    PrintfString {
        index: usize,
    },
    PrintfInt {
        value: Operand,
    },
    PrintfChar {
        value: Operand,
    },
    PrintfEnd,

    Return {
        value: Operand,
    },
    ReturnVoid,
}

impl Midcode {
    pub fn shape(&self) -> Option<OperandShape> {
        match self {
            Midcode::Arith { lhs, rhs, .. } => Some(OperandShape::of(lhs, rhs)),
            _ => None,
        }
    }

    /// Register written by this instruction, if any.
    pub fn dst(&self) -> Option<Reg> {
        match self {
            Midcode::Arith { dst, .. }
            | Midcode::Neg { dst, .. }
            | Midcode::Load { dst, .. }
            | Midcode::LoadArray { dst, .. }
            | Midcode::AssignReturn { dst } => Some(*dst),
            _ => None,
        }
    }
}

impl fmt::Display for Midcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Midcode::Param { ty, name } => write!(f, "parameter {} {}", ty.keyword(), name),
            Midcode::Var {
                ty,
                name,
                length: None,
            } => write!(f, "variable {} {}", ty.keyword(), name),
            Midcode::Var {
                ty,
                name,
                length: Some(length),
            } => write!(f, "variable {} {}[{}]", ty.keyword(), name, length),
            Midcode::FuncDeclare { ty, name } => write!(f, "{} {}()", ty.keyword(), name),

            Midcode::Label(label) => write!(f, "{}:", label),
            Midcode::Jump(label) => write!(f, "jump {}", label),
            Midcode::Branch {
                relation,
                lhs,
                rhs,
                label,
            } => write!(f, "{} {} {} {}", relation.opcode(), lhs, rhs, label),
            Midcode::Bez { value, label } => write!(f, "bez {} {}", value, label),
            Midcode::Bnz { value, label } => write!(f, "bnz {} {}", value, label),

            Midcode::Arith { op, dst, lhs, rhs } => {
                write!(f, "{} = {} {} {}", dst, lhs, op.symbol(), rhs)
            }
            Midcode::Neg { dst, value } => write!(f, "{} = -{}", dst, value),
            Midcode::Step {
                target,
                source,
                op,
                step,
            } => write!(f, "{} = {} {} {}", target, source, op.symbol(), step),

            Midcode::Load { dst, name } => write!(f, "{} = {}", dst, name),
            Midcode::LoadArray { dst, name, index } => write!(f, "{} = {}[{}]", dst, name, index),
            Midcode::Assign { name, value } => write!(f, "{} = {}", name, value),
            Midcode::AssignArray { name, index, value } => {
                write!(f, "{}[{}] = {}", name, index, value)
            }

            Midcode::Save { function } => write!(f, "save {}", function),
            Midcode::Push { value, .. } => write!(f, "push {}", value),
            Midcode::Call { function } => write!(f, "call {}", function),
            Midcode::AssignReturn { dst } => write!(f, "{} = RET", dst),
            Midcode::FunctionEnd => write!(f, "function end"),

            Midcode::Scanf { ty, name } => write!(f, "scanf {} {}", ty.keyword(), name),
            Midcode::PrintfString { index } => write!(f, "printf str_{}", index),
            Midcode::PrintfInt { value } => write!(f, "printf int {}", value),
            Midcode::PrintfChar { value } => write!(f, "printf char {}", value),
            Midcode::PrintfEnd => write!(f, "printf_end"),

            Midcode::Return { value } => write!(f, "return {}", value),
            Midcode::ReturnVoid => write!(f, "return"),
        }
    }
}
