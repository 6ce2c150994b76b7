use std::io::{self, Write};

use crate::analyzer::Type;

use super::{ArithOp, Label, Midcode, Operand, Reg, Relation};

/// Append-only midcode sink. Every method appends one instruction and
/// writes its trace line in the same call, so the structured stream and
/// the trace never drift apart. No semantic checks happen here.
pub struct MidcodeEmitter<W: Write> {
    code: Vec<Midcode>,
    trace: W,
}

impl MidcodeEmitter<io::Sink> {
    pub fn silent() -> Self {
        Self::new(io::sink())
    }
}

impl<W: Write> MidcodeEmitter<W> {
    pub fn new(trace: W) -> Self {
        Self {
            code: vec![],
            trace,
        }
    }

    pub fn code(&self) -> &[Midcode] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn finish(mut self) -> io::Result<(Vec<Midcode>, W)> {
        self.trace.flush()?;
        Ok((self.code, self.trace))
    }

    fn emit(&mut self, instr: Midcode) -> io::Result<()> {
        writeln!(self.trace, "{}", instr)?;
        self.code.push(instr);
        Ok(())
    }

    pub fn parameter(&mut self, ty: Type, name: &str) -> io::Result<()> {
        self.emit(Midcode::Param {
            ty,
            name: name.to_string(),
        })
    }

    pub fn variable(&mut self, ty: Type, name: &str, length: Option<usize>) -> io::Result<()> {
        self.emit(Midcode::Var {
            ty,
            name: name.to_string(),
            length,
        })
    }

    pub fn func_declare(&mut self, ty: Type, name: &str) -> io::Result<()> {
        self.emit(Midcode::FuncDeclare {
            ty,
            name: name.to_string(),
        })
    }

    pub fn label(&mut self, label: Label) -> io::Result<()> {
        self.emit(Midcode::Label(label))
    }

    pub fn jump(&mut self, label: Label) -> io::Result<()> {
        self.emit(Midcode::Jump(label))
    }

    /// Compares two operands. With `is_false_branch` the jump is taken when
    /// `relation` does not hold.
    pub fn branch(
        &mut self,
        relation: Relation,
        lhs: Operand,
        rhs: Operand,
        label: Label,
        is_false_branch: bool,
    ) -> io::Result<()> {
        self.emit(Midcode::Branch {
            relation: relation.branch(is_false_branch),
            lhs,
            rhs,
            label,
        })
    }

    /// Zero test: `bez` when jumping on false, `bnz` when jumping on true.
    pub fn branch_zero(
        &mut self,
        value: Operand,
        label: Label,
        is_false_branch: bool,
    ) -> io::Result<()> {
        if is_false_branch {
            self.emit(Midcode::Bez { value, label })
        } else {
            self.emit(Midcode::Bnz { value, label })
        }
    }

    pub fn reg_op_reg(&mut self, dst: Reg, lhs: Reg, rhs: Reg, op: ArithOp) -> io::Result<()> {
        self.arith(dst, op, lhs.into(), rhs.into())
    }

    pub fn reg_op_number(
        &mut self,
        dst: Reg,
        lhs: Reg,
        rhs: &str,
        op: ArithOp,
    ) -> io::Result<()> {
        self.arith(dst, op, lhs.into(), Operand::named(rhs))
    }

    pub fn number_op_reg(
        &mut self,
        dst: Reg,
        lhs: &str,
        rhs: Reg,
        op: ArithOp,
    ) -> io::Result<()> {
        self.arith(dst, op, Operand::named(lhs), rhs.into())
    }

    pub fn number_op_number(
        &mut self,
        dst: Reg,
        lhs: &str,
        rhs: &str,
        op: ArithOp,
    ) -> io::Result<()> {
        self.arith(dst, op, Operand::named(lhs), Operand::named(rhs))
    }

    fn arith(&mut self, dst: Reg, op: ArithOp, lhs: Operand, rhs: Operand) -> io::Result<()> {
        self.emit(Midcode::Arith { op, dst, lhs, rhs })
    }

    pub fn neg(&mut self, dst: Reg, value: Operand) -> io::Result<()> {
        self.emit(Midcode::Neg { dst, value })
    }

    pub fn step(&mut self, target: &str, source: &str, op: ArithOp, step: i64) -> io::Result<()> {
        self.emit(Midcode::Step {
            target: target.to_string(),
            source: source.to_string(),
            op,
            step,
        })
    }

    pub fn load(&mut self, dst: Reg, name: &str) -> io::Result<()> {
        self.emit(Midcode::Load {
            dst,
            name: name.to_string(),
        })
    }

    pub fn load_array(&mut self, dst: Reg, name: &str, index: Operand) -> io::Result<()> {
        self.emit(Midcode::LoadArray {
            dst,
            name: name.to_string(),
            index,
        })
    }

    pub fn assign(&mut self, name: &str, value: Operand) -> io::Result<()> {
        self.emit(Midcode::Assign {
            name: name.to_string(),
            value,
        })
    }

    pub fn assign_array(&mut self, name: &str, index: Operand, value: Operand) -> io::Result<()> {
        self.emit(Midcode::AssignArray {
            name: name.to_string(),
            index,
            value,
        })
    }

    pub fn save(&mut self, function: &str) -> io::Result<()> {
        self.emit(Midcode::Save {
            function: function.to_string(),
        })
    }

    pub fn push(&mut self, function: &str, value: Operand, position: usize) -> io::Result<()> {
        self.emit(Midcode::Push {
            function: function.to_string(),
            value,
            position,
        })
    }

    pub fn call(&mut self, function: &str) -> io::Result<()> {
        self.emit(Midcode::Call {
            function: function.to_string(),
        })
    }

    pub fn assign_return(&mut self, dst: Reg) -> io::Result<()> {
        self.emit(Midcode::AssignReturn { dst })
    }

    pub fn function_end(&mut self) -> io::Result<()> {
        self.emit(Midcode::FunctionEnd)
    }

    pub fn scanf(&mut self, ty: Type, name: &str) -> io::Result<()> {
        self.emit(Midcode::Scanf {
            ty,
            name: name.to_string(),
        })
    }

    pub fn printf_string(&mut self, index: usize) -> io::Result<()> {
        self.emit(Midcode::PrintfString { index })
    }

    pub fn printf_int(&mut self, value: Operand) -> io::Result<()> {
        self.emit(Midcode::PrintfInt { value })
    }

    pub fn printf_char(&mut self, value: Operand) -> io::Result<()> {
        self.emit(Midcode::PrintfChar { value })
    }

    pub fn printf_end(&mut self) -> io::Result<()> {
        self.emit(Midcode::PrintfEnd)
    }

    pub fn ret(&mut self, value: Operand) -> io::Result<()> {
        self.emit(Midcode::Return { value })
    }

    pub fn ret_void(&mut self) -> io::Result<()> {
        self.emit(Midcode::ReturnVoid)
    }
}
