mod emitter;
mod instr;
mod operand;

pub use emitter::*;
pub use instr::*;
pub use operand::*;

/// Renders a midcode stream as its textual trace, one instruction per line.
pub fn render(code: &[Midcode]) -> String {
    code.iter().map(|instr| format!("{}\n", instr)).collect()
}
