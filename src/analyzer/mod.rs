mod diagnostic;
mod string_table;
mod symbol_table;
mod ty;

pub use diagnostic::*;
pub use string_table::*;
pub use symbol_table::*;
pub use ty::*;
