mod cursor;
mod kind;
mod listing;

pub use cursor::*;
pub use kind::*;
pub use listing::*;
