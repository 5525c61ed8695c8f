pub mod checker;
pub mod eval;

pub use checker::*;
pub use eval::*;
