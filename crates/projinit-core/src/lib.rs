pub mod error;
pub mod model;
pub mod report;

pub use error::*;
pub use model::*;
pub use report::*;
