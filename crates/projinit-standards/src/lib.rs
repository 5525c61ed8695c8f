pub mod catalog;
pub mod config;
pub mod defaults;
pub mod loader;

pub use catalog::*;
pub use config::*;
pub use defaults::*;
pub use loader::*;
