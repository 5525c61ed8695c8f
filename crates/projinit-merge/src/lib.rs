pub mod precommit;
pub mod toml_section;
pub mod yaml;

pub use precommit::*;
pub use toml_section::*;
pub use yaml::*;
