pub mod detector;
pub mod markers;

pub use detector::*;
pub use markers::*;
