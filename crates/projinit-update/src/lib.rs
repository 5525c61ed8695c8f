pub mod action;
pub mod applier;
pub mod planner;
pub mod templates;

pub use action::*;
pub use applier::*;
pub use planner::*;
pub use templates::*;
