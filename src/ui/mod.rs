pub mod placement;
pub mod span;
pub mod style;
