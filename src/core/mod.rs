pub mod clock;
pub mod config;
pub mod date_math;
pub mod format;
pub mod moment;
pub mod parser;
