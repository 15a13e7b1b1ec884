pub mod components;
pub mod shared;
pub mod traits;
