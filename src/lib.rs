pub mod app;
pub mod core;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use core::clock;
pub use core::config;
pub use core::format;
pub use core::moment;
pub use core::parser;

pub use runtime::event;

pub use state::coordinator;

pub use terminal::input_event;
pub use terminal::terminal_event;

pub use ui::placement;
pub use ui::span;
pub use ui::style;

pub use widgets::components::date_time_picker;
pub use widgets::shared::calendar;
pub use widgets::shared::time_slots;
