pub mod calendar;
pub mod time_slots;
