use crate::core::moment::{CalendarDate, Moment};

pub const SLOTS_PER_DAY: u8 = 24;

/// The hourly slots for `date`: 00:00 through 23:00. Built on every call;
/// callers re-check each slot against the live clock.
pub fn build_slots(date: CalendarDate) -> Vec<Moment> {
    (0..SLOTS_PER_DAY)
        .filter_map(|hour| date.at(hour, 0))
        .collect()
}
