//! Canonical display form: `"<MonthName> <DD>, <YYYY> <hh>:<mm> <AM|PM>"`.

use crate::core::moment::Moment;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 0-based month. Independent of the host locale.
pub fn month_name(month: u8) -> &'static str {
    MONTH_NAMES[month as usize % 12]
}

/// 24-hour clock to `(1..=12, "AM" | "PM")`.
pub fn to_twelve_hour(hour: u8) -> (u8, &'static str) {
    match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    }
}

pub fn format_moment(moment: Moment) -> String {
    let (hour, meridiem) = to_twelve_hour(moment.hour());
    format!(
        "{} {:02}, {:04} {:02}:{:02} {}",
        month_name(moment.month()),
        moment.day(),
        moment.year(),
        hour,
        moment.minute(),
        meridiem
    )
}
