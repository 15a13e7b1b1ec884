use crate::core::date_math::{days_in_month, weekday_of};
use crate::core::moment::CalendarDate;

pub const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
pub const GRID_COLUMNS: usize = 7;

// ── ViewMonth ─────────────────────────────────────────────────────────────────

/// The month currently shown in the grid. Independent of any selection.
/// `month` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewMonth {
    pub year: i32,
    pub month: u8,
}

impl ViewMonth {
    pub fn of(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn shift(self, delta: i32) -> Self {
        let total = self.month as i32 + delta;
        Self {
            year: self.year + total.div_euclid(12),
            month: total.rem_euclid(12) as u8,
        }
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn prev(self) -> Self {
        self.shift(-1)
    }

    #[cfg(test)]
    fn days(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// `None` when `day` does not exist in this month.
    pub fn date(self, day: u8) -> Option<CalendarDate> {
        CalendarDate::new(self.year, self.month, day)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    /// Padding before the 1st.
    Blank,
    Day(u8),
}

/// Leading blanks up to the weekday of the 1st (Sunday first), then every day
/// of the month, in row-major order for a 7-column grid. No trailing padding.
pub fn build_grid(year: i32, month: u8) -> Vec<DayCell> {
    let days = days_in_month(year, month);
    if days == 0 {
        return Vec::new();
    }
    let first_weekday = weekday_of(year, month, 1) as usize;
    let mut cells = Vec::with_capacity(first_weekday + days as usize);
    cells.extend(std::iter::repeat_n(DayCell::Blank, first_weekday));
    cells.extend((1..=days).map(DayCell::Day));
    cells
}

pub fn grid_row_count(cells: &[DayCell]) -> usize {
    cells.len().div_ceil(GRID_COLUMNS)
}

/// Row and column of `day` within `cells`.
#[cfg(test)]
fn day_position(cells: &[DayCell], day: u8) -> Option<(usize, usize)> {
    let idx = cells.iter().position(|cell| *cell == DayCell::Day(day))?;
    Some((idx / GRID_COLUMNS, idx % GRID_COLUMNS))
}
