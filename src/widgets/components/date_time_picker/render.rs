use crate::core::format::{month_name, to_twelve_hour};
use crate::core::moment::{CalendarDate, Moment};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::shared::calendar::{
    DayCell, GRID_COLUMNS, ViewMonth, WEEKDAY_SHORT_NAMES, grid_row_count,
};

pub(super) const PANEL_WIDTH: u16 = 32;
const LEFT_PAD: u16 = 1;
const DAY_CELL_WIDTH: u16 = 3;
const SLOT_CELL_WIDTH: u16 = 5;
const SLOTS_PER_ROW: u16 = 6;
const SLOT_ROWS: u16 = 4;
/// Header, weekday names, and the blank row before the slots.
const FIXED_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerTarget {
    Field,
    PrevMonth,
    NextMonth,
    Day(u8),
    Slot(u8),
    /// Inside the panel but not on a control.
    Panel,
    Outside,
}

/// Row layout of the open panel:
///
/// ```text
/// 0          ‹  month year  ›
/// 1          Su Mo Tu We Th Fr Sa
/// 2..2+g     day grid (g rows)
/// 2+g        blank
/// 3+g..7+g   time slots, 6 per row
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub grid_rows: u16,
}

impl PanelLayout {
    pub fn for_cells(cells: &[DayCell]) -> Self {
        Self {
            grid_rows: grid_row_count(cells) as u16,
        }
    }

    pub fn height(self) -> u16 {
        FIXED_ROWS + self.grid_rows + SLOT_ROWS
    }

    pub fn width(self) -> u16 {
        PANEL_WIDTH
    }

    fn grid_start(self) -> u16 {
        2
    }

    fn slots_start(self) -> u16 {
        self.grid_start() + self.grid_rows + 1
    }
}

/// Maps a panel-relative cell to what it shows.
pub fn hit_test(layout: PanelLayout, cells: &[DayCell], row: u16, col: u16) -> PickerTarget {
    if row >= layout.height() || col >= layout.width() {
        return PickerTarget::Outside;
    }
    if row == 0 {
        return if col < 3 {
            PickerTarget::PrevMonth
        } else if col >= PANEL_WIDTH - 3 {
            PickerTarget::NextMonth
        } else {
            PickerTarget::Panel
        };
    }

    let Some(inner) = col.checked_sub(LEFT_PAD) else {
        return PickerTarget::Panel;
    };

    let grid = layout.grid_start()..layout.grid_start() + layout.grid_rows;
    if grid.contains(&row) {
        let column = inner / DAY_CELL_WIDTH;
        if column as usize >= GRID_COLUMNS || inner % DAY_CELL_WIDTH == 2 {
            return PickerTarget::Panel;
        }
        let idx = (row - layout.grid_start()) as usize * GRID_COLUMNS + column as usize;
        return match cells.get(idx) {
            Some(DayCell::Day(day)) => PickerTarget::Day(*day),
            _ => PickerTarget::Panel,
        };
    }

    let slots = layout.slots_start()..layout.slots_start() + SLOT_ROWS;
    if slots.contains(&row) {
        let column = inner / SLOT_CELL_WIDTH;
        if column >= SLOTS_PER_ROW || inner % SLOT_CELL_WIDTH == 4 {
            return PickerTarget::Panel;
        }
        let hour = (row - layout.slots_start()) * SLOTS_PER_ROW + column;
        return PickerTarget::Slot(hour as u8);
    }

    PickerTarget::Panel
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn disabled_style() -> Style {
    Style::new().color(Color::DarkGrey).strike()
}

fn selected_style() -> Style {
    Style::new().color(Color::Cyan).bold()
}

pub(super) fn header_line(view: ViewMonth) -> SpanLine {
    let title = format!("{} {}", month_name(view.month), view.year);
    let nav = Style::new().color(Color::Yellow);
    vec![
        Span::styled(" ‹ ", nav),
        Span::styled(format!("{title:^26}"), Style::new().bold()),
        Span::styled(" › ", nav),
    ]
}

pub(super) fn weekday_line() -> SpanLine {
    let names: String = WEEKDAY_SHORT_NAMES
        .iter()
        .map(|name| format!("{name} "))
        .collect();
    vec![Span::styled(
        format!(" {}", names.trim_end()),
        Style::new().color(Color::DarkGrey),
    )]
}

pub(super) struct GridMarks {
    pub view: ViewMonth,
    pub today: CalendarDate,
    pub chosen: CalendarDate,
}

pub(super) fn grid_lines(
    cells: &[DayCell],
    marks: &GridMarks,
    is_disabled: impl Fn(CalendarDate) -> bool,
) -> Vec<SpanLine> {
    cells
        .chunks(GRID_COLUMNS)
        .map(|row| {
            let mut line = vec![Span::new(" ")];
            for cell in row {
                let span = match cell {
                    DayCell::Blank => Span::new("   "),
                    DayCell::Day(day) => {
                        let text = format!("{day:>2} ");
                        match marks.view.date(*day) {
                            Some(date) if date == marks.chosen => Span::styled(text, selected_style()),
                            Some(date) if is_disabled(date) => Span::styled(text, disabled_style()),
                            Some(date) if date == marks.today => {
                                Span::styled(text, Style::new().color(Color::Yellow))
                            }
                            _ => Span::new(text),
                        }
                    }
                };
                line.push(span);
            }
            line
        })
        .collect()
}

pub(super) fn slot_label(hour: u8) -> String {
    let (hour, meridiem) = to_twelve_hour(hour);
    format!("{hour:02}{}", meridiem.to_ascii_lowercase())
}

pub(super) fn slot_lines(
    slots: &[Moment],
    selected: Moment,
    is_disabled: impl Fn(Moment) -> bool,
) -> Vec<SpanLine> {
    slots
        .chunks(SLOTS_PER_ROW as usize)
        .map(|row| {
            let mut line = vec![Span::new(" ")];
            for slot in row {
                let text = format!("{} ", slot_label(slot.hour()));
                let span = if *slot == selected {
                    Span::styled(text, selected_style())
                } else if is_disabled(*slot) {
                    Span::styled(text, disabled_style())
                } else {
                    Span::new(text)
                };
                line.push(span);
            }
            line
        })
        .collect()
}
