mod render;

use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{ConfigError, PickerConfig};
use crate::core::format::format_moment;
use crate::core::moment::{CalendarDate, Moment};
use crate::core::parser::TextMomentParser;
use crate::runtime::event::WidgetAction;
use crate::state::coordinator::{OpenCoordinator, OpenNotice, WidgetId};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::placement::{self, Direction, ESTIMATED_PANEL_HEIGHT, HostGeometry};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::shared::calendar::{DayCell, ViewMonth, build_grid};
use crate::widgets::shared::time_slots::build_slots;
use crate::widgets::traits::{
    DrawOutput, Drawable, InteractionResult, Interactive, PointerHit, RenderContext,
};
use render::GridMarks;
use std::sync::mpsc::Receiver;

pub use render::{PanelLayout, PickerTarget, hit_test};

pub type ChangeCallback = Box<dyn FnMut(Moment) + Send>;

// ── Options ───────────────────────────────────────────────────────────────────

pub struct PickerOptions {
    value: Option<Moment>,
    label: String,
    min_date: Option<CalendarDate>,
    estimated_panel_height: u16,
    clock: Box<dyn Clock>,
    on_change: Option<ChangeCallback>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            value: None,
            label: String::new(),
            min_date: None,
            estimated_panel_height: ESTIMATED_PANEL_HEIGHT,
            clock: Box::new(SystemClock),
            on_change: None,
        }
    }
}

impl PickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PickerConfig) -> Result<Self, ConfigError> {
        let mut options = Self::new().with_label(config.label.clone());
        options.value = config.initial_value()?;
        options.min_date = config.min_date()?;
        if let Some(rows) = config.estimated_panel_height {
            options.estimated_panel_height = rows;
        }
        Ok(options)
    }

    /// Initial selection. Without one the picker starts at "now".
    pub fn with_value(mut self, value: Moment) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Earliest selectable day. Without one it is "today".
    pub fn with_min_date(mut self, date: CalendarDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn with_estimated_panel_height(mut self, rows: u16) -> Self {
        self.estimated_panel_height = rows;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Called with the final moment on every commit.
    pub fn on_change(mut self, callback: impl FnMut(Moment) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

// ── Draft ─────────────────────────────────────────────────────────────────────

/// A day picked from the grid while the time is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Draft {
    pub date: Option<CalendarDate>,
}

// ── DateTimePicker ────────────────────────────────────────────────────────────

/// Text field with a calendar and hourly time dropdown.
///
/// Selection is two-phase: a day click fills [`Draft::date`]. A time slot
/// click combines it with the slot hour, commits, closes the panel and
/// fires `on_change`. Typing a parseable, non-past moment commits directly.
///
/// Disabling differs between days and slots. A day is disabled when its
/// date is before the floor (`min_date`, else today). A slot is disabled
/// when its full timestamp is before the clock's current minute. Both are
/// re-read from the clock on every check.
///
/// Open state belongs to the shared [`OpenCoordinator`]: `is_open` is only
/// true while the coordinator holds this picker's id.
pub struct DateTimePicker {
    id: WidgetId,
    label: String,
    coordinator: OpenCoordinator,
    notices: Receiver<OpenNotice>,
    open: bool,
    view: ViewMonth,
    selected: Moment,
    draft: Draft,
    text: String,
    direction: Direction,
    placement_pending: bool,
    min_date: Option<CalendarDate>,
    panel_height: u16,
    clock: Box<dyn Clock>,
    on_change: Option<ChangeCallback>,
}

impl DateTimePicker {
    pub fn new(coordinator: &OpenCoordinator, options: PickerOptions) -> Self {
        let registration = coordinator.register();
        let selected = options.value.unwrap_or_else(|| options.clock.now());
        Self {
            id: registration.id,
            label: options.label,
            coordinator: coordinator.clone(),
            notices: registration.notices,
            open: false,
            view: ViewMonth::of(selected.date()),
            selected,
            draft: Draft::default(),
            text: format_moment(selected),
            direction: Direction::default(),
            placement_pending: false,
            min_date: options.min_date,
            panel_height: options.estimated_panel_height,
            clock: options.clock,
            on_change: options.on_change,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.open && self.coordinator.is_open(self.id)
    }

    /// Last committed moment.
    pub fn selected(&self) -> Moment {
        self.selected
    }

    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// The selection as currently shown: the draft day at the selected time.
    pub fn pending(&self) -> Moment {
        match self.draft.date {
            Some(date) => self.selected.with_date(date),
            None => self.selected,
        }
    }

    pub fn text_value(&self) -> &str {
        &self.text
    }

    pub fn view_month(&self) -> ViewMonth {
        self.view
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn placement_pending(&self) -> bool {
        self.placement_pending
    }

    pub fn min_date(&self) -> Option<CalendarDate> {
        self.min_date
    }

    pub fn grid(&self) -> Vec<DayCell> {
        build_grid(self.view.year, self.view.month)
    }

    /// Date the time slots belong to. Follows day clicks, not navigation.
    pub fn slot_date(&self) -> CalendarDate {
        self.draft.date.unwrap_or_else(|| self.selected.date())
    }

    pub fn slots(&self) -> Vec<Moment> {
        build_slots(self.slot_date())
    }

    pub fn panel_layout(&self) -> PanelLayout {
        PanelLayout::for_cells(&self.grid())
    }

    // ── Disabling ─────────────────────────────────────────────────────────────

    fn day_floor(&self) -> CalendarDate {
        self.min_date.unwrap_or_else(|| self.clock.today())
    }

    pub fn is_day_disabled(&self, date: CalendarDate) -> bool {
        date < self.day_floor()
    }

    pub fn is_slot_disabled(&self, slot: Moment) -> bool {
        slot < self.clock.now()
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Drains open notices. A notice for another picker closes this one,
    /// unless this picker has reopened since and holds the slot again.
    pub fn sync(&mut self) -> InteractionResult {
        let mut opened_by = None;
        while let Ok(notice) = self.notices.try_recv() {
            if notice.id != self.id {
                opened_by = Some(notice.id);
            }
        }
        let Some(other) = opened_by else {
            return InteractionResult::ignored();
        };
        if !self.open {
            return InteractionResult::ignored();
        }
        if self.coordinator.is_open(self.id) {
            log::trace!("{} ignoring stale open notice from {other}", self.id);
            return InteractionResult::ignored();
        }
        self.open = false;
        self.placement_pending = false;
        log::debug!("{} closed because {other} opened", self.id);
        InteractionResult::with_action(WidgetAction::Closed { id: self.id })
    }

    /// Local open flag, before the coordinator is consulted.
    #[cfg(test)]
    fn open_flag(&self) -> bool {
        self.open
    }

    /// Field click: opens (requesting placement after layout) or, if already
    /// open, closes.
    pub fn click_field(&mut self) -> InteractionResult {
        let mut result = self.sync();
        if self.open {
            result.merge(self.close());
            return result;
        }
        self.coordinator.request_open(self.id);
        self.open = true;
        self.placement_pending = true;
        result.merge(InteractionResult::with_action(WidgetAction::Opened {
            id: self.id,
        }));
        result.merge(InteractionResult::with_action(
            WidgetAction::MeasureAfterLayout { id: self.id },
        ));
        result
    }

    /// Deferred placement. A no-op unless a measurement is pending and the
    /// picker is still open.
    pub fn place(&mut self, geometry: &dyn HostGeometry) -> InteractionResult {
        if !std::mem::take(&mut self.placement_pending) || !self.is_open() {
            return InteractionResult::ignored();
        }
        let direction = placement::measure(geometry, self.id, self.panel_height);
        if direction == self.direction {
            return InteractionResult::ignored();
        }
        log::debug!("{} drops {:?}", self.id, direction);
        self.direction = direction;
        InteractionResult::handled()
    }

    /// Text edit. The raw text is always kept; the selection only moves for
    /// a parseable moment that is not in the past.
    pub fn type_text(&mut self, text: &str) -> InteractionResult {
        self.text = text.to_string();
        let Some(moment) = TextMomentParser::parse(text) else {
            return InteractionResult::handled();
        };
        if moment < self.clock.now() {
            log::debug!("{} ignoring past moment {moment}", self.id);
            return InteractionResult::handled();
        }
        self.selected = moment;
        self.draft = Draft::default();
        let mut result = InteractionResult::handled();
        result.merge(self.commit(moment));
        result
    }

    pub fn click_day(&mut self, day: u8) -> InteractionResult {
        if !self.is_open() {
            return InteractionResult::ignored();
        }
        let Some(date) = self.view.date(day) else {
            return InteractionResult::ignored();
        };
        if self.is_day_disabled(date) {
            log::debug!("{} ignoring disabled day {date}", self.id);
            return InteractionResult::ignored();
        }
        self.draft.date = Some(date);
        self.text = format_moment(self.pending());
        InteractionResult::handled()
    }

    pub fn click_slot(&mut self, hour: u8) -> InteractionResult {
        if !self.is_open() {
            return InteractionResult::ignored();
        }
        let Some(slot) = self.slot_date().at(hour, 0) else {
            return InteractionResult::ignored();
        };
        if self.is_slot_disabled(slot) {
            log::debug!("{} ignoring past slot {slot}", self.id);
            return InteractionResult::ignored();
        }
        self.selected = slot;
        self.draft = Draft::default();
        self.text = format_moment(slot);
        let mut result = self.close();
        result.merge(self.commit(slot));
        result
    }

    /// Closes without committing. The draft, if any, is kept.
    pub fn click_outside(&mut self) -> InteractionResult {
        let mut result = self.sync();
        if self.open {
            result.merge(self.close());
        }
        result
    }

    pub fn next_month(&mut self) -> InteractionResult {
        self.view = self.view.next();
        InteractionResult::handled()
    }

    pub fn prev_month(&mut self) -> InteractionResult {
        self.view = self.view.prev();
        InteractionResult::handled()
    }

    pub fn activate(&mut self, target: PickerTarget) -> InteractionResult {
        match target {
            PickerTarget::Field => self.click_field(),
            PickerTarget::PrevMonth => self.prev_month(),
            PickerTarget::NextMonth => self.next_month(),
            PickerTarget::Day(day) => self.click_day(day),
            PickerTarget::Slot(hour) => self.click_slot(hour),
            PickerTarget::Panel => InteractionResult::handled(),
            PickerTarget::Outside => self.click_outside(),
        }
    }

    fn close(&mut self) -> InteractionResult {
        let was_open = std::mem::replace(&mut self.open, false);
        self.placement_pending = false;
        self.coordinator.notify_closed(self.id);
        if was_open {
            InteractionResult::with_action(WidgetAction::Closed { id: self.id })
        } else {
            InteractionResult::ignored()
        }
    }

    fn commit(&mut self, moment: Moment) -> InteractionResult {
        log::debug!("{} committed {moment}", self.id);
        if let Some(callback) = self.on_change.as_mut() {
            callback(moment);
        }
        InteractionResult::with_action(WidgetAction::ValueCommitted {
            id: self.id,
            moment,
        })
    }
}

impl Drop for DateTimePicker {
    fn drop(&mut self) {
        self.coordinator.unregister(self.id);
    }
}

// ── Drawable ──────────────────────────────────────────────────────────────────

impl Drawable for DateTimePicker {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = ctx.focused == Some(self.id);
        let marker = if focused { ">" } else { " " };
        let arrow = match (self.is_open(), self.direction) {
            (false, _) => "▸",
            (true, Direction::Down) => "▾",
            (true, Direction::Up) => "▴",
        };
        let text_style = if focused {
            Style::new().color(Color::Cyan)
        } else {
            Style::default()
        };
        DrawOutput {
            lines: vec![vec![
                Span::new(format!("{marker} {}: ", self.label)),
                Span::styled(self.text.clone(), text_style),
                Span::styled(format!(" {arrow}"), Style::new().color(Color::DarkGrey)),
            ]],
        }
    }

    fn draw_overlay(&self, _ctx: &RenderContext) -> Option<DrawOutput> {
        if !self.is_open() {
            return None;
        }
        let cells = self.grid();
        let marks = GridMarks {
            view: self.view,
            today: self.clock.today(),
            chosen: self.slot_date(),
        };
        let mut lines = vec![render::header_line(self.view), render::weekday_line()];
        lines.extend(render::grid_lines(&cells, &marks, |date| {
            self.is_day_disabled(date)
        }));
        lines.push(vec![Span::new("")]);
        lines.extend(render::slot_lines(&self.slots(), self.selected, |slot| {
            self.is_slot_disabled(slot)
        }));
        Some(DrawOutput { lines })
    }
}

// ── Interactive ───────────────────────────────────────────────────────────────

impl Interactive for DateTimePicker {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Enter => self.click_field(),
            KeyCode::Esc => self.click_outside(),
            KeyCode::PageUp => self.prev_month(),
            KeyCode::PageDown => self.next_month(),
            KeyCode::Backspace => {
                let mut text = self.text.clone();
                if text.pop().is_none() {
                    return InteractionResult::ignored();
                }
                self.type_text(&text)
            }
            KeyCode::Char(ch)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut text = self.text.clone();
                text.push(ch);
                self.type_text(&text)
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_pointer(&mut self, hit: PointerHit) -> InteractionResult {
        match hit {
            PointerHit::Field => self.click_field(),
            PointerHit::Outside => self.click_outside(),
            PointerHit::Overlay { row, col } => {
                if !self.is_open() {
                    return InteractionResult::ignored();
                }
                let cells = self.grid();
                let target = hit_test(PanelLayout::for_cells(&cells), &cells, row, col);
                self.activate(target)
            }
        }
    }

    fn sync(&mut self) -> InteractionResult {
        DateTimePicker::sync(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{DateTimePicker, Draft, PickerOptions, PickerTarget};
    use crate::core::clock::FixedClock;
    use crate::core::config::PickerConfig;
    use crate::core::moment::{CalendarDate, Moment};
    use crate::runtime::event::WidgetAction;
    use crate::state::coordinator::{OpenCoordinator, WidgetId};
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::ui::placement::{Direction, HostGeometry, Rect};
    use crate::ui::span::line_text;
    use crate::widgets::shared::calendar::ViewMonth;
    use crate::widgets::traits::{Drawable, Interactive, PointerHit, RenderContext};
    use std::sync::{Arc, Mutex};

    fn at(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> Moment {
        Moment::new(year, month, day, hour, minute).expect("valid moment")
    }

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    /// "Now" is 2025-06-10 10:00 unless a test moves the clock.
    fn clock() -> FixedClock {
        FixedClock::new(at(2025, 5, 10, 10, 0))
    }

    type Changes = Arc<Mutex<Vec<Moment>>>;

    fn picker(coordinator: &OpenCoordinator, clock: &FixedClock) -> (DateTimePicker, Changes) {
        let changes: Changes = Arc::default();
        let sink = Arc::clone(&changes);
        let options = PickerOptions::new()
            .with_label("Pick-up")
            .with_clock(clock.clone())
            .on_change(move |m| sink.lock().expect("sink").push(m));
        (DateTimePicker::new(coordinator, options), changes)
    }

    fn changes(log: &Changes) -> Vec<Moment> {
        log.lock().expect("changes").clone()
    }

    struct Viewport {
        height: u16,
        anchors: Vec<(WidgetId, Rect)>,
    }

    impl HostGeometry for Viewport {
        fn anchor_rect(&self, id: WidgetId) -> Option<Rect> {
            self.anchors.iter().find(|(a, _)| *a == id).map(|(_, r)| *r)
        }
        fn viewport_height(&self) -> u16 {
            self.height
        }
    }

    #[test]
    fn starts_closed_at_now_when_no_value_given() {
        let coordinator = OpenCoordinator::new();
        let (p, _) = picker(&coordinator, &clock());
        assert!(!p.is_open());
        assert_eq!(p.selected(), at(2025, 5, 10, 10, 0));
        assert_eq!(p.text_value(), "June 10, 2025 10:00 AM");
        assert_eq!(p.view_month(), ViewMonth { year: 2025, month: 5 });
        assert_eq!(p.direction(), Direction::Down);
    }

    #[test]
    fn initial_value_seeds_selection_and_view() {
        let coordinator = OpenCoordinator::new();
        let options = PickerOptions::new()
            .with_clock(clock())
            .with_value(at(2025, 8, 3, 15, 0));
        let p = DateTimePicker::new(&coordinator, options);
        assert_eq!(p.selected(), at(2025, 8, 3, 15, 0));
        assert_eq!(p.text_value(), "September 03, 2025 03:00 PM");
        assert_eq!(p.view_month(), ViewMonth { year: 2025, month: 8 });
    }

    #[test]
    fn typing_a_future_moment_commits_it() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        let result = p.type_text("March 5, 2026 2:30 pm");
        assert_eq!(p.selected(), at(2026, 2, 5, 14, 30));
        assert_eq!(p.text_value(), "March 5, 2026 2:30 pm");
        assert_eq!(changes(&log), vec![at(2026, 2, 5, 14, 30)]);
        assert!(result.actions.contains(&WidgetAction::ValueCommitted {
            id: p.id,
            moment: at(2026, 2, 5, 14, 30),
        }));
    }

    #[test]
    fn unparseable_text_keeps_selection() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        let before = p.selected();
        p.type_text("not a date");
        assert_eq!(p.selected(), before);
        assert_eq!(p.text_value(), "not a date");
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn typing_a_past_moment_is_silently_ignored() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.type_text("March 5, 2025 2:30 pm");
        assert_eq!(p.selected(), at(2025, 5, 10, 10, 0));
        assert_eq!(p.text_value(), "March 5, 2025 2:30 pm");
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn keystrokes_edit_the_text_field() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        for _ in 0.."June 10, 2025 10:00 AM".len() {
            p.on_key(KeyEvent::plain(KeyCode::Backspace));
        }
        assert_eq!(p.text_value(), "");
        for ch in "2025-07-01 08:15".chars() {
            p.on_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
        assert_eq!(p.text_value(), "2025-07-01 08:15");
        assert_eq!(p.selected(), at(2025, 6, 1, 8, 15));
        // Parseable prefixes such as "2025-07-01" commit along the way.
        assert_eq!(changes(&log).last(), Some(&at(2025, 6, 1, 8, 15)));
    }

    #[test]
    fn opening_another_picker_closes_the_first() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        let (mut a, _) = picker(&coordinator, &c);
        let (mut b, _) = picker(&coordinator, &c);

        a.click_field();
        assert!(a.is_open());

        b.click_field();
        assert!(b.is_open());
        assert!(!a.is_open());

        let result = a.sync();
        assert!(result.actions.contains(&WidgetAction::Closed { id: a.id }));
        assert_eq!(coordinator.current(), Some(b.id));
        assert!(!a.placement_pending());
    }

    #[test]
    fn at_most_one_picker_open_after_any_sequence() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        let mut pickers: Vec<DateTimePicker> = (0..5).map(|_| picker(&coordinator, &c).0).collect();
        let sequence = [0usize, 3, 3, 1, 4, 2, 2, 0, 4, 1, 3];
        for (step, idx) in sequence.iter().enumerate() {
            if step % 4 == 3 {
                pickers[*idx].click_outside();
            } else {
                pickers[*idx].click_field();
            }
            for p in pickers.iter_mut() {
                p.sync();
            }
            let open: Vec<WidgetId> = pickers.iter().filter(|p| p.is_open()).map(|p| p.id).collect();
            assert!(open.len() <= 1, "step {step}: {open:?}");
            assert_eq!(open.first().copied(), coordinator.current());
        }
    }

    #[test]
    fn reopening_after_a_stale_notice_stays_open() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        let (mut a, _) = picker(&coordinator, &c);
        let (mut b, _) = picker(&coordinator, &c);
        a.click_field();
        b.click_field();
        // A reopens before draining B's notice.
        a.click_field();
        a.sync();
        b.sync();
        assert!(a.is_open());
        assert!(!b.is_open());
    }

    #[test]
    fn queued_open_notice_closes_the_picker() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        let (mut a, _) = picker(&coordinator, &c);
        let (b, _) = picker(&coordinator, &c);
        a.click_field();

        coordinator.request_open(b.id);
        assert!(a.open_flag(), "nothing changes until the notice is drained");

        let result = a.sync();
        assert_eq!(result.actions, vec![WidgetAction::Closed { id: a.id }]);
        assert!(!a.open_flag());
        assert!(!a.placement_pending());
        assert!(!a.sync().handled);
    }

    #[test]
    fn notice_closes_even_after_the_opener_closed_again() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        let (mut a, _) = picker(&coordinator, &c);
        let (mut b, _) = picker(&coordinator, &c);
        a.click_field();
        b.click_field();
        b.click_outside();
        assert_eq!(coordinator.current(), None);

        assert!(a.open_flag());
        assert!(a.sync().handled);
        assert!(!a.open_flag());
        assert_eq!(coordinator.current(), None);
    }

    #[test]
    fn own_notices_never_close() {
        let coordinator = OpenCoordinator::new();
        let (mut a, _) = picker(&coordinator, &clock());
        a.click_field();
        coordinator.request_open(a.id);
        assert!(!a.sync().handled);
        assert!(a.is_open());
    }

    #[test]
    fn clicking_open_field_toggles_closed() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.click_field();
        p.click_field();
        assert!(!p.is_open());
        assert_eq!(coordinator.current(), None);
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn past_day_click_is_ignored() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        p.click_field();
        let text = p.text_value().to_string();

        let result = p.click_day(9);
        assert!(!result.handled);
        assert_eq!(p.draft(), Draft::default());
        assert_eq!(p.text_value(), text);
        assert!(p.is_day_disabled(date(2025, 5, 9)));
        assert!(!p.is_day_disabled(date(2025, 5, 10)));
        assert!(!p.is_day_disabled(date(2025, 5, 11)));
    }

    #[test]
    fn day_click_drafts_without_closing_or_notifying() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.click_field();
        p.click_day(14);

        assert!(p.is_open());
        assert_eq!(p.draft().date, Some(date(2025, 5, 14)));
        assert_eq!(p.selected(), at(2025, 5, 10, 10, 0));
        assert_eq!(p.pending(), at(2025, 5, 14, 10, 0));
        assert_eq!(p.text_value(), "June 14, 2025 10:00 AM");
        assert_eq!(p.slot_date(), date(2025, 5, 14));
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn typed_commit_clears_the_draft() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.click_field();
        p.click_day(14);
        assert_eq!(p.draft().date, Some(date(2025, 5, 14)));

        p.type_text("2025-07-01 08:15");
        assert_eq!(p.draft(), Draft::default());
        assert_eq!(p.selected(), at(2025, 6, 1, 8, 15));
        assert_eq!(p.slot_date(), date(2025, 6, 1));
        assert_eq!(changes(&log), vec![at(2025, 6, 1, 8, 15)]);
    }

    #[test]
    fn rejected_edits_keep_the_draft() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.click_field();
        p.click_day(14);

        p.type_text("not a date");
        assert_eq!(p.draft().date, Some(date(2025, 5, 14)));
        assert_eq!(p.slot_date(), date(2025, 5, 14));

        // Parses, but is before now.
        p.type_text("2025-06-01 08:00");
        assert_eq!(p.draft().date, Some(date(2025, 5, 14)));
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn slot_click_commits_closes_and_notifies_once() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.click_field();
        p.click_day(14);
        let result = p.click_slot(16);

        assert!(!p.is_open());
        assert_eq!(p.selected(), at(2025, 5, 14, 16, 0));
        assert_eq!(p.draft(), Draft::default());
        assert_eq!(p.text_value(), "June 14, 2025 04:00 PM");
        assert_eq!(changes(&log), vec![at(2025, 5, 14, 16, 0)]);
        assert!(result.actions.contains(&WidgetAction::Closed { id: p.id }));
    }

    #[test]
    fn slot_disabling_compares_full_timestamp() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        c.set(at(2025, 5, 10, 9, 30));
        let (mut p, log) = picker(&coordinator, &c);
        p.click_field();

        assert!(p.is_slot_disabled(at(2025, 5, 10, 9, 0)));
        assert!(!p.click_slot(9).handled);
        assert!(p.is_open());
        assert!(changes(&log).is_empty());

        p.click_day(11);
        assert!(!p.is_slot_disabled(at(2025, 5, 11, 9, 0)));
        assert!(p.click_slot(9).handled);
        assert_eq!(changes(&log), vec![at(2025, 5, 11, 9, 0)]);
    }

    #[test]
    fn slot_at_current_minute_is_enabled() {
        let coordinator = OpenCoordinator::new();
        let c = clock();
        let (p, _) = picker(&coordinator, &c);
        assert!(!p.is_slot_disabled(at(2025, 5, 10, 10, 0)));
        assert!(p.is_slot_disabled(at(2025, 5, 10, 9, 59)));
        c.set(at(2025, 5, 10, 10, 1));
        assert!(p.is_slot_disabled(at(2025, 5, 10, 10, 0)));
    }

    #[test]
    fn browsing_months_keeps_selection_and_slot_date() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        let start = p.view_month();
        for _ in 0..3 {
            p.next_month();
        }
        assert_eq!(p.view_month(), ViewMonth { year: 2025, month: 8 });
        assert_eq!(p.slot_date(), date(2025, 5, 10));
        for _ in 0..3 {
            p.prev_month();
        }
        assert_eq!(p.view_month(), start);
        assert_eq!(p.selected(), at(2025, 5, 10, 10, 0));
    }

    #[test]
    fn day_click_uses_the_viewed_month() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        p.click_field();
        p.next_month();
        p.click_day(2);
        assert_eq!(p.draft().date, Some(date(2025, 6, 2)));
        assert!(!p.click_day(32).handled);
    }

    #[test]
    fn clicking_outside_closes_without_notifying() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.click_field();
        p.click_day(20);
        p.click_outside();
        assert!(!p.is_open());
        assert_eq!(coordinator.current(), None);
        assert_eq!(p.selected(), at(2025, 5, 10, 10, 0));
        assert_eq!(p.draft().date, Some(date(2025, 5, 20)));
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn panel_clicks_while_closed_are_dropped() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        assert!(!p.click_day(20).handled);
        assert!(!p.click_slot(15).handled);
        assert_eq!(p.draft(), Draft::default());
        assert!(changes(&log).is_empty());
    }

    #[test]
    fn placement_waits_for_layout() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        let result = p.click_field();
        assert!(result.actions.contains(&WidgetAction::MeasureAfterLayout { id: p.id }));
        assert!(p.placement_pending());
        assert_eq!(p.direction(), Direction::Down);

        let viewport = Viewport {
            height: 24,
            anchors: vec![(p.id, Rect::new(0, 20, 40, 1))],
        };
        p.place(&viewport);
        assert_eq!(p.direction(), Direction::Up);
        assert!(!p.placement_pending());
    }

    #[test]
    fn placement_after_close_is_a_no_op() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        p.click_field();
        p.click_outside();
        let viewport = Viewport {
            height: 24,
            anchors: vec![(p.id, Rect::new(0, 20, 40, 1))],
        };
        assert!(!p.place(&viewport).handled);
        assert_eq!(p.direction(), Direction::Down);
    }

    #[test]
    fn placement_without_anchor_drops_down() {
        let coordinator = OpenCoordinator::new();
        let options = PickerOptions::new()
            .with_clock(clock())
            .with_estimated_panel_height(30);
        let mut p = DateTimePicker::new(&coordinator, options);
        p.click_field();
        p.place(&Viewport {
            height: 24,
            anchors: Vec::new(),
        });
        assert_eq!(p.direction(), Direction::Down);
    }

    #[test]
    fn min_date_sets_day_floor() {
        let coordinator = OpenCoordinator::new();
        let options = PickerOptions::new()
            .with_clock(clock())
            .with_min_date(date(2025, 5, 15));
        let mut p = DateTimePicker::new(&coordinator, options);
        p.click_field();
        assert!(p.is_day_disabled(date(2025, 5, 14)));
        assert!(!p.click_day(14).handled);
        assert!(p.click_day(15).handled);
    }

    #[test]
    fn options_from_config() {
        let config = PickerConfig {
            label: "Return".to_string(),
            value: Some("2025-07-01T08:30".to_string()),
            min_date: Some("2025-06-20".to_string()),
            estimated_panel_height: Some(20),
        };
        let options = PickerOptions::from_config(&config)
            .expect("options")
            .with_clock(clock());
        let p = DateTimePicker::new(&OpenCoordinator::new(), options);
        assert_eq!(p.label, "Return");
        assert_eq!(p.selected(), at(2025, 6, 1, 8, 30));
        assert_eq!(p.min_date(), Some(date(2025, 5, 20)));
        assert_eq!(p.panel_height, 20);
    }

    #[test]
    fn dropping_an_open_picker_frees_the_slot() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        p.click_field();
        drop(p);
        assert_eq!(coordinator.current(), None);
        assert_eq!(coordinator.subscriber_count(), 0);
    }

    #[test]
    fn pointer_hits_route_through_the_panel() {
        let coordinator = OpenCoordinator::new();
        let (mut p, log) = picker(&coordinator, &clock());
        p.on_pointer(PointerHit::Field);
        assert!(p.is_open());

        // June 2025 starts on Sunday: the 12th is row 1, column 4.
        p.on_pointer(PointerHit::Overlay { row: 3, col: 13 });
        assert_eq!(p.draft().date, Some(date(2025, 5, 12)));

        // Five grid rows, so slots start at row 8; 15:00 is row 10, column 3.
        p.on_pointer(PointerHit::Overlay { row: 10, col: 16 });
        assert_eq!(changes(&log), vec![at(2025, 5, 12, 15, 0)]);
        assert!(!p.is_open());
    }

    #[test]
    fn activate_maps_targets() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        p.activate(PickerTarget::Field);
        p.activate(PickerTarget::NextMonth);
        assert_eq!(p.view_month(), ViewMonth { year: 2025, month: 6 });
        assert!(p.activate(PickerTarget::Panel).handled);
        assert!(p.is_open());
        p.activate(PickerTarget::Outside);
        assert!(!p.is_open());
    }

    #[test]
    fn overlay_marks_disabled_cells_and_slots() {
        let coordinator = OpenCoordinator::new();
        let (mut p, _) = picker(&coordinator, &clock());
        let ctx = RenderContext::default();
        assert!(p.draw_overlay(&ctx).is_none());

        p.click_field();
        let panel = p.draw_overlay(&ctx).expect("open panel");
        assert_eq!(panel.lines.len() as u16, p.panel_layout().height());
        assert!(line_text(&panel.lines[0]).contains("June 2025"));

        // Row 1 of the grid holds 8..14; the 9th is past, the 10th is today.
        let week = &panel.lines[3];
        assert!(week[2].style.strike, "9th should be struck through");
        assert!(!week[3].style.strike);

        // Second slot row holds 06am..11am: 09am is past, 10am is selected.
        let morning = &panel.lines[9];
        assert!(morning[4].style.strike);
        assert!(!morning[5].style.strike);

        let field = p.draw(&ctx);
        assert!(line_text(&field.lines[0]).contains("Pick-up: June 10, 2025 10:00 AM"));
    }
}
