use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{AppConfig, ConfigError};
use crate::core::moment::Moment;
use crate::runtime::event::WidgetAction;
use crate::state::coordinator::{OpenCoordinator, WidgetId};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, PointerEvent, TerminalEvent, TerminalSize};
use crate::ui::placement::{Direction, HostGeometry, Rect};
use crate::ui::span::{Span, SpanLine, line_width};
use crate::ui::style::{Color, Style};
use crate::widgets::components::date_time_picker::{DateTimePicker, PickerOptions};
use crate::widgets::traits::{Drawable, InteractionResult, Interactive, PointerHit, RenderContext};

const TITLE_ROWS: u16 = 2;
const FIELD_SPACING: u16 = 2;
const OVERLAY_INDENT: u16 = 4;

/// Where things landed in the last composed frame.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    viewport_height: u16,
    fields: Vec<(WidgetId, Rect)>,
    overlay: Option<(usize, Rect)>,
}

impl PageLayout {
    #[cfg(test)]
    fn overlay_rect(&self) -> Option<Rect> {
        self.overlay.map(|(_, rect)| rect)
    }

    #[cfg(test)]
    fn field_rect(&self, index: usize) -> Option<Rect> {
        self.fields.get(index).map(|(_, rect)| *rect)
    }
}

impl HostGeometry for PageLayout {
    fn anchor_rect(&self, id: WidgetId) -> Option<Rect> {
        self.fields.iter().find(|(field, _)| *field == id).map(|(_, rect)| *rect)
    }

    fn viewport_height(&self) -> u16 {
        self.viewport_height
    }
}

/// A page of pickers sharing one coordinator.
pub struct App {
    coordinator: OpenCoordinator,
    pickers: Vec<DateTimePicker>,
    focus: usize,
    viewport: TerminalSize,
    layout: PageLayout,
    status: String,
    clock: Box<dyn Clock>,
    last_minute: Moment,
    should_exit: bool,
}

impl App {
    pub fn new(
        coordinator: OpenCoordinator,
        pickers: Vec<DateTimePicker>,
        viewport: TerminalSize,
    ) -> Self {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        let last_minute = clock.now();
        Self {
            coordinator,
            pickers,
            focus: 0,
            viewport,
            layout: PageLayout::default(),
            status: String::new(),
            clock,
            last_minute,
            should_exit: false,
        }
    }

    pub fn from_config(config: &AppConfig, viewport: TerminalSize) -> Result<Self, ConfigError> {
        let coordinator = OpenCoordinator::new();
        let pickers = config
            .pickers
            .values()
            .map(|picker| {
                PickerOptions::from_config(picker)
                    .map(|options| DateTimePicker::new(&coordinator, options))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(coordinator, pickers, viewport))
    }

    pub fn with_count(count: usize, viewport: TerminalSize) -> Self {
        let coordinator = OpenCoordinator::new();
        let pickers = (1..=count)
            .map(|n| {
                let options = PickerOptions::new().with_label(format!("Booking {n}"));
                DateTimePicker::new(&coordinator, options)
            })
            .collect();
        Self::new(coordinator, pickers, viewport)
    }

    pub fn pickers(&self) -> &[DateTimePicker] {
        &self.pickers
    }

    pub fn coordinator(&self) -> &OpenCoordinator {
        &self.coordinator
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// True once per wall-clock minute, so disabled slots get redrawn.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if now == self.last_minute {
            return false;
        }
        self.last_minute = now;
        true
    }

    /// Returns whether a render is needed.
    pub fn handle_event(&mut self, event: TerminalEvent) -> bool {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Pointer(pointer) => self.handle_pointer(pointer),
            TerminalEvent::Resize { width, height } => {
                self.viewport = TerminalSize { width, height };
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_exit = true;
                return false;
            }
            KeyCode::Tab | KeyCode::BackTab if !self.pickers.is_empty() => {
                let len = self.pickers.len();
                self.focus = if key.code == KeyCode::Tab {
                    (self.focus + 1) % len
                } else {
                    (self.focus + len - 1) % len
                };
                return true;
            }
            _ => {}
        }
        let Some(picker) = self.pickers.get_mut(self.focus) else {
            return false;
        };
        let result = picker.on_key(key);
        let mut render = self.apply(result);
        render |= self.sync_all();
        render
    }

    fn handle_pointer(&mut self, pointer: PointerEvent) -> bool {
        let mut render = false;

        if let Some((idx, rect)) = self.layout.overlay
            && rect.contains(pointer.col, pointer.row)
        {
            let hit = PointerHit::Overlay {
                row: pointer.row - rect.y,
                col: pointer.col - rect.x,
            };
            if let Some(picker) = self.pickers.get_mut(idx) {
                let result = picker.on_pointer(hit);
                render |= self.apply(result);
            }
            render |= self.sync_all();
            return render;
        }

        let target = self
            .layout
            .fields
            .iter()
            .position(|(_, rect)| rect.contains(pointer.col, pointer.row));

        let mut results = Vec::new();
        for (idx, picker) in self.pickers.iter_mut().enumerate() {
            if Some(idx) != target {
                results.push(picker.on_pointer(PointerHit::Outside));
            }
        }
        if let Some(idx) = target {
            self.focus = idx;
            results.push(self.pickers[idx].on_pointer(PointerHit::Field));
            render = true;
        }
        for result in results {
            render |= self.apply(result);
        }
        render |= self.sync_all();
        render
    }

    fn sync_all(&mut self) -> bool {
        let results: Vec<InteractionResult> =
            self.pickers.iter_mut().map(|picker| picker.sync()).collect();
        results
            .into_iter()
            .fold(false, |render, result| self.apply(result) || render)
    }

    fn apply(&mut self, result: InteractionResult) -> bool {
        for action in &result.actions {
            match action {
                WidgetAction::ValueCommitted { id, moment } => {
                    let label = self
                        .pickers
                        .iter()
                        .find(|picker| Drawable::id(*picker) == *id)
                        .map(|picker| picker.label().to_string())
                        .unwrap_or_else(|| id.to_string());
                    log::info!("{label}: committed {moment}");
                    self.status = format!("{label} set to {moment}");
                }
                other => log::debug!("{other:?}"),
            }
        }
        result.request_render
    }

    /// Saturates at the last terminal row; fields past it are not drawn.
    fn field_row(index: usize) -> u16 {
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        TITLE_ROWS.saturating_add(index.saturating_mul(FIELD_SPACING))
    }

    /// Lays the page out and records the geometry used by [`HostGeometry`].
    pub fn compose(&mut self) -> Vec<SpanLine> {
        let height = self.viewport.height as usize;
        let mut rows: Vec<SpanLine> = vec![Vec::new(); height];
        let ctx = RenderContext {
            focused: self.pickers.get(self.focus).map(|picker| Drawable::id(picker)),
        };

        if let Some(title) = rows.first_mut() {
            *title = vec![Span::styled(
                "moment-picker: click a field, Tab moves focus, PgUp/PgDn change month, Ctrl-Q quits",
                Style::new().color(Color::DarkGrey),
            )];
        }

        let mut layout = PageLayout {
            viewport_height: self.viewport.height,
            fields: Vec::with_capacity(self.pickers.len()),
            overlay: None,
        };

        for (idx, picker) in self.pickers.iter().enumerate() {
            let row = Self::field_row(idx);
            let line = picker.draw(&ctx).lines.into_iter().next().unwrap_or_default();
            let width = line_width(&line) as u16;
            if let Some(slot) = rows.get_mut(row as usize) {
                *slot = line;
            }
            layout
                .fields
                .push((Drawable::id(picker), Rect::new(0, row, width, 1)));
        }

        for (idx, picker) in self.pickers.iter().enumerate() {
            let Some(panel) = picker.draw_overlay(&ctx) else {
                continue;
            };
            let panel_height = panel.lines.len() as u16;
            let field_row = Self::field_row(idx);
            let top = match picker.direction() {
                Direction::Down => field_row.saturating_add(1),
                Direction::Up => field_row.saturating_sub(panel_height),
            };
            for (offset, line) in panel.lines.into_iter().enumerate() {
                let Some(slot) = rows.get_mut(top as usize + offset) else {
                    break;
                };
                let mut composed = vec![Span::new(" ".repeat(OVERLAY_INDENT as usize))];
                composed.extend(line);
                *slot = composed;
            }
            layout.overlay = Some((
                idx,
                Rect::new(OVERLAY_INDENT, top, picker.panel_layout().width(), panel_height),
            ));
        }

        if let Some(last) = rows.last_mut()
            && height > 1
        {
            *last = vec![Span::styled(self.status.clone(), Style::new().color(Color::Green))];
        }

        self.layout = layout;
        rows
    }

    /// Runs deferred placement against the last composed layout. Returns
    /// whether any picker changed direction and needs a redraw.
    pub fn settle_layout(&mut self) -> bool {
        let mut changed = false;
        for picker in self.pickers.iter_mut() {
            if picker.placement_pending() {
                changed |= picker.place(&self.layout).request_render;
            }
        }
        changed
    }
}
