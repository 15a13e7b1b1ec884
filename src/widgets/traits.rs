use crate::runtime::event::WidgetAction;
use crate::state::coordinator::WidgetId;
use crate::terminal::KeyEvent;
use crate::ui::span::SpanLine;

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub focused: Option<WidgetId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

// ---------------------------------------------------------------------------
// Drawable
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> WidgetId;
    fn label(&self) -> &str {
        ""
    }
    /// The in-flow part (for a picker: its text field).
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
    /// Floating content drawn over the page, if any is open.
    fn draw_overlay(&self, _ctx: &RenderContext) -> Option<DrawOutput> {
        None
    }
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: vec![action],
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.request_render |= other.request_render;
        self.actions.extend(other.actions);
    }
}

// ---------------------------------------------------------------------------
// Interactive
// ---------------------------------------------------------------------------

/// Where a pointer press landed relative to one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHit {
    Field,
    /// Inside the open overlay, relative to its top-left corner.
    Overlay { row: u16, col: u16 },
    Outside,
}

pub trait Interactive: Send {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    fn on_pointer(&mut self, _hit: PointerHit) -> InteractionResult {
        InteractionResult::ignored()
    }

    /// Apply out-of-band notifications before the next event or render.
    fn sync(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }
}
