use crate::state::coordinator::WidgetId;

/// Rows the open panel is assumed to need. A fixed estimate: the panel is not
/// measured before deciding where it goes.
pub const ESTIMATED_PANEL_HEIGHT: u16 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    #[default]
    Down,
}

/// Host-space rectangle, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x.saturating_add(self.width) && row >= self.y && row < self.bottom()
    }
}

/// Geometry queries answered by whoever lays widgets out.
pub trait HostGeometry {
    /// `None` if the anchor is not laid out (yet).
    fn anchor_rect(&self, id: WidgetId) -> Option<Rect>;
    fn viewport_height(&self) -> u16;
}

pub fn decide_direction(anchor: Rect, viewport_height: u16, estimated_panel_height: u16) -> Direction {
    let space_below = viewport_height as i32 - anchor.bottom() as i32;
    if space_below < estimated_panel_height as i32 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Reads the anchor from `geometry`; a missing anchor places the panel below.
pub fn measure(geometry: &dyn HostGeometry, id: WidgetId, estimated_panel_height: u16) -> Direction {
    match geometry.anchor_rect(id) {
        Some(anchor) => decide_direction(anchor, geometry.viewport_height(), estimated_panel_height),
        None => {
            log::debug!("{id} has no anchor yet; defaulting to drop-down");
            Direction::Down
        }
    }
}
