use crate::terminal::{KeyEvent, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Resize { width: u16, height: u16 },
}
