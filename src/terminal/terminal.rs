use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, PointerEvent, TerminalEvent};
use crate::ui::span::SpanLine;
use crate::ui::style::{Color, Style};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CrosstermKeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers as CrosstermKeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

pub struct Terminal {
    stdout: Stdout,
    size: TerminalSize,
    active: bool,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: TerminalSize { width, height },
            active: false,
        })
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    /// Raw mode, alternate screen, mouse capture, hidden cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(())
    }

    pub fn leave(&mut self) -> io::Result<()> {
        if !std::mem::take(&mut self.active) {
            return Ok(());
        }
        execute!(self.stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    /// Next event this crate cares about. Other events are skipped.
    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    return Ok(TerminalEvent::Key(map_key_event(key)));
                }
                Event::Mouse(mouse) => {
                    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                        continue;
                    }
                    return Ok(TerminalEvent::Pointer(PointerEvent {
                        col: mouse.column,
                        row: mouse.row,
                    }));
                }
                Event::Resize(width, height) => {
                    self.size = TerminalSize { width, height };
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    /// Redraws the whole screen, one entry per row.
    pub fn draw(&mut self, rows: &[SpanLine]) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All))?;
        for (row, line) in rows.iter().enumerate().take(self.size.height as usize) {
            queue!(self.stdout, cursor::MoveTo(0, row as u16))?;
            for span in line {
                apply_style(&mut self.stdout, span.style)?;
                queue!(self.stdout, Print(&span.text))?;
                queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
            }
        }
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

fn apply_style(out: &mut Stdout, style: Style) -> io::Result<()> {
    if let Some(color) = style.color {
        queue!(out, SetForegroundColor(map_color(color)))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.strike {
        queue!(out, SetAttribute(Attribute::CrossedOut))?;
    }
    Ok(())
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::DarkGrey => CrosstermColor::DarkGrey,
        Color::Green => CrosstermColor::Green,
        Color::Yellow => CrosstermColor::Yellow,
        Color::Cyan => CrosstermColor::Cyan,
    }
}

fn map_key_event(key: CrosstermKeyEvent) -> KeyEvent {
    let code = match key.code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        _ => KeyCode::Unknown,
    };
    let mut modifiers = KeyModifiers::NONE;
    if key.modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        modifiers = modifiers.union(KeyModifiers::SHIFT);
    }
    if key.modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        modifiers = modifiers.union(KeyModifiers::CONTROL);
    }
    if key.modifiers.contains(CrosstermKeyModifiers::ALT) {
        modifiers = modifiers.union(KeyModifiers::ALT);
    }
    KeyEvent { code, modifiers }
}
