//! Input events and crossterm conversion.
//!
//! Only what the host acts on is kept: left-button presses become clicks,
//! key presses and repeats become [`KeyInput`], and resizes pass through.
//! Everything else converts to `None`.

use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers, MouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

/// Keys the host distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub fn esc() -> Self {
        Self::new(KeyCode::Esc)
    }

    /// Ctrl + `c`.
    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }

    /// Ctrl+C, which stops the event loop.
    pub fn is_interrupt(&self) -> bool {
        self.modifiers.ctrl && matches!(self.code, KeyCode::Char('c' | 'C'))
    }
}

/// Events the host dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Click { x: u16, y: u16 },
    Key(KeyInput),
    Resize { width: u16, height: u16 },
}

// =============================================================================
// CROSSTERM CONVERSION
// =============================================================================

pub fn convert_event(event: CrosstermEvent) -> Option<InputEvent> {
    match event {
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Key(key) => convert_key_event(key).map(InputEvent::Key),
        CrosstermEvent::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        _ => None,
    }
}

pub fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<InputEvent> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click {
            x: event.column,
            y: event.row,
        }),
        _ => None,
    }
}

pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyInput> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let code = match event.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        CrosstermKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    Some(KeyInput {
        code,
        modifiers: convert_modifiers(event.modifiers),
    })
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Wait up to `timeout` for the next event the host cares about.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if event::poll(timeout)? {
        Ok(convert_event(event::read()?))
    } else {
        Ok(None)
    }
}
