//! ANSI escape sequences used by the renderers.
//!
//! Terminal modes (raw mode, alternate screen, mouse capture) go through
//! crossterm; per-cell output is written here directly so a whole frame
//! can be assembled in one buffer.

use std::io::{self, Write};

use crate::types::{Attr, Rgba};

// =============================================================================
// Cursor
// =============================================================================

/// Move cursor to absolute position (0-indexed in, 1-indexed on the wire).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y as u32 + 1, x as u32 + 1)
}

#[inline]
pub fn cursor_up<W: Write>(w: &mut W, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{}A", n)
}

#[inline]
pub fn cursor_column_zero<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\r")
}

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25l")
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25h")
}

// =============================================================================
// Screen
// =============================================================================

/// Clear from cursor to end of screen.
#[inline]
pub fn erase_down<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[J")
}

/// Clear the viewport and home the cursor.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[2J\x1b[H")
}

/// Begin synchronized output (terminal buffers until `end_sync`).
#[inline]
pub fn begin_sync<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?2026h")
}

#[inline]
pub fn end_sync<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?2026l")
}

// =============================================================================
// Colors and attributes
// =============================================================================

/// Reset all attributes and colors.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[0m")
}

pub fn fg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() {
        write!(w, "\x1b[39m")
    } else if color.is_ansi() {
        match color.ansi_index() {
            index @ 0..=7 => write!(w, "\x1b[{}m", 30 + index),
            index @ 8..=15 => write!(w, "\x1b[{}m", 90 + index - 8),
            index => write!(w, "\x1b[38;5;{}m", index),
        }
    } else {
        write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
    }
}

pub fn bg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    // Anything still translucent after blending shows the terminal's own
    // background.
    if color.is_terminal_default() || color.is_transparent() {
        write!(w, "\x1b[49m")
    } else if color.is_ansi() {
        match color.ansi_index() {
            index @ 0..=7 => write!(w, "\x1b[{}m", 40 + index),
            index @ 8..=15 => write!(w, "\x1b[{}m", 100 + index - 8),
            index => write!(w, "\x1b[48;5;{}m", index),
        }
    } else {
        write!(w, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
    }
}

/// Set text attributes from bitflags as one SGR sequence.
pub fn attrs<W: Write>(w: &mut W, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, u8); 8] = [
        (Attr::BOLD, 1),
        (Attr::DIM, 2),
        (Attr::ITALIC, 3),
        (Attr::UNDERLINE, 4),
        (Attr::BLINK, 5),
        (Attr::INVERSE, 7),
        (Attr::HIDDEN, 8),
        (Attr::STRIKETHROUGH, 9),
    ];

    if attr.is_empty() {
        return Ok(());
    }

    write!(w, "\x1b[")?;
    let mut first = true;
    for (flag, code) in CODES {
        if attr.contains(flag) {
            if !first {
                write!(w, ";")?;
            }
            write!(w, "{}", code)?;
            first = false;
        }
    }
    write!(w, "m")
}
