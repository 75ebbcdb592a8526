//! Where frames go and where input comes from.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use tracing::debug;

use super::config::RenderMode;
use super::input::{InputEvent, poll_event};
use crate::renderer::{DiffRenderer, Frame, InlineRenderer};

/// A display the host presents frames to.
pub trait Surface {
    /// Current size in cells.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Prepare for drawing in `mode`.
    fn begin(&mut self, mode: RenderMode) -> io::Result<()>;

    /// Show `frame`.
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Next input event, waiting at most `timeout`.
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;

    /// Restore whatever `begin` changed.
    fn end(&mut self) -> io::Result<()>;
}

// =============================================================================
// MemorySurface
// =============================================================================

/// Headless surface: keeps the last frame and a queue of scripted input.
#[derive(Debug)]
pub struct MemorySurface {
    width: u16,
    height: u16,
    last: Option<Frame>,
    presents: usize,
    input: VecDeque<InputEvent>,
    active: bool,
}

impl MemorySurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            last: None,
            presents: 0,
            input: VecDeque::new(),
            active: false,
        }
    }

    /// Most recently presented frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    /// Text of the last presented frame; empty before the first present.
    pub fn text(&self) -> String {
        self.last.as_ref().map(Frame::to_text).unwrap_or_default()
    }

    /// How many frames were presented.
    pub fn present_count(&self) -> usize {
        self.presents
    }

    /// Queue an event for `poll_input`.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    /// Between `begin` and `end`.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn begin(&mut self, _mode: RenderMode) -> io::Result<()> {
        self.active = true;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.last = Some(frame.clone());
        self.presents += 1;
        Ok(())
    }

    fn poll_input(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        if let Some(InputEvent::Resize { width, height }) = self.input.front() {
            self.width = *width;
            self.height = *height;
        }
        Ok(self.input.pop_front())
    }

    fn end(&mut self) -> io::Result<()> {
        self.active = false;
        Ok(())
    }
}

// =============================================================================
// TerminalSurface
// =============================================================================

/// The real terminal on stdout: raw mode, mouse capture and either the
/// alternate screen with differential updates or inline redraws.
pub struct TerminalSurface {
    out: Stdout,
    mode: RenderMode,
    diff: DiffRenderer,
    inline: InlineRenderer,
    active: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            mode: RenderMode::Fullscreen,
            diff: DiffRenderer::new(),
            inline: InlineRenderer::new(),
            active: false,
        }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn begin(&mut self, mode: RenderMode) -> io::Result<()> {
        self.mode = mode;
        terminal::enable_raw_mode()?;
        match mode {
            RenderMode::Fullscreen => {
                execute!(self.out, EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;
                self.diff.invalidate();
            }
            RenderMode::Inline => {
                execute!(self.out, cursor::Hide, EnableMouseCapture)?;
            }
        }
        self.active = true;
        debug!(?mode, "terminal surface started");
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let mut out = self.out.lock();
        match self.mode {
            RenderMode::Fullscreen => {
                self.diff.render(frame.buffer(), &mut out)?;
            }
            RenderMode::Inline => {
                self.inline.render(frame.buffer(), &mut out)?;
            }
        }
        Ok(())
    }

    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        let event = poll_event(timeout)?;
        if let Some(InputEvent::Resize { .. }) = event {
            self.diff.invalidate();
        }
        Ok(event)
    }

    fn end(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        match self.mode {
            RenderMode::Fullscreen => {
                execute!(self.out, DisableMouseCapture, cursor::Show, LeaveAlternateScreen)?;
            }
            RenderMode::Inline => {
                execute!(self.out, DisableMouseCapture, cursor::Show)?;
                self.out.write_all(b"\r\n")?;
                self.out.flush()?;
            }
        }
        terminal::disable_raw_mode()?;
        debug!("terminal surface restored");
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.end();
    }
}
