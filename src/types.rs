//! Core types for spark-compose.
//!
//! Colors, cell attributes, borders and rectangles. These flow from view
//! nodes through layout into the frame buffer and define what the renderer
//! understands.

// =============================================================================
// Color
// =============================================================================

/// A colour as the renderer sees it.
///
/// Channels are stored signed so two markers fit in `r`: `-1` leaves the
/// choice to the terminal, `-2` selects palette entry `g`. Everything else
/// is true colour with alpha, where `a == 0` paints nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Whatever the terminal's own foreground or background is.
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Self = Self::rgb(204, 204, 204);
    pub const DARK_GRAY: Self = Self::rgb(68, 68, 68);

    /// Entry `index` of the terminal's 256-colour palette.
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Palette entry; meaningless unless [`is_ansi`](Self::is_ansi).
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }

    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// `top` composited over `below`.
    ///
    /// Markers on top replace what is below; markers below count as opaque
    /// black when something translucent lands on them.
    pub fn blend(top: Self, below: Self) -> Self {
        if top.is_opaque() || top.is_terminal_default() || top.is_ansi() {
            return top;
        }
        if top.is_transparent() {
            return below;
        }

        let below = if below.is_terminal_default() || below.is_ansi() {
            Self::BLACK
        } else {
            below
        };

        let alpha = top.a as i32;
        let rest = below.a as i32 * (255 - alpha) / 255;
        let out_alpha = alpha + rest;
        if out_alpha == 0 {
            return Self::TRANSPARENT;
        }
        let mix = |fg: i16, bg: i16| ((fg as i32 * alpha + bg as i32 * rest) / out_alpha).clamp(0, 255) as i16;

        Self {
            r: mix(top.r, below.r),
            g: mix(top.g, below.g),
            b: mix(top.b, below.b),
            a: out_alpha.clamp(0, 255) as i16,
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

bitflags::bitflags! {
    /// SGR text attributes. `Attr::BOLD | Attr::ITALIC` combines them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Cell
// =============================================================================

/// One character position of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Codepoint; 0 marks the second column of a wide character.
    pub char: u32,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// ClipRect - Visible region inside the frame buffer
// =============================================================================

/// Unsigned area of the frame; drawing outside it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ClipRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }

    /// Overlap with `other`, if any.
    pub fn intersect(&self, other: &ClipRect) -> Option<ClipRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.x.saturating_add(self.width).min(other.x.saturating_add(other.width));
        let bottom = self.y.saturating_add(self.height).min(other.y.saturating_add(other.height));
        (right > left && bottom > top).then(|| ClipRect::new(left, top, right - left, bottom - top))
    }
}

// =============================================================================
// Rect - Laid-out bounds (may sit partly off-screen after an offset)
// =============================================================================

/// Absolute bounds of a laid-out element, in cells.
///
/// Origins are signed because `offset` modifiers can move content past the
/// top-left edge of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Shrink by the given amounts; never below zero size.
    pub fn inset(&self, left: u16, top: u16, right: u16, bottom: u16) -> Rect {
        Rect {
            x: self.x + left as i32,
            y: self.y + top as i32,
            width: self.width.saturating_sub(left.saturating_add(right)),
            height: self.height.saturating_sub(top.saturating_add(bottom)),
        }
    }

    /// The visible part of this rect inside a `width` x `height` surface.
    pub fn visible(&self, width: u16, height: u16) -> Option<ClipRect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = self.right().min(width as i32);
        let bottom = self.bottom().min(height as i32);
        (right > left && bottom > top).then(|| {
            ClipRect::new(
                left as u16,
                top as u16,
                (right - left) as u16,
                (bottom - top) as u16,
            )
        })
    }
}

// =============================================================================
// Borders
// =============================================================================

/// Line set used for frames and border modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BorderStyle {
    #[default]
    None = 0,
    /// ─ │ ┌ ┐ └ ┘
    Single = 1,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double = 2,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded = 3,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold = 4,
    /// ┄ ┆ ┌ ┐ └ ┘
    Dashed = 5,
    /// - | + + + +
    Ascii = 6,
    /// █ █ █ █ █ █
    Block = 7,
}

impl BorderStyle {
    /// `(horizontal, vertical, top-left, top-right, bottom-right, bottom-left)`.
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::None => (' ', ' ', ' ', ' ', ' ', ' '),
            Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
            Self::Double => ('═', '║', '╔', '╗', '╝', '╚'),
            Self::Rounded => ('─', '│', '╭', '╮', '╯', '╰'),
            Self::Bold => ('━', '┃', '┏', '┓', '┛', '┗'),
            Self::Dashed => ('┄', '┆', '┌', '┐', '┘', '└'),
            Self::Ascii => ('-', '|', '+', '+', '+', '+'),
            Self::Block => ('█', '█', '█', '█', '█', '█'),
        }
    }
}
