//! Text measurement and line breaking.
//!
//! Widths are terminal cells as reported by `unicode-width`: ASCII is 1,
//! CJK and most emoji are 2, combining marks and controls are 0.
//!
//! Layout and painting both go through [`text_lines`], so the size taffy
//! reserves for a text node is exactly what gets drawn into it.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::view::{TextOverflow, TextStyle};

pub const ELLIPSIS: char = '…';

/// Display width of one character.
#[inline]
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Widest line when wrapping is not allowed.
pub fn max_line_width(text: &str) -> u16 {
    text.split('\n').map(string_width).max().unwrap_or(0)
}

/// Widest single word; the narrowest width text can wrap to without
/// breaking inside a word.
pub fn min_content_width(text: &str) -> u16 {
    text.split(['\n', ' ']).map(string_width).max().unwrap_or(0)
}

/// Word-wrap `text` to `width` cells.
///
/// Breaks at spaces where possible and inside a word only when the word
/// alone is wider than `width`. Explicit newlines always break.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0u16;

        for word in paragraph.split(' ') {
            let word_width = string_width(word);
            let joined = if current.is_empty() {
                word_width
            } else {
                current_width.saturating_add(1).saturating_add(word_width)
            };

            if joined <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = joined;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard-break an over-long word.
                for c in word.chars() {
                    let w = char_width(c);
                    if current_width + w > width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(c);
                    current_width += w;
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Number of lines `text` occupies at `width`.
pub fn measure_text_height(text: &str, width: u16) -> u16 {
    wrap_text(text, width).len().min(u16::MAX as usize) as u16
}

/// Cut `text` to `width` cells, ending with an ellipsis when anything was
/// removed.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    if string_width(text) <= width {
        return text.to_string();
    }

    let target = width.saturating_sub(1);
    let mut result = String::new();
    let mut current = 0u16;
    for c in text.chars() {
        let w = char_width(c);
        if current + w > target {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push(ELLIPSIS);
    result
}

/// Cut `text` to `width` cells without any marker.
pub fn clip_text(text: &str, width: u16) -> String {
    let mut result = String::new();
    let mut current = 0u16;
    for c in text.chars() {
        let w = char_width(c);
        if current + w > width {
            break;
        }
        result.push(c);
        current += w;
    }
    result
}

/// The lines a text node shows at `width`, honouring `max_lines` and the
/// overflow mode.
pub fn text_lines(content: &str, width: u16, style: &TextStyle) -> Vec<String> {
    let mut lines = wrap_text(content, width);
    let Some(max) = style.max_lines.map(usize::from) else {
        return lines;
    };
    if lines.len() <= max {
        return lines;
    }

    lines.truncate(max);
    if style.overflow == TextOverflow::Ellipsis {
        if let Some(last) = lines.last_mut() {
            *last = if string_width(last) < width {
                format!("{last}{ELLIPSIS}")
            } else {
                truncate_text(&format!("{last}{ELLIPSIS}"), width)
            };
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a b c"), 5);
    }

    #[test]
    fn test_string_width_wide_chars() {
        assert_eq!(string_width("한글"), 4);
        assert_eq!(char_width('確'), 2);
        assert_eq!(char_width('\u{0301}'), 0);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        assert_eq!(wrap_text("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_text("hello world", 11), vec!["hello world"]);
        assert_eq!(wrap_text("a b c d", 3), vec!["a b", "c d"]);
    }

    #[test]
    fn test_wrap_hard_breaks_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_text_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(measure_text_height("a\nb\nc", 10), 3);
        assert_eq!(measure_text_height("", 10), 0);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("hello", 4), "hel…");
        assert_eq!(truncate_text("", 5), "");
    }

    #[test]
    fn test_min_content_width_is_longest_word() {
        assert_eq!(min_content_width("Product Description"), 11);
        assert_eq!(max_line_width("ab\nabcd"), 4);
    }

    #[test]
    fn test_text_lines_ellipsis_on_last_kept_line() {
        let style = TextStyle::default().single_line_ellipsis();
        assert_eq!(text_lines("Product Name", 8, &style), vec!["Product…"]);

        let clip = TextStyle::default().max_lines(1);
        assert_eq!(text_lines("Product Name", 8, &clip), vec!["Product"]);

        let unlimited = TextStyle::default();
        assert_eq!(text_lines("Product Name", 8, &unlimited).len(), 2);
    }
}
