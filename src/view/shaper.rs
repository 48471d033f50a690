//! Name shaping for a monospace terminal.

use crate::model::Rgba;
use crate::view_state::canvas::{TextImage, TextShaper};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Shapes names into whole terminal columns of `cell_width` pixels each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElidingShaper {
    cell_width: i32,
}

impl ElidingShaper {
    /// Shaper for cells `cell_width` pixels wide.
    pub fn new(cell_width: u16) -> Self {
        Self {
            cell_width: i32::from(cell_width.max(1)),
        }
    }
}

impl TextShaper for ElidingShaper {
    fn shape_elided(&self, text: &str, available_width: i32, font_height: i32, color: Rgba) -> TextImage {
        let columns = usize::try_from(available_width / self.cell_width).unwrap_or(0);
        let text = elide(text, columns);
        TextImage {
            width: text.width() as i32 * self.cell_width,
            height: font_height,
            text,
            color,
        }
    }
}

/// Fit `text` into `columns` display columns, replacing the tail with `…`.
///
/// Wide characters count as two columns and are never split.
pub fn elide(text: &str, columns: usize) -> String {
    if text.width() <= columns {
        return text.to_string();
    }
    if columns == 0 {
        return String::new();
    }
    let budget = columns - 1;
    let mut used = 0;
    let mut result = String::new();
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        result.push(ch);
    }
    result.push(ELLIPSIS);
    result
}
