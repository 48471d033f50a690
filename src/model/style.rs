//! Immutable style descriptors injected into the stories list.
//!
//! Nothing in the core reads ambient style state: every metric and color
//! arrives through a [`StripStyle`] handed over at construction.

use serde::Deserialize;
use thiserror::Error;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

/// Error returned when a color string is not `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #rrggbb or #rrggbbaa")]
pub struct InvalidColor(pub String);

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(raw: &str) -> Result<Self, InvalidColor> {
        let invalid = || InvalidColor(raw.to_string());
        let hex = raw.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha_f(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Copy with alpha scaled by `factor`.
    pub fn with_alpha_scaled(&self, factor: f64) -> Self {
        let a = (f64::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..*self }
    }
}

impl TryFrom<String> for Rgba {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// Metrics of one of the two sub-layouts.
///
/// The compact row uses `shift` as its stride; the full panel derives its
/// stride from `photo_left` and `photo` and ignores `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutStyle {
    /// Widget height in this layout.
    pub height: i32,
    /// Avatar diameter.
    pub photo: i32,
    /// Horizontal padding around the avatar inside its cell.
    pub photo_left: i32,
    /// Distance from the widget top to the avatar.
    pub photo_top: i32,
    /// Leading margin before the first cell.
    pub left: i32,
    /// Stride between overlapping compact avatars.
    pub shift: i32,
    /// Distance from the widget top to the name label.
    pub name_top: i32,
    /// Unread ring thickness, doubled.
    pub line_twice: i32,
    /// Read ring stroke thickness, doubled.
    pub line_read_twice: i32,
}

/// Metrics of the font used for names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameStyle {
    /// Line height in pixels.
    pub font_height: i32,
    /// Width of a space; names are inset by one space on each side.
    pub space_width: i32,
}

/// Externally supplied colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Name label text.
    pub name_fg: Rgba,
    /// Fill behind every avatar.
    pub background: Rgba,
    /// Unread gradient, top-right stop.
    pub unread_from: Rgba,
    /// Unread gradient, bottom-left stop.
    pub unread_to: Rgba,
    /// Stroke of the "everything read" ring.
    pub read_line: Rgba,
}

/// Complete style of a stories list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripStyle {
    /// Compact row metrics.
    pub small: LayoutStyle,
    /// Expanded panel metrics.
    pub full: LayoutStyle,
    /// Name font metrics.
    pub name: NameStyle,
    /// Colors.
    pub palette: Palette,
    /// Opacity of fully read avatars.
    pub read_opacity: f64,
    /// Clicks past the last item select the last visible item.
    pub full_clickable: bool,
}

impl StripStyle {
    /// Width available to a name label, one space inset on each side.
    pub fn available_name_width(&self) -> i32 {
        self.full.photo_left * 2 + self.full.photo - 2 * self.name.space_width
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self::default_small()
    }
}

impl LayoutStyle {
    /// Stock compact row metrics.
    pub const fn default_small() -> Self {
        Self {
            height: 0,
            photo: 21,
            photo_left: 3,
            photo_top: 6,
            left: 6,
            shift: 16,
            name_top: 0,
            line_twice: 3,
            line_read_twice: 0,
        }
    }

    /// Stock expanded panel metrics.
    pub const fn default_full() -> Self {
        Self {
            height: 85,
            photo: 53,
            photo_left: 6,
            photo_top: 9,
            left: 6,
            shift: 0,
            name_top: 68,
            line_twice: 4,
            line_read_twice: 2,
        }
    }
}

impl Default for NameStyle {
    fn default() -> Self {
        Self {
            font_height: 16,
            space_width: 4,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            name_fg: Rgba::rgb(0x00, 0x00, 0x00),
            background: Rgba::rgb(0xff, 0xff, 0xff),
            unread_from: Rgba::rgb(0x0d, 0xcc, 0x39),
            unread_to: Rgba::rgb(0x0d, 0xa3, 0xe6),
            read_line: Rgba::rgb(0xbb, 0xbb, 0xbb),
        }
    }
}

impl Default for StripStyle {
    fn default() -> Self {
        Self {
            small: LayoutStyle::default_small(),
            full: LayoutStyle::default_full(),
            name: NameStyle::default(),
            palette: Palette::default(),
            read_opacity: 0.6,
            full_clickable: false,
        }
    }
}

/// Interaction tuning that is not part of the visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    /// Duration of the expand/collapse toggle animation.
    pub toggle_duration_ms: u64,
    /// Manhattan distance the pointer must travel before a press becomes a drag.
    pub drag_distance: i32,
    /// Mirror horizontal wheel and drag directions.
    pub right_to_left: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            toggle_duration_ms: 150,
            drag_distance: 10,
            right_to_left: false,
        }
    }
}
