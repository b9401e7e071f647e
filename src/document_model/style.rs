//! Character and block level attributes of a note.
//!
//! Lengths live on a twip grid (1/15 unit) and font sizes on a half point
//! grid, the resolution the stored form keeps.

/// Twips per layout unit (1/96 inch).
pub const TWIPS_PER_UNIT: f64 = 15.0;

/// Rounds a length to the nearest twip.
pub fn snap_length(value: f64) -> f64 {
    (value * TWIPS_PER_UNIT).round() / TWIPS_PER_UNIT
}

/// Rounds a font size to the nearest half point, never below half a point.
pub fn snap_font_size(size: f64) -> f64 {
    ((size * 2.0).round() / 2.0).max(0.5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    None,
    #[default]
    Disc,
    Decimal,
    LowerLatin,
}

impl MarkerStyle {
    pub fn code(self) -> u32 {
        match self {
            MarkerStyle::None => 0,
            MarkerStyle::Disc => 1,
            MarkerStyle::Decimal => 2,
            MarkerStyle::LowerLatin => 3,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => MarkerStyle::Disc,
            2 => MarkerStyle::Decimal,
            3 => MarkerStyle::LowerLatin,
            _ => MarkerStyle::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Style of a single run. `None` fields inherit the host's defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub underline: bool,
    pub foreground: Option<Color>,
}

impl RunStyle {
    pub fn bold() -> Self {
        Self {
            weight: FontWeight::Bold,
            ..Self::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.style == FontStyle::Italic
    }
}

/// A contiguous span of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::default())
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_codes_round_trip() {
        for style in [
            MarkerStyle::None,
            MarkerStyle::Disc,
            MarkerStyle::Decimal,
            MarkerStyle::LowerLatin,
        ] {
            assert_eq!(MarkerStyle::from_code(style.code() as i32), style);
        }
        assert_eq!(MarkerStyle::from_code(42), MarkerStyle::None);
    }

    #[test]
    fn test_run_char_len_counts_chars() {
        assert_eq!(Run::plain("héllo").char_len(), 5);
    }
}
