//! Cell, color and rectangle value types for the layer canvas.

use serde::{Deserialize, Serialize};

/// The classic 16-color console palette.
///
/// Cell attributes and the style colors are restricted to this set; anything
/// richer is out of scope for the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    #[default]
    White,
}

impl PaletteColor {
    /// Convert to crossterm color
    pub fn to_crossterm(self) -> crossterm::style::Color {
        use crossterm::style::Color as Ct;
        match self {
            PaletteColor::Black => Ct::Black,
            PaletteColor::DarkBlue => Ct::DarkBlue,
            PaletteColor::DarkGreen => Ct::DarkGreen,
            PaletteColor::DarkCyan => Ct::DarkCyan,
            PaletteColor::DarkRed => Ct::DarkRed,
            PaletteColor::DarkMagenta => Ct::DarkMagenta,
            PaletteColor::DarkYellow => Ct::DarkYellow,
            PaletteColor::Gray => Ct::Grey,
            PaletteColor::DarkGray => Ct::DarkGrey,
            PaletteColor::Blue => Ct::Blue,
            PaletteColor::Green => Ct::Green,
            PaletteColor::Cyan => Ct::Cyan,
            PaletteColor::Red => Ct::Red,
            PaletteColor::Magenta => Ct::Magenta,
            PaletteColor::Yellow => Ct::Yellow,
            PaletteColor::White => Ct::White,
        }
    }
}

/// One character cell: a glyph plus its foreground/background colors.
///
/// An unwritten position is represented as `Option::<Cell>::None`, never as a
/// cell with a sentinel glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: PaletteColor,
    pub bg: PaletteColor,
}

impl Cell {
    pub fn new(ch: char, fg: PaletteColor, bg: PaletteColor) -> Self {
        Self { ch, fg, bg }
    }
}

/// An axis-aligned rectangle in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First column to the right of the rectangle.
    #[allow(dead_code)]
    pub fn right(&self) -> u16 {
        self.x + self.width
    }

    /// First row below the rectangle.
    #[allow(dead_code)]
    pub fn bottom(&self) -> u16 {
        self.y + self.height
    }
}
