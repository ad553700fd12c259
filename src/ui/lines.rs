//! Box-drawing primitives with automatic line linking.
//!
//! Lines are drawn cell by cell onto the active layer; wherever a new glyph
//! meets existing line art the cell is upgraded to the matching junction
//! (corner, tee or cross) instead of plainly overwriting it. Connectivity is
//! decided against the *composited* state, so line art on lower layers
//! participates in junction selection.

use bitflags::bitflags;

use crate::core::canvas::Canvas;
use crate::core::cell::Rect;

bitflags! {
    /// Four-direction connectivity of a cell toward its neighbors.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LinkMask: u8 {
        const UP = 0b0001;
        const DOWN = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
    }
}

/// Light or heavy box-drawing variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyle {
    Single,
    #[default]
    Double,
}

/// The glyph palette of one line style.
pub struct LineGlyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub t_up: char,
    pub t_down: char,
    pub t_left: char,
    pub t_right: char,
    pub cross: char,
}

const SINGLE: LineGlyphs = LineGlyphs {
    horizontal: '─',
    vertical: '│',
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    t_up: '┴',
    t_down: '┬',
    t_left: '┤',
    t_right: '├',
    cross: '┼',
};

const DOUBLE: LineGlyphs = LineGlyphs {
    horizontal: '═',
    vertical: '║',
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    t_up: '╩',
    t_down: '╦',
    t_left: '╣',
    t_right: '╠',
    cross: '╬',
};

impl LineStyle {
    pub fn glyphs(self) -> &'static LineGlyphs {
        match self {
            LineStyle::Single => &SINGLE,
            LineStyle::Double => &DOUBLE,
        }
    }
}

/// Whether `ch` extends a line upward (can join a cell above it).
pub fn connects_up(ch: char) -> bool {
    matches!(
        ch,
        '║' | '╝' | '╩' | '╚' | '╣' | '╠' | '╬' | '│' | '┘' | '┴' | '└' | '┤' | '├' | '┼'
    )
}

/// Whether `ch` extends a line downward.
pub fn connects_down(ch: char) -> bool {
    matches!(
        ch,
        '║' | '╗' | '╦' | '╔' | '╣' | '╠' | '╬' | '│' | '┐' | '┬' | '┌' | '┤' | '├' | '┼'
    )
}

/// Whether `ch` extends a line toward the left.
pub fn connects_left(ch: char) -> bool {
    matches!(
        ch,
        '═' | '╗' | '╩' | '╝' | '╦' | '╣' | '╬' | '─' | '┐' | '┴' | '┘' | '┬' | '┤' | '┼'
    )
}

/// Whether `ch` extends a line toward the right.
pub fn connects_right(ch: char) -> bool {
    matches!(
        ch,
        '═' | '╔' | '╦' | '╚' | '╩' | '╠' | '╬' | '─' | '└' | '┬' | '┌' | '┴' | '├' | '┼'
    )
}

/// Resolve a connectivity mask to its junction glyph.
///
/// Masks with zero or one bit set need no junction and yield `None` (the
/// existing glyph is left alone). The mapping is pure and idempotent: a cell
/// already holding the resolved glyph resolves to the same glyph again.
pub fn junction_glyph(mask: LinkMask, style: LineStyle) -> Option<char> {
    let g = style.glyphs();
    let up = mask.contains(LinkMask::UP);
    let down = mask.contains(LinkMask::DOWN);
    let left = mask.contains(LinkMask::LEFT);
    let right = mask.contains(LinkMask::RIGHT);

    match (up, down, left, right) {
        (true, true, false, false) => Some(g.vertical),
        (false, false, true, true) => Some(g.horizontal),
        (true, false, false, true) => Some(g.bottom_left),
        (true, false, true, false) => Some(g.bottom_right),
        (false, true, false, true) => Some(g.top_left),
        (false, true, true, false) => Some(g.top_right),
        (true, true, false, true) => Some(g.t_right),
        (true, true, true, false) => Some(g.t_left),
        (true, false, true, true) => Some(g.t_up),
        (false, true, true, true) => Some(g.t_down),
        (true, true, true, true) => Some(g.cross),
        _ => None,
    }
}

impl<S> Canvas<S> {
    /// Connectivity of `(x, y)` toward its four composited neighbors.
    fn neighbor_links(&self, x: i32, y: i32) -> LinkMask {
        let glyph = |x, y| self.composite_at(x, y).map(|c| c.ch);
        let mut mask = LinkMask::empty();
        if glyph(x, y - 1).is_some_and(connects_down) {
            mask |= LinkMask::UP;
        }
        if glyph(x, y + 1).is_some_and(connects_up) {
            mask |= LinkMask::DOWN;
        }
        if glyph(x - 1, y).is_some_and(connects_right) {
            mask |= LinkMask::LEFT;
        }
        if glyph(x + 1, y).is_some_and(connects_left) {
            mask |= LinkMask::RIGHT;
        }
        mask
    }

    /// Replace the glyph at `(x, y)` with the junction matching the adjacent
    /// UI lines, if two or more of them meet here.
    pub fn link_ui_lines(&mut self, x: u16, y: u16, style: LineStyle) {
        let mask = self.neighbor_links(i32::from(x), i32::from(y));
        if let Some(ch) = junction_glyph(mask, style) {
            self.put(ch, x, y);
        }
    }

    /// Draw a horizontal line of `width` cells starting at `(start, y)`.
    ///
    /// Existing line art along the way is upgraded to tees and crosses rather
    /// than overwritten, and both endpoints are linked into any surrounding
    /// lines. Rendered in the `line_ui` style color.
    pub fn draw_horizontal_line(&mut self, y: u16, start: u16, width: u16, style: LineStyle) {
        if width == 0 {
            return;
        }
        let g = style.glyphs();
        let saved_fg = self.colors().0;
        self.set_fg(self.style.line_ui);

        for i in 0..width {
            let x = start + i;
            let existing = self.composite_at(i32::from(x), i32::from(y)).map(|c| c.ch);
            let ch = match existing {
                // Downward-facing corners and tees gain the new left/right arms.
                Some('╗' | '╔' | '╦' | '┐' | '┌' | '┬') => g.t_down,
                Some('╝' | '╚' | '╩' | '┘' | '└' | '┴') => g.t_up,
                Some('║' | '│') => {
                    let up = self
                        .composite_at(i32::from(x), i32::from(y) - 1)
                        .is_some_and(|c| connects_down(c.ch));
                    let down = self
                        .composite_at(i32::from(x), i32::from(y) + 1)
                        .is_some_and(|c| connects_up(c.ch));
                    match (up, down) {
                        (true, true) => g.cross,
                        (true, false) => g.t_up,
                        (false, true) => g.t_down,
                        (false, false) => g.horizontal,
                    }
                }
                Some('╠' | '╣' | '╬' | '├' | '┤' | '┼') => g.cross,
                _ => g.horizontal,
            };
            self.put(ch, x, y);
        }

        self.link_ui_lines(start, y, style);
        self.link_ui_lines(start + width - 1, y, style);
        self.set_fg(saved_fg);
    }

    /// Draw a vertical line of `height` cells starting at `(x, start)`.
    ///
    /// The vertical counterpart of [`Canvas::draw_horizontal_line`].
    pub fn draw_vertical_line(&mut self, x: u16, start: u16, height: u16, style: LineStyle) {
        if height == 0 {
            return;
        }
        let g = style.glyphs();
        let saved_fg = self.colors().0;
        self.set_fg(self.style.line_ui);

        for i in 0..height {
            let y = start + i;
            let existing = self.composite_at(i32::from(x), i32::from(y)).map(|c| c.ch);
            let ch = match existing {
                Some('╗' | '╝' | '╣' | '┐' | '┘' | '┤') => g.t_left,
                Some('╔' | '╚' | '╠' | '┌' | '└' | '├') => g.t_right,
                Some('═' | '─') => {
                    let left = self
                        .composite_at(i32::from(x) - 1, i32::from(y))
                        .is_some_and(|c| connects_right(c.ch));
                    let right = self
                        .composite_at(i32::from(x) + 1, i32::from(y))
                        .is_some_and(|c| connects_left(c.ch));
                    match (left, right) {
                        (true, true) => g.cross,
                        (true, false) => g.t_left,
                        (false, true) => g.t_right,
                        (false, false) => g.vertical,
                    }
                }
                Some('╦' | '╩' | '╬' | '┬' | '┴' | '┼') => g.cross,
                _ => g.vertical,
            };
            self.put(ch, x, y);
        }

        self.link_ui_lines(x, start, style);
        self.link_ui_lines(x, start + height - 1, style);
        self.set_fg(saved_fg);
    }

    /// Draw the outline of `rect`. Degenerate rectangles collapse to a single
    /// line; a 1×1 rectangle draws nothing.
    pub fn draw_box(&mut self, rect: Rect, style: LineStyle) {
        let Rect {
            x,
            y,
            width,
            height,
        } = rect;
        if width > 1 && height > 1 {
            self.draw_horizontal_line(y, x, width, style);
            self.draw_horizontal_line(y + height - 1, x, width, style);
            self.draw_vertical_line(x, y, height, style);
            self.draw_vertical_line(x + width - 1, y, height, style);
        } else if width > 1 {
            self.draw_horizontal_line(y, x, width, style);
        } else if height > 1 {
            self.draw_vertical_line(x, y, height, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Canvas, MemorySink, PaletteColor};

    fn canvas(w: u16, h: u16) -> Canvas<MemorySink> {
        Canvas::new(w, h, MemorySink::new(w, h))
    }

    fn glyph(c: &Canvas<MemorySink>, x: i32, y: i32) -> char {
        c.composite_at(x, y).map_or(' ', |cell| cell.ch)
    }

    #[test]
    fn test_junction_table_totality() {
        type M = LinkMask;
        // (mask, single, double); None = leave the cell alone.
        let table: [(LinkMask, Option<char>, Option<char>); 16] = [
            (M::empty(), None, None),
            (M::UP, None, None),
            (M::DOWN, None, None),
            (M::LEFT, None, None),
            (M::RIGHT, None, None),
            (M::UP | M::DOWN, Some('│'), Some('║')),
            (M::LEFT | M::RIGHT, Some('─'), Some('═')),
            (M::UP | M::RIGHT, Some('└'), Some('╚')),
            (M::UP | M::LEFT, Some('┘'), Some('╝')),
            (M::DOWN | M::RIGHT, Some('┌'), Some('╔')),
            (M::DOWN | M::LEFT, Some('┐'), Some('╗')),
            (M::UP | M::DOWN | M::RIGHT, Some('├'), Some('╠')),
            (M::UP | M::DOWN | M::LEFT, Some('┤'), Some('╣')),
            (M::UP | M::LEFT | M::RIGHT, Some('┴'), Some('╩')),
            (M::DOWN | M::LEFT | M::RIGHT, Some('┬'), Some('╦')),
            (M::all(), Some('┼'), Some('╬')),
        ];
        for (mask, single, double) in table {
            assert_eq!(junction_glyph(mask, LineStyle::Single), single, "{mask:?}");
            assert_eq!(junction_glyph(mask, LineStyle::Double), double, "{mask:?}");
        }
    }

    #[test]
    fn test_link_is_idempotent() {
        let mut c = canvas(9, 9);
        c.draw_horizontal_line(4, 0, 9, LineStyle::Double);
        c.draw_vertical_line(4, 0, 9, LineStyle::Double);
        assert_eq!(glyph(&c, 4, 4), '╬');

        // Re-linking a resolved cell with unchanged neighbors changes nothing.
        c.link_ui_lines(4, 4, LineStyle::Double);
        assert_eq!(glyph(&c, 4, 4), '╬');
        c.link_ui_lines(4, 4, LineStyle::Double);
        assert_eq!(glyph(&c, 4, 4), '╬');
    }

    #[test]
    fn test_crossing_lines_form_cross() {
        let mut c = canvas(9, 9);
        c.draw_vertical_line(3, 0, 9, LineStyle::Single);
        c.draw_horizontal_line(5, 0, 9, LineStyle::Single);
        assert_eq!(glyph(&c, 3, 5), '┼');
        assert_eq!(glyph(&c, 0, 5), '─');
        assert_eq!(glyph(&c, 3, 0), '│');
    }

    #[test]
    fn test_line_ending_on_line_forms_tee() {
        let mut c = canvas(9, 9);
        c.draw_vertical_line(6, 0, 9, LineStyle::Double);
        c.draw_horizontal_line(4, 0, 7, LineStyle::Double);
        // The horizontal line ends on the vertical one.
        assert_eq!(glyph(&c, 6, 4), '╣');
    }

    #[test]
    fn test_box_corners() {
        let mut c = canvas(10, 6);
        c.draw_box(Rect::new(1, 1, 6, 4), LineStyle::Double);
        assert_eq!(glyph(&c, 1, 1), '╔');
        assert_eq!(glyph(&c, 6, 1), '╗');
        assert_eq!(glyph(&c, 1, 4), '╚');
        assert_eq!(glyph(&c, 6, 4), '╝');
        assert_eq!(glyph(&c, 3, 1), '═');
        assert_eq!(glyph(&c, 1, 3), '║');
        // Interior untouched
        assert_eq!(c.composite_at(3, 2), None);
    }

    #[test]
    fn test_adjacent_boxes_share_junctions() {
        let mut c = canvas(12, 8);
        c.draw_box(Rect::new(0, 0, 6, 4), LineStyle::Single);
        c.draw_box(Rect::new(5, 0, 6, 4), LineStyle::Single);
        // The shared edge turns the meeting corners into tees.
        assert_eq!(glyph(&c, 5, 0), '┬');
        assert_eq!(glyph(&c, 5, 3), '┴');
        assert_eq!(glyph(&c, 5, 1), '│');
    }

    #[test]
    fn test_degenerate_boxes() {
        let mut c = canvas(10, 6);
        c.draw_box(Rect::new(1, 1, 5, 1), LineStyle::Single);
        assert_eq!(glyph(&c, 1, 1), '─');
        assert_eq!(glyph(&c, 5, 1), '─');
        c.draw_box(Rect::new(8, 1, 1, 4), LineStyle::Single);
        assert_eq!(glyph(&c, 8, 2), '│');
        c.draw_box(Rect::new(0, 5, 1, 1), LineStyle::Single);
        assert_eq!(c.composite_at(0, 5), None);
    }

    #[test]
    fn test_lower_layer_influences_linking() {
        let mut c = canvas(9, 9);
        c.resize_layers(2);
        c.set_active_layer(0);
        c.draw_vertical_line(4, 0, 9, LineStyle::Single);

        c.set_active_layer(1);
        c.draw_horizontal_line(4, 2, 5, LineStyle::Single);
        // The crossing cell lives on layer 1, but the junction was chosen
        // because of the vertical line on layer 0.
        assert_eq!(c.composite_at(4, 4).unwrap().ch, '┼');
        assert_eq!(c.active_layer(), 1);
    }

    #[test]
    fn test_lines_use_line_ui_color_and_restore_fg() {
        let mut c = canvas(9, 9);
        c.style.line_ui = PaletteColor::Cyan;
        c.set_colors(PaletteColor::Yellow, PaletteColor::Black);
        c.draw_horizontal_line(1, 0, 5, LineStyle::Single);

        assert_eq!(c.composite_at(2, 1).unwrap().fg, PaletteColor::Cyan);
        assert_eq!(c.colors(), (PaletteColor::Yellow, PaletteColor::Black));
    }
}
