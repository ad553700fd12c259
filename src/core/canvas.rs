//! Layered canvas: cell grids, virtual cursor, and compositing.
//!
//! The canvas owns an ordered stack of fixed-size layers. Drawing operations
//! mutate the active layer only; [`Canvas::update`] flattens a rectangle of
//! the stack (highest non-empty layer wins per cell) and hands the result to
//! the output sink. Nothing is displayed until `update` is called.

use std::io;

use crate::core::cell::{Cell, PaletteColor, Rect};
use crate::core::cp437;
use crate::core::sink::OutputSink;

/// One grid in the layer stack. Higher-indexed layers render on top.
#[derive(Clone)]
pub struct Layer {
    cells: Vec<Option<Cell>>,
    width: u16,
}

impl Layer {
    fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![None; width as usize * height as usize],
            width,
        }
    }

    fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    fn set(&mut self, x: u16, y: u16, cell: Option<Cell>) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    fn clear(&mut self) {
        self.cells.fill(None);
    }
}

/// Style colors read live by the drawing, animation and menu operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleColors {
    /// Foreground for menu rows that cannot be confirmed.
    pub disabled: PaletteColor,
    /// Background of the highlighted menu row.
    pub selection: PaletteColor,
    /// Foreground of box-drawing line art.
    pub line_ui: PaletteColor,
}

impl Default for StyleColors {
    fn default() -> Self {
        Self {
            disabled: PaletteColor::Gray,
            selection: PaletteColor::DarkGreen,
            line_ui: PaletteColor::Blue,
        }
    }
}

/// The layered drawing surface.
///
/// Geometry is fixed at creation time; a terminal resize is not reconciled
/// automatically. All state is single-threaded: one logical caller drives a
/// canvas at a time.
pub struct Canvas<S> {
    layers: Vec<Layer>,
    width: u16,
    height: u16,
    cursor_x: u16,
    cursor_y: u16,
    active: usize,
    fg: PaletteColor,
    bg: PaletteColor,
    /// Live style configuration; may be reassigned between calls.
    pub style: StyleColors,
    sink: S,
}

impl<S> Canvas<S> {
    /// Create a canvas with a single empty layer of the given geometry.
    pub fn new(width: u16, height: u16, sink: S) -> Self {
        Self {
            layers: vec![Layer::new(width, height)],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
            active: 0,
            fg: PaletteColor::White,
            bg: PaletteColor::Black,
            style: StyleColors::default(),
            sink,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[allow(dead_code)]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Replace the layer stack with `count` layers.
    ///
    /// Layers below `min(old, count)` keep their contents; added layers are
    /// empty; layers at or above `count` are discarded, losing their content.
    /// Every layer costs one check per cell during compositing, so avoid
    /// stacking layers that stay empty. `count` is clamped to at least 1.
    pub fn resize_layers(&mut self, count: usize) {
        let count = count.max(1);
        let (width, height) = (self.width, self.height);
        self.layers.resize_with(count, || Layer::new(width, height));
        if self.active >= count {
            self.active = 0;
        }
    }

    /// Move the virtual cursor. Each axis is applied only if in-bounds; an
    /// invalid axis leaves that coordinate unchanged.
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        if x < self.width {
            self.cursor_x = x;
        }
        if y < self.height {
            self.cursor_y = y;
        }
    }

    pub fn cursor(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    /// Select the layer targeted by writes and erases. Out-of-range indices
    /// are ignored.
    pub fn set_active_layer(&mut self, index: usize) {
        if index < self.layers.len() {
            self.active = index;
        }
    }

    #[allow(dead_code)]
    pub fn active_layer(&self) -> usize {
        self.active
    }

    /// Set the current drawing colors used by subsequent writes.
    pub fn set_colors(&mut self, fg: PaletteColor, bg: PaletteColor) {
        self.fg = fg;
        self.bg = bg;
    }

    pub fn set_fg(&mut self, fg: PaletteColor) {
        self.fg = fg;
    }

    pub fn set_bg(&mut self, bg: PaletteColor) {
        self.bg = bg;
    }

    pub fn colors(&self) -> (PaletteColor, PaletteColor) {
        (self.fg, self.bg)
    }

    /// Write `text` onto the active layer starting at the virtual cursor.
    ///
    /// The cursor itself is not moved.
    pub fn write(&mut self, text: &str) {
        self.write_at(text, self.cursor_x, self.cursor_y);
    }

    /// Write `text` onto the active layer starting at `(x, y)`.
    ///
    /// One cell per character, normalized to the CP437 repertoire, using the
    /// drawing colors captured once before the loop. The column wraps to the
    /// start of the next row at the right edge, and past the last row the
    /// write wraps back to row 0. Cells that fall outside the buffer are
    /// skipped.
    pub fn write_at(&mut self, text: &str, x: u16, y: u16) {
        let (fg, bg) = (self.fg, self.bg);
        let mut cx = x;
        let mut cy = y;
        for ch in text.chars() {
            if cx < self.width && cy < self.height {
                self.layers[self.active].set(cx, cy, Some(Cell::new(cp437::normalize(ch), fg, bg)));
            }
            cx += 1;
            if cx >= self.width {
                cx = 0;
                cy += 1;
                if cy >= self.height {
                    cy = 0;
                }
            }
        }
    }

    /// Place a single glyph at `(x, y)` with the current colors.
    pub(crate) fn put(&mut self, ch: char, x: u16, y: u16) {
        if x < self.width && y < self.height {
            self.layers[self.active].set(
                x,
                y,
                Some(Cell::new(cp437::normalize(ch), self.fg, self.bg)),
            );
        }
    }

    /// Clear a `width × height` rectangle at the virtual cursor on the active
    /// layer.
    #[allow(dead_code)]
    pub fn erase(&mut self, width: u16, height: u16) {
        self.erase_at(width, height, self.cursor_x, self.cursor_y);
    }

    /// Clear a `width × height` rectangle at `(x, y)` on the active layer,
    /// clamped to the buffer bounds.
    pub fn erase_at(&mut self, width: u16, height: u16, x: u16, y: u16) {
        let w = width.min(self.width.saturating_sub(x));
        let h = height.min(self.height.saturating_sub(y));
        for dy in 0..h {
            for dx in 0..w {
                self.layers[self.active].set(x + dx, y + dy, None);
            }
        }
    }

    /// Reset layer `index` to fully empty; an out-of-range index resets the
    /// active layer instead.
    #[allow(dead_code)]
    pub fn reset_layer(&mut self, index: usize) {
        let index = if index < self.layers.len() {
            index
        } else {
            self.active
        };
        self.layers[index].clear();
    }

    /// Reset the active layer to fully empty.
    pub fn reset_active_layer(&mut self) {
        self.layers[self.active].clear();
    }

    /// Reset every layer to fully empty.
    #[allow(dead_code)]
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// The cell visible at `(x, y)` after the next update: the highest layer
    /// with a non-empty cell there wins. Out-of-bounds coordinates yield
    /// `None`, as does a position no layer has written.
    pub fn composite_at(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        let (x, y) = (x as u16, y as u16);
        self.layers.iter().rev().find_map(|layer| layer.get(x, y))
    }

    #[allow(dead_code)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[allow(dead_code)]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: OutputSink> Canvas<S> {
    /// Composite the full buffer and flush it to the sink.
    pub fn update(&mut self) -> io::Result<()> {
        self.update_region(Rect::new(0, 0, self.width, self.height))
    }

    /// Composite `region` (clamped to the buffer) and flush it to the sink.
    ///
    /// A sink failure is fatal for this call and is returned as-is; the
    /// on-screen state of the failed frame is unknown, so no retry is made.
    pub fn update_region(&mut self, region: Rect) -> io::Result<()> {
        let x = region.x.min(self.width);
        let y = region.y.min(self.height);
        let w = region.width.min(self.width - x);
        let h = region.height.min(self.height - y);
        if w == 0 || h == 0 {
            return Ok(());
        }

        let mut cells = Vec::with_capacity(w as usize * h as usize);
        for row in y..y + h {
            for col in x..x + w {
                cells.push(self.composite_at(i32::from(col), i32::from(row)));
            }
        }
        self.sink.write_region((x, y), (w, h), &cells)
    }
}
