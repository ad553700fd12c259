//! Output boundary: flushing composited cells to a display.
//!
//! [`TermSink`] is the production implementation, writing to the real
//! terminal through crossterm. [`MemorySink`] keeps the last flushed frame in
//! memory for tests and headless runs.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::core::cell::{Cell, PaletteColor};

/// Receives composited rectangles for display.
///
/// `cells` is row-major with `size.0 * size.1` entries; `None` entries are
/// blank (no glyph was composited there) and render as empty space.
pub trait OutputSink {
    fn write_region(
        &mut self,
        origin: (u16, u16),
        size: (u16, u16),
        cells: &[Option<Cell>],
    ) -> io::Result<()>;
}

/// Crossterm-backed sink writing to the attached terminal.
pub struct TermSink {
    initialized: bool,
}

impl Default for TermSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TermSink {
    pub fn new() -> Self {
        Self { initialized: false }
    }

    /// Terminal buffer geometry, queried once when sizing a canvas.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Initialize the terminal for rendering: raw mode, alternate screen,
    /// hidden cursor, cleared buffer.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        stdout.flush()?;
        self.initialized = true;
        Ok(())
    }

    /// Restore the terminal state.
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, Show, LeaveAlternateScreen);
        let _ = stdout.flush();
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl OutputSink for TermSink {
    fn write_region(
        &mut self,
        origin: (u16, u16),
        size: (u16, u16),
        cells: &[Option<Cell>],
    ) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(out, "\x1b[?2026h")?;

        let (w, h) = size;
        for row in 0..h {
            queue!(out, MoveTo(origin.0, origin.1 + row))?;
            // Re-issue colors only when they change along the row.
            let mut current: Option<(PaletteColor, PaletteColor)> = None;
            queue!(out, ResetColor)?;
            for col in 0..w {
                match cells[row as usize * w as usize + col as usize] {
                    Some(cell) => {
                        if current != Some((cell.fg, cell.bg)) {
                            queue!(
                                out,
                                SetForegroundColor(cell.fg.to_crossterm()),
                                SetBackgroundColor(cell.bg.to_crossterm())
                            )?;
                            current = Some((cell.fg, cell.bg));
                        }
                        write!(out, "{}", cell.ch)?;
                    }
                    None => {
                        if current.is_some() {
                            queue!(out, ResetColor)?;
                            current = None;
                        }
                        write!(out, " ")?;
                    }
                }
            }
        }

        queue!(out, ResetColor)?;

        // End synchronized update
        write!(out, "\x1b[?2026l")?;
        out.flush()
    }
}

impl Drop for TermSink {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// In-memory sink keeping the last flushed state of the whole frame.
///
/// Regions accumulate into a persistent `width × height` frame, so a test can
/// inspect what the screen would show after any sequence of updates.
#[allow(dead_code)]
pub struct MemorySink {
    width: u16,
    height: u16,
    frame: Vec<Option<Cell>>,
    flushes: usize,
    /// When set, the next writes fail with an IO error (for testing the
    /// fatal-update path).
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MemorySink {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            frame: vec![None; width as usize * height as usize],
            flushes: 0,
            fail_writes: false,
        }
    }

    /// Number of completed flushes.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// The flushed cell at `(x, y)`.
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Cell> {
        self.frame[y as usize * self.width as usize + x as usize]
    }

    /// The flushed glyph at `(x, y)`, with `' '` for blank cells.
    pub fn glyph_at(&self, x: u16, y: u16) -> char {
        self.cell_at(x, y).map_or(' ', |c| c.ch)
    }

    /// Row `y` of the flushed frame as text, blanks as spaces.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width).map(|x| self.glyph_at(x, y)).collect()
    }
}

impl OutputSink for MemorySink {
    fn write_region(
        &mut self,
        origin: (u16, u16),
        size: (u16, u16),
        cells: &[Option<Cell>],
    ) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "sink write failed"));
        }
        let (w, h) = size;
        debug_assert_eq!(cells.len(), w as usize * h as usize);
        for row in 0..h {
            for col in 0..w {
                let x = origin.0 + col;
                let y = origin.1 + row;
                if x < self.width && y < self.height {
                    self.frame[y as usize * self.width as usize + x as usize] =
                        cells[row as usize * w as usize + col as usize];
                }
            }
        }
        self.flushes += 1;
        Ok(())
    }
}
