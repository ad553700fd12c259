//! Timed open/close animations for bordered boxes.
//!
//! A box opens in two phases: a horizontal center line grows outward from the
//! midpoint, then the sides grow toward the top and bottom edges, revealing
//! one row of body content per side per step while the travelling borders are
//! re-linked into any surrounding line art. Closing runs the phases in
//! reverse. Every step flushes a frame and then pauses for its share of the
//! requested duration, so the whole animation takes roughly that long.
//!
//! Pacing goes through the [`Pacer`] trait; the production [`SleepPacer`]
//! blocks the calling thread, which makes an in-progress animation strictly
//! sequential with everything else on the canvas.

use std::io;
use std::time::Duration;

use crate::core::canvas::Canvas;
use crate::core::cell::Rect;
use crate::core::sink::OutputSink;
use crate::ui::lines::{connects_down, connects_up, LineStyle};

/// Pacing boundary between animation steps.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the calling thread between steps.
#[derive(Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Duration and line style of one box animation.
#[derive(Clone, Copy, Debug)]
pub struct BoxAnimation {
    pub duration: Duration,
    pub style: LineStyle,
}

impl Default for BoxAnimation {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            style: LineStyle::Double,
        }
    }
}

/// Per-step pauses for the two phases.
///
/// The horizontal phase gets `width / (width + 2*height)` of the total,
/// split evenly over its steps; the vertical phase gets the remainder.
fn phase_pauses(area: Rect, duration: Duration) -> (Duration, Duration) {
    let w = f64::from(area.width);
    let h = f64::from(area.height);
    let horizontal_share = w / (w + 2.0 * h);

    let h_steps = u32::from(area.width / 2 + 1);
    let v_steps = u32::from(area.height / 2).max(1);
    let h_pause = duration.mul_f64(horizontal_share) / h_steps;
    let v_pause = duration.mul_f64(1.0 - horizontal_share) / v_steps;
    (h_pause, v_pause)
}

/// Box dimensions that fit `body` with a one-cell border on every side.
fn fit_rect(x: u16, y: u16, body: &[String]) -> Rect {
    let width = body
        .iter()
        .map(|line| line.chars().count() + 2)
        .max()
        .unwrap_or(2) as u16;
    Rect::new(x, y, width, body.len() as u16 + 2)
}

impl<S: OutputSink> Canvas<S> {
    /// Reveal a bordered box over `area` with an animated two-phase opening.
    ///
    /// `body` rows are blank-padded and truncated to the box interior; `None`
    /// reveals an all-blank interior. Borders render in the `line_ui` style
    /// color, body rows in the current drawing colors.
    pub fn open_box(
        &mut self,
        area: Rect,
        body: Option<&[String]>,
        anim: &BoxAnimation,
        pacer: &mut dyn Pacer,
    ) -> io::Result<()> {
        let Rect {
            x,
            y,
            width,
            height,
        } = area;
        if width < 2 || height < 2 {
            // Nothing to animate on a degenerate box.
            self.draw_box(area, anim.style);
            return self.update_region(area);
        }

        let style = anim.style;
        let g = style.glyphs();
        let (h_pause, v_pause) = phase_pauses(area, anim.duration);
        let saved_fg = self.colors().0;

        // Normalize the body to exactly the interior dimensions.
        let interior = usize::from(width - 2);
        let body_rows: Vec<String> = (0..usize::from(height - 2))
            .map(|i| {
                let src = body
                    .and_then(|lines| lines.get(i))
                    .map(String::as_str)
                    .unwrap_or("");
                let mut row: String = src.chars().take(interior).collect();
                while row.chars().count() < interior {
                    row.push(' ');
                }
                row
            })
            .collect();

        let mid_y = y + height / 2;

        // Phase 1: the center line grows outward from the midpoint.
        self.set_fg(self.style.line_ui);
        for i in 0..=width / 2 {
            let left = x + width / 2 - i;
            let right = (x + width / 2 + i).min(x + width - 1);
            self.put(g.horizontal, left, mid_y);
            self.put(g.horizontal, right, mid_y);
            // Link the fresh endpoints and the previous ones, whose
            // connectivity just changed.
            self.link_ui_lines(left, mid_y, style);
            self.link_ui_lines((left + 1).min(x + width - 1), mid_y, style);
            self.link_ui_lines(right.saturating_sub(1).max(x), mid_y, style);
            self.link_ui_lines(right, mid_y, style);

            self.update_region(area)?;
            pacer.pause(h_pause);
        }

        // Phase 2: the sides grow outward, one body row per side per step,
        // with the borders travelling just outside the revealed slice.
        let (bx, by, bw, bh) = (
            i32::from(x),
            i32::from(y),
            i32::from(width),
            i32::from(height),
        );
        let mid = i32::from(mid_y);
        for i in 0..bh / 2 {
            let top = mid - i;
            let bottom = if bh % 2 == 1 { mid + i } else { mid + i - 1 };

            let mut side_rows = Vec::new();
            if bottom >= top {
                side_rows.push(top);
                if bottom != top {
                    side_rows.push(bottom);
                }
                for &row in &side_rows {
                    let line = &body_rows[(row - by - 1) as usize];
                    self.set_fg(saved_fg);
                    self.write_at(line, x + 1, row as u16);
                    self.set_fg(self.style.line_ui);
                    self.put(g.vertical, x, row as u16);
                    self.put(g.vertical, x + width - 1, row as u16);
                }
            }

            self.draw_horizontal_line((top - 1) as u16, x, width, style);
            self.draw_horizontal_line((bottom + 1) as u16, x, width, style);

            // Merge the side cells with the borders and any exterior lines
            // they now touch.
            for &row in &side_rows {
                self.link_ui_lines(x, row as u16, style);
                self.link_ui_lines(x + width - 1, row as u16, style);
            }

            // Exterior lines crossing the borders keep their junctions.
            self.set_fg(self.style.line_ui);
            for j in 1..bw - 1 {
                let cx = bx + j;
                if self
                    .composite_at(cx, top - 2)
                    .is_some_and(|c| connects_down(c.ch))
                {
                    self.put(g.t_up, cx as u16, (top - 1) as u16);
                }
                if self
                    .composite_at(cx, bottom + 2)
                    .is_some_and(|c| connects_up(c.ch))
                {
                    self.put(g.t_down, cx as u16, (bottom + 1) as u16);
                }
            }

            self.update_region(area)?;
            pacer.pause(v_pause);
        }

        self.set_fg(saved_fg);
        Ok(())
    }

    /// [`Canvas::open_box`] with dimensions derived from `body`
    /// (`height = rows + 2`, `width = longest row + 2`). Returns the derived
    /// rectangle so the caller can close the same box later.
    pub fn open_box_fit(
        &mut self,
        x: u16,
        y: u16,
        body: &[String],
        anim: &BoxAnimation,
        pacer: &mut dyn Pacer,
    ) -> io::Result<Rect> {
        let area = fit_rect(x, y, body);
        self.open_box(area, Some(body), anim, pacer)?;
        Ok(area)
    }

    /// Remove a previously drawn box with the inverse animation: rows
    /// collapse toward the vertical middle, then the remaining center line
    /// collapses toward its midpoint.
    ///
    /// Erasure happens on the active layer; content on lower layers shows
    /// through as cells are cleared.
    pub fn close_box(
        &mut self,
        area: Rect,
        anim: &BoxAnimation,
        pacer: &mut dyn Pacer,
    ) -> io::Result<()> {
        let Rect {
            x,
            y,
            width,
            height,
        } = area;
        if width < 2 || height < 2 {
            self.erase_at(width, height, x, y);
            return self.update_region(area);
        }

        let style = anim.style;
        let g = style.glyphs();
        let (h_pause, v_pause) = phase_pauses(area, anim.duration);
        let saved_fg = self.colors().0;
        self.set_fg(self.style.line_ui);

        let (bx, bw, bh) = (i32::from(x), i32::from(width), i32::from(height));
        let mid = i32::from(y) + bh / 2;
        let last_row = i32::from(y) + bh - 1;

        // Phase 1: erase the row pairs symmetric about the middle, starting
        // at the edges, pulling the borders inward after each pair.
        for i in (1..=bh / 2).rev() {
            self.erase_at(width, 1, x, (mid - i) as u16);
            if mid + i <= last_row {
                self.erase_at(width, 1, x, (mid + i) as u16);
            }
            self.draw_horizontal_line((mid - i + 1) as u16, x, width, style);
            self.draw_horizontal_line(((mid + i - 1).min(last_row)) as u16, x, width, style);

            for j in 1..bw - 1 {
                let cx = bx + j;
                let up_linked = self
                    .composite_at(cx, mid - i)
                    .is_some_and(|c| connects_down(c.ch));
                let down_linked = self
                    .composite_at(cx, mid + i)
                    .is_some_and(|c| connects_up(c.ch));
                if i != 1 {
                    if up_linked {
                        self.put(g.t_up, cx as u16, (mid - i + 1) as u16);
                    }
                    if down_linked && mid + i - 1 <= last_row {
                        self.put(g.t_down, cx as u16, (mid + i - 1) as u16);
                    }
                } else {
                    // The borders have met on the middle row.
                    let ch = match (up_linked, down_linked) {
                        (true, true) => Some(g.cross),
                        (false, true) => Some(g.t_down),
                        (true, false) => Some(g.t_up),
                        (false, false) => None,
                    };
                    if let Some(ch) = ch {
                        self.put(ch, cx as u16, mid as u16);
                    }
                }
            }

            self.update()?;
            pacer.pause(v_pause);
        }

        // Phase 2: the remaining line collapses from the ends toward the
        // middle.
        for i in (0..=width / 2).rev() {
            let left = x + width / 2 - i;
            let right = (x + width / 2 + i).min(x + width - 1);
            self.erase_at(1, 1, left, mid as u16);
            self.erase_at(1, 1, right, mid as u16);
            self.update()?;
            pacer.pause(h_pause);
        }

        self.set_fg(saved_fg);
        Ok(())
    }

    /// [`Canvas::close_box`] with dimensions derived from `body`, matching
    /// the rectangle [`Canvas::open_box_fit`] produced for the same content.
    #[allow(dead_code)]
    pub fn close_box_fit(
        &mut self,
        x: u16,
        y: u16,
        body: &[String],
        anim: &BoxAnimation,
        pacer: &mut dyn Pacer,
    ) -> io::Result<()> {
        self.close_box(fit_rect(x, y, body), anim, pacer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Canvas, MemorySink};

    /// Records pauses instead of sleeping.
    #[derive(Default)]
    struct RecordingPacer {
        pauses: Vec<Duration>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&mut self, duration: Duration) {
            self.pauses.push(duration);
        }
    }

    impl RecordingPacer {
        fn total(&self) -> Duration {
            self.pauses.iter().sum()
        }
    }

    fn canvas(w: u16, h: u16) -> Canvas<MemorySink> {
        Canvas::new(w, h, MemorySink::new(w, h))
    }

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_open_box_draws_borders_and_body() {
        let mut c = canvas(20, 12);
        let mut pacer = RecordingPacer::default();
        let area = Rect::new(2, 2, 10, 5);
        let body = strings(&["hello", "a much too long line", "x"]);
        c.open_box(area, Some(&body), &BoxAnimation::default(), &mut pacer)
            .unwrap();

        let g = |x, y| c.composite_at(x, y).map_or(' ', |cell| cell.ch);
        assert_eq!(g(2, 2), '╔');
        assert_eq!(g(11, 2), '╗');
        assert_eq!(g(2, 6), '╚');
        assert_eq!(g(11, 6), '╝');
        assert_eq!(g(5, 2), '═');
        assert_eq!(g(2, 4), '║');
        // Body rows: padded, truncated, blank-filled.
        let row: String = (3..11).map(|x| g(x, 3)).collect();
        assert_eq!(row, "hello   ");
        let row: String = (3..11).map(|x| g(x, 4)).collect();
        assert_eq!(row, "a much t");
        let row: String = (3..11).map(|x| g(x, 5)).collect();
        assert_eq!(row, "x       ");
    }

    #[test]
    fn test_open_box_blank_interior_when_no_body() {
        let mut c = canvas(20, 12);
        let mut pacer = RecordingPacer::default();
        c.open_box(
            Rect::new(1, 1, 8, 6),
            None,
            &BoxAnimation::default(),
            &mut pacer,
        )
        .unwrap();
        for y in 2..6 {
            let row: String = (2..8)
                .map(|x| c.composite_at(x, y).map_or('.', |cell| cell.ch))
                .collect();
            assert_eq!(row, "      ");
        }
    }

    #[test]
    fn test_open_box_links_into_existing_lines() {
        let mut c = canvas(24, 14);
        c.draw_horizontal_line(6, 0, 24, LineStyle::Double);
        let mut pacer = RecordingPacer::default();
        // Box straddling the existing line: its sides cross it.
        c.open_box(
            Rect::new(4, 3, 9, 7),
            None,
            &BoxAnimation::default(),
            &mut pacer,
        )
        .unwrap();

        let g = |x, y| c.composite_at(x, y).map_or(' ', |cell| cell.ch);
        // Side borders meet the horizontal line: the arm points outward.
        assert_eq!(g(4, 6), '╣');
        assert_eq!(g(12, 6), '╠');
        // Outside the box the line is untouched.
        assert_eq!(g(0, 6), '═');
        assert_eq!(g(20, 6), '═');
    }

    #[test]
    fn test_close_box_clears_area() {
        let mut c = canvas(20, 12);
        let mut pacer = RecordingPacer::default();
        let area = Rect::new(3, 2, 9, 6);
        let body = strings(&["content", "here"]);
        c.open_box(area, Some(&body), &BoxAnimation::default(), &mut pacer)
            .unwrap();
        c.close_box(area, &BoxAnimation::default(), &mut pacer)
            .unwrap();

        for y in 2..8 {
            for x in 3..12 {
                assert_eq!(c.composite_at(x, y), None, "({x},{y}) not cleared");
            }
        }
    }

    #[test]
    fn test_close_box_does_not_touch_outside() {
        let mut c = canvas(20, 12);
        c.write_at("KEEP", 0, 0);
        c.write_at("EDGE", 14, 8);
        let mut pacer = RecordingPacer::default();
        let area = Rect::new(4, 2, 8, 6);
        c.open_box(area, None, &BoxAnimation::default(), &mut pacer)
            .unwrap();
        c.close_box(area, &BoxAnimation::default(), &mut pacer)
            .unwrap();

        assert_eq!(c.composite_at(0, 0).unwrap().ch, 'K');
        assert_eq!(c.composite_at(14, 8).unwrap().ch, 'E');
    }

    #[test]
    fn test_animation_pacing_totals() {
        // Total pause time stays within ±20% of the request across aspect
        // ratios, for both animations.
        let duration = Duration::from_millis(400);
        for (w, h) in [(10u16, 4u16), (8, 8), (4, 12)] {
            for closing in [false, true] {
                let mut c = canvas(40, 20);
                let mut pacer = RecordingPacer::default();
                let area = Rect::new(1, 1, w, h);
                let anim = BoxAnimation {
                    duration,
                    style: LineStyle::Double,
                };
                if closing {
                    c.close_box(area, &anim, &mut pacer).unwrap();
                } else {
                    c.open_box(area, None, &anim, &mut pacer).unwrap();
                }
                let total = pacer.total();
                assert!(
                    total >= duration.mul_f64(0.8) && total <= duration.mul_f64(1.2),
                    "{w}x{h} closing={closing}: total {total:?}"
                );
            }
        }
    }

    #[test]
    fn test_open_box_updates_each_step() {
        let mut c = canvas(20, 12);
        let mut pacer = RecordingPacer::default();
        let area = Rect::new(2, 2, 8, 6);
        c.open_box(area, None, &BoxAnimation::default(), &mut pacer)
            .unwrap();
        // One flush per step, one pause per step: width/2 + 1 horizontal
        // steps plus height/2 vertical steps.
        assert_eq!(c.sink().flushes(), pacer.pauses.len());
        assert_eq!(pacer.pauses.len(), 5 + 3);
    }

    #[test]
    fn test_fit_variants_derive_dimensions() {
        let mut c = canvas(30, 12);
        let mut pacer = RecordingPacer::default();
        let body = strings(&["Hello", "Hi"]);
        let area = c
            .open_box_fit(3, 1, &body, &BoxAnimation::default(), &mut pacer)
            .unwrap();
        assert_eq!(area, Rect::new(3, 1, 7, 4));
        assert_eq!(c.composite_at(3, 1).unwrap().ch, '╔');
        assert_eq!(c.composite_at(9, 4).unwrap().ch, '╝');

        c.close_box_fit(3, 1, &body, &BoxAnimation::default(), &mut pacer)
            .unwrap();
        assert_eq!(c.composite_at(3, 1), None);
    }

    #[test]
    fn test_open_box_body_in_current_colors() {
        use crate::core::PaletteColor;
        let mut c = canvas(20, 12);
        c.set_colors(PaletteColor::Yellow, PaletteColor::Black);
        c.style.line_ui = PaletteColor::Cyan;
        let mut pacer = RecordingPacer::default();
        let body = strings(&["text"]);
        let area = c
            .open_box_fit(2, 2, &body, &BoxAnimation::default(), &mut pacer)
            .unwrap();

        let border = c.composite_at(i32::from(area.x), i32::from(area.y)).unwrap();
        assert_eq!(border.fg, PaletteColor::Cyan);
        let body_cell = c.composite_at(3, 3).unwrap();
        assert_eq!(body_cell.ch, 't');
        assert_eq!(body_cell.fg, PaletteColor::Yellow);
        // The caller's colors are restored afterwards.
        assert_eq!(c.colors(), (PaletteColor::Yellow, PaletteColor::Black));
    }
}
