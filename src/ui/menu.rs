//! Keyboard-driven selection menu.
//!
//! The menu renders its options as rows starting at the virtual cursor and
//! loops on Up/Down/confirm/cancel keys until the user picks an enabled
//! option or cancels. Disabled options can be highlighted while navigating;
//! only confirming on them is rejected.

use std::io;

use tracing::warn;

use crate::core::canvas::Canvas;
use crate::core::cell::PaletteColor;
use crate::core::sink::OutputSink;
use crate::ui::input::{InputSource, KeyId, KeySet};

/// Menu behavior knobs.
#[derive(Clone, Debug, Default)]
pub struct MenuConfig {
    /// Column width every option is padded and truncated to; `None` uses the
    /// widest option.
    pub width: Option<usize>,
    /// Initially selected option (zero-based); out-of-range falls back to 0.
    pub start: usize,
    /// Per-option disabled flags; must match the option count.
    pub disabled: Option<Vec<bool>>,
}

/// Run a selection menu over `options`, rendered at the virtual cursor on the
/// active layer.
///
/// Returns `Some(index)` for the confirmed option (zero-based) or `None` when
/// the user cancels — cancelling works even while a disabled option is
/// highlighted. The option strings are padded in place to the column width.
///
/// Caller mistakes degrade instead of failing: an empty option list is
/// replaced by a placeholder, and disabled flags of the wrong length are
/// dropped, both with a logged diagnostic.
pub fn run_menu<S: OutputSink, I: InputSource>(
    canvas: &mut Canvas<S>,
    input: &mut I,
    options: &mut Vec<String>,
    config: &MenuConfig,
) -> io::Result<Option<usize>> {
    if options.is_empty() {
        warn!("menu invoked with no options; substituting a placeholder");
        options.push("ERROR".to_string());
    }

    let disabled = match &config.disabled {
        Some(flags) if flags.len() != options.len() => {
            warn!(
                options = options.len(),
                flags = flags.len(),
                "disabled flags do not match the option list; ignoring them"
            );
            vec![false; options.len()]
        }
        Some(flags) => flags.clone(),
        None => vec![false; options.len()],
    };

    let width = config
        .width
        .unwrap_or_else(|| options.iter().map(|o| o.chars().count()).max().unwrap_or(0));
    for option in options.iter_mut() {
        while option.chars().count() < width {
            option.push(' ');
        }
    }

    let mut selected = if config.start < options.len() {
        config.start
    } else {
        0
    };
    let (origin_x, origin_y) = canvas.cursor();
    let base = canvas.colors();

    for (i, option) in options.iter().enumerate() {
        paint_row(
            canvas,
            option,
            width,
            origin_x,
            origin_y + i as u16,
            disabled[i],
            i == selected,
            base,
        );
    }
    canvas.update()?;

    loop {
        let key = input.next_key(
            KeySet::UP | KeySet::DOWN | KeySet::CONFIRM | KeySet::CANCEL,
            false,
        )?;
        match key.id {
            KeyId::Up | KeyId::Down => {
                if options.len() == 1 {
                    continue;
                }
                let previous = selected;
                selected = if key.id == KeyId::Up {
                    selected.checked_sub(1).unwrap_or(options.len() - 1)
                } else {
                    (selected + 1) % options.len()
                };
                for i in [previous, selected] {
                    paint_row(
                        canvas,
                        &options[i],
                        width,
                        origin_x,
                        origin_y + i as u16,
                        disabled[i],
                        i == selected,
                        base,
                    );
                }
                canvas.update()?;
            }
            KeyId::Enter | KeyId::NumpadEnter | KeyId::Space => {
                if !disabled[selected] {
                    return Ok(Some(selected));
                }
            }
            KeyId::Escape | KeyId::Backspace => return Ok(None),
            _ => {}
        }
    }
}

/// Draw one option row with its selection/disabled styling, restoring the
/// base colors afterwards.
#[allow(clippy::too_many_arguments)]
fn paint_row<S: OutputSink>(
    canvas: &mut Canvas<S>,
    option: &str,
    width: usize,
    x: u16,
    y: u16,
    disabled: bool,
    highlighted: bool,
    base: (PaletteColor, PaletteColor),
) {
    let fg = if disabled {
        canvas.style.disabled
    } else {
        base.0
    };
    let bg = if highlighted {
        // Fall back so the highlight stays visible when the selection color
        // matches the surrounding background.
        if canvas.style.selection == base.1 {
            PaletteColor::DarkGreen
        } else {
            canvas.style.selection
        }
    } else {
        base.1
    };
    canvas.set_fg(fg);
    canvas.set_bg(bg);
    let row: String = option.chars().take(width).collect();
    canvas.write_at(&row, x, y);
    canvas.set_colors(base.0, base.1);
}
