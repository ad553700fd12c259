//! User interface building blocks on top of the canvas.
//!
//! - **lines**: box-drawing primitives with automatic junction linking
//! - **animation**: timed open/close animations for bordered boxes
//! - **menu**: keyboard-driven selection menu
//! - **input**: the keyboard boundary (`TermInput`, `ScriptedInput`)

pub mod animation;
pub mod input;
pub mod lines;
pub mod menu;

pub use animation::{BoxAnimation, Pacer, SleepPacer};
pub use input::{InputSource, Key, KeyId, KeySet, ScriptedInput, TermInput};
pub use lines::{junction_glyph, LineStyle, LinkMask};
pub use menu::{run_menu, MenuConfig};
