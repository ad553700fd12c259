//! Core canvas components.
//!
//! This module contains the layered rendering state and its boundaries:
//!
//! - **cell**: cell, palette-color and rectangle value types
//! - **cp437**: the legacy 8-bit glyph repertoire text is normalized to
//! - **canvas**: the layer stack, virtual cursor and compositor
//! - **sink**: the output boundary (`TermSink` for the real terminal,
//!   `MemorySink` for tests and headless use)
//!
//! # Architecture
//!
//! ```text
//! Canvas
//! ├── Layers (ordered stack of cell grids)
//! ├── Virtual cursor + active layer + drawing colors
//! └── OutputSink (flushed to on update())
//! ```

pub mod canvas;
pub mod cell;
pub mod cp437;
pub mod sink;

pub use canvas::{Canvas, StyleColors};
pub use cell::{Cell, PaletteColor, Rect};
pub use sink::{MemorySink, OutputSink, TermSink};
