//! layerterm - a layered text-mode rendering engine
//!
//! layerterm keeps multiple in-memory cell grids ("layers"), composites them
//! into frames on demand, and builds box-drawing line art, animated boxes and
//! keyboard menus on top.
//!
//! # Features
//!
//! - **Layers**: ordered stack of grids, highest non-empty cell wins
//! - **Auto-linked line art**: crossing lines merge into junction glyphs
//! - **Animated boxes**: timed two-phase open/close reveals
//! - **Menus**: wrap-around keyboard selection with disabled entries
//!
//! # Quick Start
//!
//! ```text
//! layerterm              # Run the interactive demo
//! layerterm -1           # Same, with single-line borders
//! layerterm -d 1000      # Slow the animations down to ~1s
//! ```
//!
//! The binary is a demonstration of the engine; the modules under `core/` and
//! `ui/` are the engine itself.

mod config;
mod core;
mod ui;

use std::env;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::core::{Canvas, Rect, TermSink};
use crate::ui::{
    run_menu, BoxAnimation, InputSource, KeySet, LineStyle, MenuConfig, SleepPacer, TermInput,
};

/// Command line options
struct CliArgs {
    /// Animation duration override in milliseconds
    duration: Option<u64>,
    /// Force single-line borders
    single: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            duration: None,
            single: false,
        }
    }
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("layerterm {}", VERSION);
}

fn print_help() {
    eprintln!("layerterm {} - a layered text-mode rendering engine", VERSION);
    eprintln!();
    eprintln!("Usage: layerterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -1, --single          Single-line borders instead of double");
    eprintln!("  -d, --duration <MS>   Animation duration in milliseconds");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Demo keys:");
    eprintln!("  Up/Down               Move the menu selection");
    eprintln!("  Enter/Space           Confirm");
    eprintln!("  Esc/Backspace         Cancel / quit");
    eprintln!();
    eprintln!("Configuration: ~/.layerterm/config.toml");
}

fn parse_args() -> Result<CliArgs, String> {
    let args: Vec<String> = env::args().collect();
    let mut cli = CliArgs::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-1" | "--single" => {
                cli.single = true;
            }
            "-d" | "--duration" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing duration argument".to_string());
                }
                let ms = args[i]
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid duration: {}", args[i]))?;
                cli.duration = Some(ms);
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn main() -> anyhow::Result<()> {
    let cli = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    // Initialize logging to file
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from);

    let log_path = home
        .map(|h| h.join(".layerterm").join("layerterm.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("layerterm.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    info!("layerterm starting...");
    run_demo(cli)?;
    println!("layerterm demo finished.");
    Ok(())
}

/// Run the interactive demo.
fn run_demo(cli: CliArgs) -> anyhow::Result<()> {
    let config = Config::load();
    let (cols, rows) = TermSink::size().context("failed to query terminal size")?;
    anyhow::ensure!(
        cols >= 40 && rows >= 12,
        "terminal too small for the demo (need at least 40x12, got {cols}x{rows})"
    );

    let mut sink = TermSink::new();
    sink.init()?;
    let mut canvas = Canvas::new(cols, rows, sink);
    canvas.style = config.colors.style();
    canvas.resize_layers(config.layers.max(4));

    let style = if cli.single || !config.animation.double_lines {
        LineStyle::Single
    } else {
        LineStyle::Double
    };
    let anim = BoxAnimation {
        duration: Duration::from_millis(cli.duration.unwrap_or(config.animation.duration_ms)),
        style,
    };

    // Backdrop: a frame with dividers the animated boxes will link into.
    canvas.set_active_layer(0);
    canvas.draw_box(Rect::new(0, 0, cols, rows), style);
    canvas.draw_horizontal_line(rows / 2, 0, cols, style);
    canvas.draw_vertical_line(cols / 4, 0, rows, style);
    canvas.update()?;

    let mut input = TermInput::new();
    let mut pacer = SleepPacer;

    // The menu box, centered, with blank rows the menu will occupy.
    let body = vec![
        "layerterm demo".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "arrows move, enter picks".to_string(),
    ];
    let box_w = body
        .iter()
        .map(|line| line.chars().count() + 2)
        .max()
        .unwrap_or(2) as u16;
    let box_h = body.len() as u16 + 2;
    canvas.set_active_layer(1);
    let area = canvas.open_box_fit(
        (cols - box_w) / 2,
        (rows - box_h) / 2,
        &body,
        &anim,
        &mut pacer,
    )?;

    // Menu rows sit on the blank body lines, on their own layer.
    canvas.set_active_layer(2);
    canvas.set_cursor(area.x + 2, area.y + 3);
    let mut options = vec![
        "Show a linked box".to_string(),
        "Unavailable action".to_string(),
        "Quit".to_string(),
    ];
    let menu = MenuConfig {
        disabled: Some(vec![false, true, false]),
        ..Default::default()
    };

    loop {
        canvas.set_active_layer(2);
        let choice = run_menu(&mut canvas, &mut input, &mut options, &menu)?;
        info!("menu choice: {:?}", choice);
        match choice {
            Some(0) => {
                // A box crossing both dividers, opened on its own layer so
                // closing it cannot disturb the menu box.
                let nested = Rect::new(canvas.width() / 4 - 6, 1, 14, canvas.height() / 2);
                canvas.set_active_layer(3);
                canvas.open_box(nested, None, &anim, &mut pacer)?;
                input.next_key(KeySet::CONFIRM | KeySet::CANCEL, false)?;
                canvas.close_box(nested, &anim, &mut pacer)?;
            }
            Some(_) | None => break,
        }
    }

    // Tear down in reverse: menu text first, then the box.
    canvas.set_active_layer(2);
    canvas.reset_active_layer();
    canvas.set_active_layer(1);
    canvas.close_box(area, &anim, &mut pacer)?;

    info!("demo finished");
    Ok(())
}
