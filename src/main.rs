//! pokedex-manager binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//! The registry is torn down explicitly before the process ends.
//!
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use pokedex_manager::app::{self, AppState, config::ConfigPaths};
use pokedex_manager::error::{Context, Result};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

/// Manage trainers' Pokedexes from the terminal.
#[derive(Parser, Debug)]
#[command(name = "pokedex-manager", version, about, long_about = None)]
struct Args {
    /// Directory holding theme.conf and keybinds.conf
    #[arg(long, env = "POKEDEX_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (defaults to pokedex-manager.log in the config dir)
    #[arg(long, env = "POKEDEX_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset, e.g. "info" or "pokedex_manager=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Route `tracing` output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path, level: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| format!("init logging: {e}"))?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    let paths = ConfigPaths::resolve(args.config_dir);
    paths.ensure_dir()?;

    let log_path = args
        .log_file
        .unwrap_or_else(|| paths.file("pokedex-manager.log"));
    if let Err(e) = init_logging(&log_path, &args.log_level) {
        eprintln!("logging disabled: {e}");
    }
    tracing::info!(config_dir = %paths.dir().display(), "starting");

    let mut app = AppState::from_config(&paths);
    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    let (owners, records) = app.registry.teardown();
    tracing::info!(owners, records, "exiting");

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
