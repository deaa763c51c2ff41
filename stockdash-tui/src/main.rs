//! StockDash TUI: ticker and date inputs, a metrics grid and five indicator
//! charts.
//!
//! Fetching and indicator work runs on a render thread; this thread only
//! draws and handles keys.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stockdash_core::{Dashboard, DashboardConfig};

use crate::app::{AppState, InputState};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Restore the terminal before the panic message is printed.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockdash");
    let config = DashboardConfig::load_or_default(&config_dir.join("config.toml"))?;
    let state_path = config_dir.join("state.json");

    init_logging(&config)?;

    let dashboard = Dashboard::from_config(&config.provider)?;
    info!(provider = dashboard.provider_name(), "starting dashboard");

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(dashboard, cmd_rx, resp_tx)?;

    let input = InputState::new(&config.request.ticker, config.request.start);
    let mut app = AppState::new(cmd_tx.clone(), resp_rx, input, config.request.inverted_range);
    persistence::apply(&mut app, persistence::load(&state_path));
    app.submit();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!(path = %state_path.display(), error = %e, "could not save inputs");
    }

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// The terminal owns stdout, so logs go to a file in the cache directory.
fn init_logging(config: &DashboardConfig) -> Result<()> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockdash");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_path: &Path = &log_dir.join("stockdash.log");
    let file = File::create(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = app.worker_rx.try_recv() {
            match resp {
                WorkerResponse::Page(page) => app.apply_page(*page),
            }
        }

        // 50ms poll keeps the loop near 20 FPS.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
