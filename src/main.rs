//! newsdeck: three news APIs side by side in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ fetch_page ┌──────────┐ snapshot ┌──────────┐  draw()  ┌──────────┐
//! │ source/   │ ◄───────── │ store.rs │ ───────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (adapter) │            │ (state)  │          │  (view)  │          │ (render) │
//! └───────────┘            └──────────┘          └──────────┘          └──────────┘
//!                               ▲  Command (spawned task)  │
//!                               └──────────────────────────┘
//!                                                    ▲ handle_key_event()
//!                                               ┌──────────┐
//!                                               │ input.rs │
//!                                               └──────────┘
//! ```
//!
//! * **`source/`**: the `NewsProvider` trait, the generic HTTP adapter and
//!   the three provider profiles / response schemas.
//! * **`store`**: filters, per-source article lists and pagination; full
//!   refresh and per-source load-more.
//! * **`app`**: view state (focus, selection, filter editing).
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations and store commands.
//! * **`config`**: API keys and options from the environment.
//! * **`main`**: wires everything together: config, logging, terminal setup
//!   and the event loop.

mod app;
mod config;
mod input;
mod source;
mod store;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use app::{App, Command};
use config::Config;
use source::{HttpProvider, NewsProvider, Source};
use store::{LoadMoreOutcome, NewsStore, PaginationState, RefreshOutcome};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Send tracing output to the configured log file.  The terminal belongs to
/// the dashboard, so without a file nothing is logged.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
    Ok(())
}

fn build_store(config: &Config) -> Result<NewsStore> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("newsdeck/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let providers = config.api_keys.clone().map(|source, key| {
        Arc::new(HttpProvider::new(source, client.clone(), key)) as Arc<dyn NewsProvider>
    });
    Ok(NewsStore::new(providers, config.initial_filter.clone()))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Results reported back from spawned store tasks.
enum Outcome {
    Refreshed(RefreshOutcome),
    LoadedMore(Source, LoadMoreOutcome),
}

/// Run `command` against the store.  Fetches happen on spawned tasks so the
/// UI keeps drawing; their outcomes come back over `tx`.
fn dispatch(store: &Arc<NewsStore>, tx: &mpsc::UnboundedSender<Outcome>, command: Command) {
    let store = Arc::clone(store);
    let tx = tx.clone();
    match command {
        Command::ApplyFilter { patch, refresh } => {
            store.update_filter(patch);
            if refresh {
                dispatch(&store, &tx, Command::Refresh);
            }
        }
        Command::Refresh => {
            tokio::spawn(async move {
                let _ = tx.send(Outcome::Refreshed(store.refresh().await));
            });
        }
        Command::ResetFilters => {
            tokio::spawn(async move {
                let _ = tx.send(Outcome::Refreshed(store.reset_filters().await));
            });
        }
        Command::LoadMore(source) => {
            tokio::spawn(async move {
                let _ = tx.send(Outcome::LoadedMore(source, store.load_more(source).await));
            });
        }
    }
}

fn status_for(outcome: &Outcome, store: &NewsStore) -> Option<String> {
    match outcome {
        Outcome::Refreshed(RefreshOutcome::Applied) => {
            let snap = store.snapshot();
            let total: usize = snap.feeds.iter().map(|(_, f)| f.articles.len()).sum();
            Some(format!("Fetched {total} articles"))
        }
        Outcome::Refreshed(RefreshOutcome::Failed) => Some("Refresh failed".into()),
        Outcome::LoadedMore(source, LoadMoreOutcome::Appended { count }) => {
            let end = match store.pagination_state(*source) {
                PaginationState::Exhausted => ", end of results",
                _ => "",
            };
            Some(format!("{source}: +{count} articles{end}"))
        }
        Outcome::LoadedMore(source, LoadMoreOutcome::Failed) => {
            Some(format!("{source}: load more failed"))
        }
        Outcome::Refreshed(RefreshOutcome::Superseded)
        | Outcome::LoadedMore(_, LoadMoreOutcome::Skipped(_) | LoadMoreOutcome::Superseded) => {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "newsdeck starting up");

    let store = Arc::new(build_store(&config)?);
    info!(filter = ?store.filter(), "initial filter");
    let (tx, mut rx) = mpsc::unbounded_channel();

    install_panic_hook();

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();

    dispatch(&store, &tx, Command::Refresh);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain finished store tasks and take a fresh snapshot.
    //   2. Render the UI.
    //   3. Poll for keyboard input (up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process task outcomes
        while let Ok(outcome) = rx.try_recv() {
            if let Some(status) = status_for(&outcome, &store) {
                app.status = status;
            }
        }
        app.sync(store.snapshot());

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 3. Handle input
        if tokio::task::block_in_place(|| event::poll(tick_rate))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = input::handle_key_event(&mut app, key) {
                    match &command {
                        Command::Refresh | Command::ResetFilters => app.status = "Refreshing…".into(),
                        Command::ApplyFilter { refresh: true, .. } => app.status = "Searching…".into(),
                        _ => {}
                    }
                    dispatch(&store, &tx, command);
                }
            }
        }

        if app.quit {
            break;
        }
    }

    if app.snapshot.loading {
        warn!("quitting with a refresh still in flight");
    }
    info!("newsdeck shutting down");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
