//! cinetui - terminal front end for movie and TV metadata
//!
//! Search the catalog, read movie details, pick seasons and episodes and open
//! the matching player page.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! cinetui
//!
//! # CLI mode (for automation)
//! cinetui search "blade runner"
//! cinetui embed tv 1396 -s 1 -e 3 --open
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cinetui::api::{ImageFetcher, TmdbClient};
use cinetui::app::{App, Services};
use cinetui::cli::{Cli, Command, ExitCode, Output};
use cinetui::commands;
use cinetui::config::Config;
use cinetui::embed::BrowserLauncher;
use cinetui::event::AppEvent;
use cinetui::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let output = Output::new(&cli);
        let config = match config {
            Ok(c) => c,
            Err(e) => {
                let code = output.error(format!("{:#}", e), ExitCode::InvalidArgs);
                std::process::exit(code.into());
            }
        };
        let exit_code = run_cli(cli, &config, &output).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui(config?).await
    }
}

/// Daily rolling log file; the terminal belongs to the TUI
fn init_logging() -> Option<WorkerGuard> {
    let log_dir = dirs::data_local_dir()?.join("cinetui").join("logs");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "cinetui.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinetui=info")),
        )
        .with_ansi(false)
        .with_target(false)
        .init();
    info!("cinetui v{} starting", env!("CARGO_PKG_VERSION"));
    Some(guard)
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config, output: &Output) -> ExitCode {
    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, config, output).await,
        Some(Command::Movie(cmd)) => commands::movie_cmd(cmd, config, output).await,
        Some(Command::Tv(cmd)) => commands::tv_cmd(cmd, config, output).await,
        Some(Command::Embed(cmd)) => commands::embed_cmd(cmd, config, output).await,
        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Wire the real data sources into the views
fn services(config: &Config) -> Result<Services> {
    let tmdb = Arc::new(
        TmdbClient::with_base_url(config.require_api_key()?, &config.tmdb_base_url)
            .with_language(&config.language),
    );
    Ok(Services {
        search: tmdb.clone(),
        metadata: tmdb,
        images: Arc::new(ImageFetcher::new()),
        providers: config.providers(),
        image_bases: config.image_bases(),
        debounce: config.debounce(),
        launcher: BrowserLauncher::default(),
    })
}

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    // Fail before touching the terminal so the message stays readable
    let services = services(&config)?;
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(services, tx);

    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!("event loop failed: {:#}", e);
    }
    info!("cinetui exiting");
    result
}

/// Main event loop - handles input, applies async completions, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(50);

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                _ => {}
            }
        }

        // Give spawned tasks a turn, then apply whatever they reported
        tokio::task::yield_now().await;
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
    }

    Ok(())
}
