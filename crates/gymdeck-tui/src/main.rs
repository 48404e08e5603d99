//! gymdeck - A terminal user interface for gym management data.
//!
//! This application provides a fast, keyboard-driven interface for viewing
//! membership, revenue, check-in, shop, and community data, with a local
//! cache so everything stays usable offline.

mod app;
mod ui;

use std::io;
use std::io::Write as _;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gymdeck_core::auth::{CredentialStore, Session};
use gymdeck_core::config::Config;

use app::{build_api, App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name, written under the cache directory
const LOG_FILE: &str = "gymdeck.log";

/// Initialize the tracing subscriber.
///
/// Logs go to a file under the cache directory because stderr belongs to
/// the terminal UI. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
/// The returned guard must stay alive for the duration of the program so
/// buffered log lines get flushed.
fn init_tracing(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config.cache_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return login_interactive().await;
    }
    if args.len() > 1 && args[1] == "--probe-api" {
        return probe_api().await;
    }

    let config = Config::load().unwrap_or_default();
    let _log_guard = init_tracing(&config)?;
    info!("gymdeck starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new().await?;

    // Load cached data first (for display behind login)
    let _ = app.load_from_cache();

    // Check if we need to login
    if !app.is_authenticated() {
        app.start_login();
    } else if !app.offline_mode && app.is_cache_stale() {
        app.refresh_all_background().await;
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("gymdeck shutting down");
    Ok(())
}

/// Log in from the command line and store the session for later runs.
/// Useful for scripted setups and for terminals where the login overlay
/// is awkward.
async fn login_interactive() -> Result<()> {
    use std::path::PathBuf;

    let config = Config::load().unwrap_or_default();

    eprint!("Username: ");
    io::stderr().flush()?;
    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    let username = username.trim().to_string();

    if username.is_empty() {
        anyhow::bail!("Username is required");
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }

    let api = build_api(&config)?;
    let session_data = api.authenticate(&username, &password).await?;

    if let Err(e) = CredentialStore::store(&username, &password) {
        eprintln!("Warning: could not store credentials in the OS keyring: {}", e);
    }

    let mut config = config;
    config.last_username = Some(username.clone());
    config.gym_id = session_data.gym_id;
    config.save()?;

    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let mut session = Session::new(cache_dir);
    session.update(session_data);
    session.save()?;

    eprintln!("Logged in as {}. Session saved.", username);
    Ok(())
}

/// Probe the backend endpoints and report their status codes.
/// Handy when diagnosing connectivity or permission problems.
async fn probe_api() -> Result<()> {
    use std::path::PathBuf;

    let config = Config::load().unwrap_or_default();
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let mut session = Session::new(cache_dir);
    let _ = session.load();

    let token = session.token().map(str::to_string);
    if token.is_none() {
        eprintln!("No saved session; probing without authentication.\n");
    }

    let api = build_api(&config)?;
    let base = api.base_url().to_string();
    let client = reqwest::Client::new();

    let endpoints = [
        ("members", format!("{}/members", base)),
        ("trainers", format!("{}/trainers", base)),
        ("check-ins", format!("{}/checkins", base)),
        ("products", format!("{}/products", base)),
        ("posts", format!("{}/posts", base)),
    ];

    for (name, url) in endpoints {
        eprint!("Probing {} ({}): ", name, url);

        let mut request = client.get(&url);
        if let Some(ref t) = token {
            request = request.bearer_auth(t);
        }

        match request.send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    eprintln!("ok {} ({} bytes)", status, body.len());
                } else {
                    eprintln!("failed {}", status);
                }
            }
            Err(e) => {
                eprintln!("error: {}", e);
            }
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks().await;

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
