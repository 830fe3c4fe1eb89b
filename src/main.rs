mod api;
mod app;
mod config;
mod debounce;
mod error;
mod facets;
mod query;
mod storage;
mod ui;

use app::{App, InputMode, Route};
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::time::Duration;
use storage::SelectionStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// TUI browser for a remote game catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog API key (overrides config and GAME_CATALOG_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Catalog API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog (default)
    Run {
        /// Start at a route, e.g. "/game?id=3498" to reopen a stored game
        #[arg(long)]
        route: Option<String>,
    },
    /// Print the last selected game as JSON
    Selected,
    /// Print the effective configuration
    Config,
}

const TICK: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_overrides(
        std::env::var(config::API_KEY_ENV).ok(),
        cli.api_key,
        cli.base_url,
    );

    match cli.command.unwrap_or(Commands::Run { route: None }) {
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
        Commands::Selected => {
            let store = SelectionStore::new(config.resolved_data_dir()?);
            match store.load()? {
                Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
                None => {
                    eprintln!("No game selected yet ({})", store.path().display());
                    std::process::exit(1);
                }
            }
        }
        Commands::Run { route } => {
            let start_route = match route {
                Some(href) => Route::parse(&href).ok_or_else(|| format!("invalid route: {href}"))?,
                None => Route::Catalog,
            };

            let _log_guard = init_logging(&config)?;
            info!(version = env!("CARGO_PKG_VERSION"), base_url = %config.base_url, "starting");
            if config.api_key.is_none() {
                eprintln!("Warning: no API key configured; set {} or --api-key", config::API_KEY_ENV);
            }

            let client = api::CatalogClient::new(&config)?;
            let store = SelectionStore::new(config.resolved_data_dir()?);

            let mut app = App::new(client, store);
            app.init();
            app.navigate(start_route);

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "terminated with error");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            info!("exiting");
        }
    }

    Ok(())
}

fn init_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    let log_dir = config.resolved_log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "game-catalog.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(guard)
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.check_pending();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events; the short timeout keeps the spinner and fetch results flowing
        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }
    match app.route {
        Route::Game { .. } => handle_detail_key(app, key),
        Route::Catalog if app.filter_open => handle_filters_key(app, key),
        Route::Catalog => handle_catalog_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

fn handle_catalog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('f') => {
            app.toggle_filter_panel();
        }
        KeyCode::Char('r') => {
            app.retry();
        }
        KeyCode::Char(c @ '1'..='5') => {
            app.press_page_button(c as usize - '1' as usize);
        }
        KeyCode::Left | KeyCode::Char('h') => app.grid_move(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.grid_move(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.grid_move(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.grid_move(0, 1),
        KeyCode::Enter => {
            app.open_selected();
        }
        _ => {}
    }
}

fn handle_filters_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') => {
            app.toggle_filter_panel();
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Down | KeyCode::Char('j') => app.filter_next(),
        KeyCode::Up | KeyCode::Char('k') => app.filter_prev(),
        KeyCode::Char(' ') => app.toggle_filter_under_cursor(),
        KeyCode::Enter => app.submit_filters(),
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        _ => {}
    }
}
