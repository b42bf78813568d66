// crates/order-ahead-dashboard/src/main.rs

mod app;
mod ui;
mod components;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::{io, time::Duration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use order_ahead_service::{
    spawn_dashboard, DashboardHandle, HttpApi, LiveFeed, ServiceConfig, SystemClock,
};

use crate::app::App;

#[derive(Parser)]
#[clap(name = "order-ahead-dashboard")]
#[clap(about = "Live order-ahead queue for a single location")]
struct Cli {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Order API base URL
    #[clap(long)]
    api_url: Option<String>,

    /// Websocket URL of the live order feed
    #[clap(long)]
    feed_url: Option<String>,

    /// Company identifier
    #[clap(long)]
    company: Option<String>,

    /// Location identifier
    #[clap(short, long)]
    location: Option<String>,

    /// Write logs to this file (the terminal is taken by the UI)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    if let Some(v) = &cli.api_url {
        config.api_base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = &cli.feed_url {
        config.feed_url = Some(v.clone());
    }
    if let Some(v) = &cli.company {
        config.company_oid = v.clone();
    }
    if let Some(v) = &cli.location {
        config.location_oid = v.clone();
    }

    // Start the dashboard task before touching the terminal
    let api = Arc::new(HttpApi::new(config.clone())?);
    let handle = spawn_dashboard(api, Arc::new(SystemClock), config.tick_interval());
    let feed = config
        .feed_url
        .clone()
        .map(|url| tokio::spawn(LiveFeed::new(url, handle.commands()).run()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(&config.location_oid, handle.commands());
    let res = run_app(&mut terminal, app, &handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Leaving the screen releases the ticker and stops the feed
    if let Some(feed) = feed {
        feed.abort();
    }
    handle.shutdown().await;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    info!("Logging to {}", path.display());
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    handle: &DashboardHandle,
) -> Result<()> {
    let mut snapshots = handle.subscribe();

    loop {
        if snapshots.has_changed().unwrap_or(false) {
            let snapshot = snapshots.borrow_and_update().clone();
            app.apply_snapshot(snapshot);
        }

        // Draw UI
        terminal.draw(|f| ui::draw(f, &app))?;

        // Handle events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if app.show_help {
                    if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                        app.toggle_help();
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        app.should_quit = true;
                    }

                    // Navigation
                    KeyCode::Up | KeyCode::Char('k') => {
                        app.move_selection_up();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        app.move_selection_down();
                    }

                    // Order actions
                    KeyCode::Char('p') | KeyCode::Char('P') => {
                        app.process_selected();
                    }
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        app.clear_selected();
                    }
                    KeyCode::Enter => {
                        app.toggle_selected_details();
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        app.request_refresh();
                    }

                    KeyCode::F(1) | KeyCode::Char('?') => {
                        app.toggle_help();
                    }

                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
