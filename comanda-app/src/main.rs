//! Terminal entrypoint
//!
//! Wires configuration, logging, the backend client and the UI loop
//! together. The loop never blocks on the network: backend calls run in
//! spawned tasks and come back as events over the channel.

mod actions;
mod config;
mod dialog;
mod event;
mod export;
mod reports;
mod screens;
mod state;
mod theme;
mod ui;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use comanda_client::Backend;
use crossterm::event::{self as term_event, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tui_logger::TuiWidgetEvent;
use uuid::Uuid;

use crate::actions::Ctx;
use crate::config::AppConfig;
use crate::dialog::Dialog;
use crate::event::{AppEvent, Effect};
use crate::screens::Screen;
use crate::state::App;

/// Events queued between frames; drained every loop pass.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Parser)]
#[command(name = "comanda", version, about = "Gestión de sala, cocina y caja")]
struct Cli {
    /// Backend base URL, overrides COMANDA_BACKEND_URL
    #[arg(long)]
    backend_url: Option<String>,
    /// Anonymous API key, overrides COMANDA_ANON_KEY
    #[arg(long)]
    anon_key: Option<String>,
    /// Directory for daily log files, overrides COMANDA_LOG_DIR
    #[arg(long)]
    log_dir: Option<std::path::PathBuf>,
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::with_overrides(cli.backend_url, cli.anon_key, cli.log_dir);
    config.validate().map_err(anyhow::Error::msg)?;

    init_logging(&config);
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let msg = info.to_string();
        eprintln!("!!! APPLICATION PANIC !!!\nMessage: {msg}\nBacktrace:\n{backtrace}");
        tracing::error!(target: "panic", message = %msg, "panic occurred");
    }));

    // Short random id so overlapping terminals can be told apart in the logs
    let uuid = Uuid::new_v4().to_string();
    let terminal_id = format!("comanda-{}", uuid.split('-').next().unwrap_or("0"));
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        terminal = %terminal_id,
        backend = %config.backend_url,
        "starting"
    );

    let backend = Arc::new(Backend::new(config.client_config())?);
    let (tx, mut rx) = mpsc::channel::<AppEvent>(EVENT_CHANNEL_CAPACITY);
    let ctx = Ctx {
        backend,
        tx,
        cutoff_hour: config.cutoff_hour,
        export_dir: config.export_dir.clone(),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new();
    let result = run_app(&mut terminal, &mut app, &ctx, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("terminal loop failed: {err}");
    }
    result
}

/// Tracing goes to the in-app log pane, and to daily files when a log
/// directory is configured.
fn init_logging(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(env_filter);

    if let Some(dir) = &config.log_dir {
        let appender = tracing_appender::rolling::daily(dir, "comanda");
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry.init();
    }

    // Adapter for dependencies that log through the log crate
    tui_logger::init_logger(log::LevelFilter::Info).ok();
    tui_logger::set_default_level(log::LevelFilter::Info);
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    ctx: &Ctx,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        app.prune_toasts(Instant::now());
        terminal.draw(|f| ui::draw(f, app, ctx))?;

        // Fold in everything the background tasks produced since last frame
        while let Ok(event) = rx.try_recv() {
            if let Some(Effect::Refresh(screen)) = app.apply(event) {
                actions::refresh_screen(ctx, app, screen);
            }
        }

        if app.session.is_some() && app.dialog.is_none() && app.poll_due(Instant::now()) {
            actions::refresh_screen(ctx, app, app.screen);
        }

        if term_event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = term_event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    if let Flow::Quit = handle_key(app, ctx, key) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) -> Flow {
    if app.session.is_none() {
        if key.code == KeyCode::Esc {
            return Flow::Quit;
        }
        screens::login::handle_key(app, ctx, key);
        return Flow::Continue;
    }
    if app.dialog.is_some() {
        dialog::handle_key(app, ctx, key);
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Esc => app.dialog = Some(Dialog::ConfirmSignOut),
        KeyCode::Tab => actions::switch_screen(app, ctx, app.screen.next()),
        KeyCode::BackTab => actions::switch_screen(app, ctx, app.screen.prev()),
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            actions::switch_screen(app, ctx, Screen::ALL[index]);
        }
        KeyCode::Char('r') => actions::refresh_screen(ctx, app, app.screen),
        KeyCode::Char('l') => app.show_logs = !app.show_logs,
        KeyCode::PageUp if app.show_logs => {
            app.logger_state.transition(TuiWidgetEvent::PrevPageKey);
        }
        KeyCode::PageDown if app.show_logs => {
            app.logger_state.transition(TuiWidgetEvent::NextPageKey);
        }
        _ => dispatch_screen_key(app, ctx, key),
    }
    Flow::Continue
}

fn dispatch_screen_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match app.screen {
        Screen::Tables => screens::tables::handle_key(app, ctx, key),
        Screen::Orders => screens::orders::handle_key(app, ctx, key),
        Screen::Kitchen => screens::kitchen::handle_key(app, ctx, key),
        Screen::Inventory => screens::inventory::handle_key(app, ctx, key),
        Screen::Purchases => screens::purchases::handle_key(app, ctx, key),
        Screen::Invoices => screens::invoices::handle_key(app, ctx, key),
        Screen::Payments => screens::payments::handle_key(app, ctx, key),
        Screen::Reports => screens::reports::handle_key(app, ctx, key),
    }
}
