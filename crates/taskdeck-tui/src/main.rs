//! taskdeck terminal app
//!
//! Wires the pieces together:
//! - Config and persisted session from the platform config dir
//! - Spawned remote operations reporting back over an event channel
//! - Ratatui render loop with per-screen key routing

mod app;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use app::{App, AppEvent, AuthField, InputMode, Remote, Screen};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use taskdeck_client::{Config, SessionStore};

#[derive(Parser)]
#[command(
    name = "taskdeck",
    version,
    about = "Terminal client for a remote to-do service"
)]
struct Cli {
    /// Server URL (overrides the config file)
    #[arg(short, long, env = "TASKDECK_SERVER")]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_dir = Config::config_dir()?;
    let _log_guard = init_logging(&config_dir)?;

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    config.validate()?;

    info!("Starting taskdeck against {}", config.server_url);

    let session = SessionStore::open(&config_dir)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut app = App::new(session);
    let mut remote = Remote::new(&config.server_url, event_tx)?;

    // A restored session skips login and goes straight to the task list.
    if let Some(token) = app.session.token() {
        remote.set_bearer_token(Some(token));
        remote.load_tasks();
    }

    let res = run_app(&mut terminal, &mut app, &mut remote, &mut event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Logs go to a rolling file under the config dir; stdout has to stay
/// clean while the alternate screen is active. `RUST_LOG` controls the
/// filter.
fn init_logging(config_dir: &Path) -> Result<WorkerGuard> {
    let log_dir = config_dir.join("logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(log_dir, "taskdeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(guard)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    remote: &mut Remote,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Terminal input
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                // A visible error popup swallows the first keypress.
                if app.error_message.take().is_some() {
                    continue;
                }

                match app.screen {
                    Screen::Login | Screen::Signup => match key.code {
                        KeyCode::Tab => {
                            app.auth_field_focus = match app.auth_field_focus {
                                AuthField::Username => AuthField::Password,
                                AuthField::Password => AuthField::Username,
                            };
                        }
                        KeyCode::Enter => {
                            if !app.auth_in_flight {
                                let username = app.auth_username_input.trim().to_string();
                                let password = app.auth_password_input.clone();

                                if username.is_empty() || password.is_empty() {
                                    app.error_message = Some(
                                        "Username and password cannot be empty".to_string(),
                                    );
                                } else {
                                    app.auth_in_flight = true;
                                    match app.screen {
                                        Screen::Login => remote.login(username, password),
                                        _ => remote.signup(username, password),
                                    }
                                }
                            }
                        }
                        KeyCode::Char('s')
                            if key.modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            if app.screen == Screen::Login {
                                app.screen = Screen::Signup;
                            }
                        }
                        KeyCode::Esc => {
                            if app.screen == Screen::Signup {
                                app.screen = Screen::Login;
                            } else {
                                return Ok(());
                            }
                        }
                        KeyCode::Backspace => match app.auth_field_focus {
                            AuthField::Username => {
                                app.auth_username_input.pop();
                            }
                            AuthField::Password => {
                                app.auth_password_input.pop();
                            }
                        },
                        KeyCode::Char(c) => match app.auth_field_focus {
                            AuthField::Username => app.auth_username_input.push(c),
                            AuthField::Password => app.auth_password_input.push(c),
                        },
                        _ => {}
                    },
                    Screen::Tasks => match app.input_mode {
                        InputMode::Editing => match key.code {
                            KeyCode::Enter => {
                                let text = app.input.trim().to_string();
                                if text.is_empty() {
                                    app.input.clear();
                                    app.input_mode = InputMode::Normal;
                                } else if !app.create_in_flight {
                                    app.create_in_flight = true;
                                    app.input.clear();
                                    app.input_mode = InputMode::Normal;
                                    remote.create_task(text);
                                }
                            }
                            KeyCode::Esc => {
                                app.input.clear();
                                app.input_mode = InputMode::Normal;
                            }
                            KeyCode::Backspace => {
                                app.input.pop();
                            }
                            KeyCode::Char(c) => app.input.push(c),
                            _ => {}
                        },
                        InputMode::Normal => match key.code {
                            KeyCode::Char('q') => return Ok(()),
                            KeyCode::Char('a') => {
                                app.input_mode = InputMode::Editing;
                            }
                            KeyCode::Char('?') => app.show_help = !app.show_help,
                            KeyCode::Esc => app.show_help = false,
                            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
                            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                            KeyCode::Char(' ') => {
                                if let Some(task) = app.begin_selected_op() {
                                    remote.update_status(task.id, task.status);
                                }
                            }
                            KeyCode::Char('p') => {
                                if let Some(task) = app.begin_selected_op() {
                                    remote.update_priority(task.id, task.priority.cycled());
                                }
                            }
                            KeyCode::Char('d') => {
                                if let Some(task) = app.begin_selected_op() {
                                    remote.delete_task(task.id);
                                }
                            }
                            KeyCode::Char('s') => app.cycle_status_filter(),
                            KeyCode::Char('f') => app.cycle_priority_filter(),
                            KeyCode::Char('r') => remote.load_tasks(),
                            KeyCode::Char('L') => {
                                app.logout()?;
                                remote.set_bearer_token(None);
                            }
                            _ => {}
                        },
                    },
                }
            }
        }

        // Results of spawned operations (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            let logged_in = matches!(event, AppEvent::LoggedIn { .. });
            app.apply(event);

            if logged_in {
                // Point the task client at the fresh credential, then load.
                remote.set_bearer_token(app.session.token());
                remote.load_tasks();
            }
        }
    }
}
