//! Folio Chat Entry Point
//!
//! Launches the portfolio assistant in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Full-screen chat (needs a TTY)
//! folio-chat
//!
//! # One question, reply streamed to stdout
//! folio-chat ask "What did Spencer build at AWS?"
//!
//! # Custom config file and model
//! folio-chat --config ./chat.toml --model gemini-2.5-pro
//!
//! # Verbose logging
//! RUST_LOG=debug folio-chat ask "Hi"
//! ```
//!
//! Set `GEMINI_API_KEY` (or `API_KEY`) to talk to the remote model; without
//! it the assistant runs in demo mode.

use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use folio_chat_core::{
    load_config_from_path, ChatConfig, ChatWidget, ConfigOverrides, StreamClient, WidgetSettings,
};
use folio_tui::{run_ask, App};

/// Folio Chat - ask the portfolio assistant from your terminal
#[derive(Parser, Debug)]
#[command(name = "folio-chat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "FOLIO_CHAT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gemini model name
    #[arg(short = 'm', long, value_name = "MODEL")]
    model: Option<String>,

    /// Gemini REST endpoint base URL
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "FOLIO_CHAT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one question and print the streamed reply
    Ask {
        /// The question (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

/// Where log output goes
enum LogTarget {
    /// The TUI owns the terminal, so logs go to a file
    File,
    Stderr,
}

/// Get the log file path
///
/// `$XDG_STATE_HOME/folio-chat/folio-chat.log`, falling back to the cache dir
fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("folio-chat").join("folio-chat.log"))
}

/// Initialize logging with the specified level
fn init_logging(level: &str, target: &LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "folio_chat={level},folio_tui={level},folio_chat_core={level}"
        ))
    });

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogTarget::File => {
            let Some(path) = default_log_path() else {
                return Ok(());
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {path:?}"))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }

    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_configuration(args: &Args) -> Result<ChatConfig> {
    let mut config =
        load_config_from_path(args.config.clone()).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref model) = args.model {
        overrides = overrides.with_model(model);
    }
    if let Some(ref api_base) = args.api_base {
        overrides = overrides.with_api_base(api_base);
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        source = %config.source(),
        model = %config.model,
        demo_mode = !config.has_credential(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Check that stdin and stdout are a terminal
fn ensure_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }

    anyhow::bail!(
        "folio-chat requires a terminal (TTY).\n\
         Run it interactively (use `ssh -t` over SSH), or use `folio-chat ask <question>` \
         for non-interactive use."
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let target = match args.command {
        Some(Command::Ask { .. }) => LogTarget::Stderr,
        None => LogTarget::File,
    };
    init_logging(&args.log_level, &target)?;

    let config = load_configuration(&args)?;
    let client = StreamClient::from_config(&config);
    let widget = ChatWidget::new(client, WidgetSettings::from_config(&config));

    match args.command {
        Some(Command::Ask { question }) => ask(widget, &question.join(" ")).await,
        None => run_tui(widget).await,
    }
}

async fn ask(mut widget: ChatWidget<StreamClient>, question: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    run_ask(&mut widget, question, &mut stdout).await
}

async fn run_tui(widget: ChatWidget<StreamClient>) -> Result<()> {
    // Check if we have a TTY before attempting initialization
    ensure_terminal()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = crossterm::terminal::size()?;
    let mut app = App::new(widget, size);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
