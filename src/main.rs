//! pm-assistant entry point

use std::sync::Arc;

use clap::{Parser, Subcommand};
use pm_assistant::{api, Assistant, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// pm-assistant: project-management assistant over Trello, Google Calendar and email
#[derive(Parser, Debug)]
#[command(name = "pm-assistant")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Run against a remote pm-assistant REST API (e.g. http://localhost:5000/api)
    #[arg(short, long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the REST API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Emit logs as JSON
        #[arg(long)]
        json_logs: bool,
    },
    /// Send a chat message to the assistant
    Chat {
        /// The message, e.g. "What tasks are due this week?"
        message: String,
    },
    /// Show how a message would be classified, without contacting any service
    Classify {
        /// The message to classify
        text: String,
    },
    /// List tasks due soon
    Due {
        /// Size of the due window in days (defaults to the configured horizon)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Show project status
    Status,
    /// Send reminders for stale tasks
    RemindStale,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // For CLI commands (non-serve), use minimal logging
    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Some(Command::Classify { text }) = args.command {
        return cli::run_classify(text, args.json);
    }

    match args.command {
        Some(Command::Serve { port, json_logs }) => run_server(&args.config, port, json_logs).await,
        None => run_server(&args.config, None, false).await,
        Some(command) => {
            let mode = if let Some(url) = &args.remote {
                cli::ExecutionMode::Remote(url.clone())
            } else {
                cli::ExecutionMode::Local(Box::new(load_config(&args.config)?))
            };

            match command {
                Command::Chat { message } => cli::run_chat(mode, message, args.json).await,
                Command::Due { days } => cli::run_due(mode, days, args.json).await,
                Command::Status => cli::run_status(mode, args.json).await,
                Command::RemindStale => cli::run_remind_stale(mode, args.json).await,
                Command::Serve { .. } | Command::Classify { .. } => Ok(()),
            }
        }
    }
}

/// Load configuration from file (or defaults), then fill credentials from the environment.
fn load_config(config_path: &Option<String>) -> anyhow::Result<Config> {
    let mut config = if let Some(path) = config_path {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Run the REST API server.
async fn run_server(
    config_path: &Option<String>,
    port: Option<u16>,
    json_logs: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting pm-assistant v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(config_path)?;
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::info!(
        board_configured = config.board.board_id.is_some(),
        calendar = %config.calendar.calendar_id,
        timezone = %config.assistant.timezone,
        team = config.team.len(),
        "Configuration loaded"
    );

    let assistant = Arc::new(Assistant::from_config(&config)?);
    api::serve(assistant, &config.server).await
}
