//! quicklog - demo and driver for the quicklog renderers

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use quicklog::Level;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "quicklog")]
#[command(author, version, about = "quicklog - render logs for terminals and log pipelines")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every built-in message
    Demo,
    /// Log a single message
    Log {
        /// Message text
        text: Option<String>,
        /// Log level
        #[arg(long, value_enum, default_value_t = LevelArg::Info)]
        level: LevelArg,
        /// Emit JSON lines instead of terminal text
        #[arg(long)]
        json: bool,
        /// Put the message under a boxed title
        #[arg(long)]
        title: Option<String>,
        /// Description shown inside the title box
        #[arg(long, requires = "title")]
        description: Option<String>,
        /// Report an error, with TEXT as its explanation
        #[arg(long)]
        error: Option<String>,
    },
    /// Run an animated loader through a sequence of steps
    Watch {
        /// Initial label
        #[arg(long, default_value = "Working")]
        label: String,
        /// Steps to go through, in order
        #[arg(long = "step")]
        steps: Vec<String>,
        /// Delay between steps, in milliseconds
        #[arg(long, default_value_t = 400)]
        interval_ms: u64,
        /// End with this error instead of succeeding
        #[arg(long)]
        fail: Option<String>,
        /// Label shown on success
        #[arg(long, default_value = "Done")]
        done: String,
        /// Emit JSON lines instead of terminal text
        #[arg(long)]
        json: bool,
    },
    /// Log while an animation runs (always exits with an error)
    #[command(hide = true)]
    Conflict {
        /// Start a second animation instead of a plain log
        #[arg(long)]
        animated: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LevelArg {
    Info,
    Warn,
    Error,
    Fatal,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Info => Level::Info,
            LevelArg::Warn => Level::Warning,
            LevelArg::Error => Level::Error,
            LevelArg::Fatal => Level::Fatal,
        }
    }
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so they never mix with rendered frames
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => cmd::demo::demo(),
        Commands::Log {
            text,
            level,
            json,
            title,
            description,
            error,
        } => cmd::log::log(&cmd::log::LogArgs {
            level: level.into(),
            json,
            text: text.unwrap_or_default(),
            title,
            description,
            error,
        }),
        Commands::Watch {
            label,
            steps,
            interval_ms,
            fail,
            done,
            json,
        } => cmd::watch::watch(&cmd::watch::WatchArgs {
            label,
            steps,
            interval: std::time::Duration::from_millis(interval_ms),
            fail,
            done,
            json,
        }),
        Commands::Conflict { animated } => cmd::conflict::conflict(animated),
    }
}
