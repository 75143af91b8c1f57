use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod core;
mod daemon;
mod providers;
#[cfg(test)]
mod test_server;

use crate::core::credentials::Credentials;
use crate::core::settings::{ConfigOrigin, Settings};

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(author, version, about = "Forwards homework review status changes to Telegram")]
struct Cli {
    /// Path to config file (default: <config dir>/homework-bot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the status API and send notifications until interrupted
    Run {
        /// Seconds to sleep between polling cycles
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run a single polling cycle and print the result
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Query window start (seconds since epoch)
        #[arg(long)]
        from_date: Option<i64>,

        /// Also send the resulting message to Telegram
        #[arg(long)]
        send: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(settings: &Settings) {
    let default_level = if settings.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn load_settings(path: Option<&std::path::Path>) -> anyhow::Result<(Settings, ConfigOrigin)> {
    let (settings, origin) = Settings::load(path)?;
    settings.validate()?;
    Ok((settings, origin))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { interval } => {
            let (mut settings, origin) = load_settings(cli.config.as_deref())?;
            if let Some(interval) = interval {
                settings.polling.interval_secs = interval;
                settings.validate()?;
            }
            init_logging(&settings);
            origin.log();

            let credentials = Credentials::from_env().require()?;
            daemon::run(&settings, credentials).await
        }
        Commands::Check {
            json,
            from_date,
            send,
        } => {
            let (settings, origin) = load_settings(cli.config.as_deref())?;
            init_logging(&settings);
            origin.log();
            cli::check::run(&settings, json, from_date, send).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
