//! Notification center CLI.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{center, notification};
use rust_i18n::t;

rust_i18n::i18n!("src/locales", fallback = "en");

/// Notification center for the terminal
#[derive(Parser)]
#[command(name = "notification-center")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language for output and notification content (en, it)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// Notification service endpoint
    #[arg(long, global = true, env = "NOTIFICATION_CENTER_ENDPOINT")]
    endpoint: Option<String>,

    /// Origin relative endpoints and links resolve against
    #[arg(long, global = true, env = "NOTIFICATION_CENTER_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Notification service operations
    #[command(alias = "n")]
    Notifications {
        #[command(subcommand)]
        action: notification::NotificationAction,
    },

    /// Run the notification center in the terminal
    #[command(alias = "c")]
    Center {
        #[command(subcommand)]
        action: center::CenterAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
    /// Set a request header; an empty value removes it
    Header {
        /// Header name
        name: String,
        /// Header value
        #[arg(default_value = "")]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let overrides = config::Overrides {
        endpoint: cli.endpoint,
        base_url: cli.base_url,
        lang: cli.lang,
    };
    let ui_lang = config::effective_config(&overrides)?.language();
    rust_i18n::set_locale(ui_lang.get(..2).unwrap_or("en"));

    let command = cli
        .command
        .ok_or_else(|| anyhow::anyhow!("{}", t!("no_command")))?;

    let result = match command {
        Commands::Notifications { action } => {
            notification::handle(action, cli.format, &overrides).await
        }
        Commands::Center { action } => center::handle(action, cli.format, &overrides).await,
        Commands::Config { action } => handle_config(action.unwrap_or(ConfigAction::Show), &overrides),
    };

    if let Some(hint) = result.as_ref().err().and_then(retry_hint) {
        eprintln!("{}", hint);
    }
    result
}

/// Hint printed for failures that may go away on a second attempt.
fn retry_hint(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .filter_map(|e| e.downcast_ref::<notification_center::Error>())
        .any(|e| e.is_retryable())
        .then(|| t!("retry_hint").to_string())
}

fn handle_config(action: ConfigAction, overrides: &config::Overrides) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let cfg = config::effective_config(overrides)?;
            println!(
                "{}",
                t!("config_file", path = config::config_path()?.display())
            );
            println!("{}", t!("config_language", lang = cfg.language()));
            print!("{}", toml::to_string_pretty(&cfg)?);
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = config::load_config()?;
            config::set_value(&mut cfg, &key, &value)?;
            cfg.validate()?;
            config::save_config(&cfg)?;
            println!("{}", t!("config_updated", key = &key));
            Ok(())
        }
        ConfigAction::Header { name, value } => {
            let mut cfg = config::load_config()?;
            config::set_header(&mut cfg, &name, &value);
            config::save_config(&cfg)?;
            println!("{}", t!("config_updated", key = &name));
            Ok(())
        }
    }
}
