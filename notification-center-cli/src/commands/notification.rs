//! Notification commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use notification_center::{LabelKey, NotificationId};
use rust_i18n::t;

use crate::config::{build_client, effective_config, Overrides};
use crate::output::{print_table, CountsRow, NotificationRow, OutputFormat};

#[derive(Subcommand)]
pub enum NotificationAction {
    /// Show total and unread notification counts
    Counts,

    /// List one page of notifications
    #[command(alias = "ls")]
    List {
        /// Number of notifications to skip
        #[arg(short, long, default_value = "0")]
        skip: usize,
        /// Page size, defaults to the configured limit
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Set the read state of a notification
    Read {
        /// Notification ID
        id: String,
        /// Mark as unread instead
        #[arg(long)]
        unread: bool,
    },

    /// Mark all notifications as read
    ReadAll,
}

pub async fn handle(
    action: NotificationAction,
    format: OutputFormat,
    overrides: &Overrides,
) -> Result<()> {
    match action {
        NotificationAction::Counts => show_counts(format, overrides).await,
        NotificationAction::List { skip, limit } => {
            list_notifications(skip, limit, format, overrides).await
        }
        NotificationAction::Read { id, unread } => mark_read(&id, !unread, overrides).await,
        NotificationAction::ReadAll => mark_all_read(overrides).await,
    }
}

async fn show_counts(format: OutputFormat, overrides: &Overrides) -> Result<()> {
    let client = build_client(overrides)?;
    let counts = client.notifications().counts().await?;

    print_table(vec![CountsRow::from(counts)], format);

    Ok(())
}

async fn list_notifications(
    skip: usize,
    limit: Option<usize>,
    format: OutputFormat,
    overrides: &Overrides,
) -> Result<()> {
    let config = effective_config(overrides)?;
    let lang = config.language();
    let labels = config.labels();
    let client = config.build_client()?;

    let mut request = client.notifications().list().skip(skip).lang(&lang);
    if let Some(limit) = limit {
        request = request.limit(limit);
    }
    let page = request.send().await?;

    if matches!(format, OutputFormat::Plain) {
        println!("{}\n", labels.get(LabelKey::Title).bold());
        if page.is_empty() {
            println!("{}", labels.get(LabelKey::NoNotification).dimmed());
            return Ok(());
        }
    }

    let date_format = labels.get(LabelKey::DateFormat);
    let rows: Vec<NotificationRow> = page
        .into_iter()
        .enumerate()
        .map(|(i, raw)| NotificationRow::new(skip + i, &raw.localize(&lang), date_format))
        .collect();
    print_table(rows, format);

    Ok(())
}

async fn mark_read(id: &str, read_state: bool, overrides: &Overrides) -> Result<()> {
    let client = build_client(overrides)?;
    client
        .notifications()
        .mark_read(&NotificationId::new(id), read_state)
        .await?;

    if read_state {
        println!("{} {}", "✓".green(), t!("marked_read", id = id));
    } else {
        println!("{} {}", "✓".green(), t!("marked_unread", id = id));
    }

    Ok(())
}

async fn mark_all_read(overrides: &Overrides) -> Result<()> {
    let client = build_client(overrides)?;
    let modified = client.notifications().mark_all_read().await?;

    match modified {
        Some(n) => println!("{} {}", "✓".green(), t!("marked_all_read_count", count = n)),
        None => println!("{} {}", "✓".green(), t!("marked_all_read")),
    }

    Ok(())
}
