//! Interactive notification center hosted in the terminal.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use notification_center::{
    LabelKey, Link, Navigator, NotificationCenter, NotificationCenterHost,
    NotificationCenterProps, NotificationCenterState, RenderSurface,
};
use rust_i18n::t;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::config::{effective_config, Overrides};
use crate::output::{NotificationRow, OutputFormat, PlainPrint};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Subcommand)]
pub enum CenterAction {
    /// Load notifications page by page, as the widget would
    Browse {
        /// Maximum number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,
        /// Mark everything as read once loaded
        #[arg(long)]
        mark_all: bool,
    },

    /// Click a notification: mark it read and follow its link
    Open {
        /// Position of the notification in the list
        index: usize,
    },
}

pub async fn handle(action: CenterAction, format: OutputFormat, overrides: &Overrides) -> Result<()> {
    match action {
        CenterAction::Browse { pages, mark_all } => browse(pages, mark_all, format, overrides).await,
        CenterAction::Open { index } => open(index, format, overrides).await,
    }
}

/// Surface printing notifications as they arrive.
struct TerminalSurface {
    quiet: bool,
    printed: Mutex<usize>,
    error_shown: Mutex<bool>,
    rendered: watch::Sender<Option<NotificationCenterProps>>,
}

impl TerminalSurface {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            printed: Mutex::new(0),
            error_shown: Mutex::new(false),
            rendered: watch::channel(None).0,
        }
    }

    fn print(&self, props: &NotificationCenterProps) {
        let labels = &props.locales;

        let mut error_shown = self.error_shown.lock().unwrap();
        if props.error && !*error_shown {
            println!(
                "{} ({})",
                labels.get(LabelKey::ErrorMessage).red(),
                labels.get(LabelKey::Reload).dimmed()
            );
        }
        *error_shown = props.error;

        let mut printed = self.printed.lock().unwrap();
        if props.notifications.len() < *printed {
            *printed = 0;
        }
        let date_format = labels.get(LabelKey::DateFormat);
        for (i, n) in props.notifications.iter().enumerate().skip(*printed) {
            NotificationRow::new(i, n, date_format).plain_print();
        }
        *printed = props.notifications.len();

        if props.done && !props.loading && props.notifications.is_empty() {
            println!("{}", labels.get(LabelKey::NoNotification).dimmed());
        }
    }
}

impl RenderSurface for TerminalSurface {
    fn render(&self, props: &NotificationCenterProps) {
        if !self.quiet {
            self.print(props);
        }
        self.rendered.send_replace(Some(props.clone()));
    }

    fn unmount(&self) {
        tracing::debug!("Terminal surface unmounted");
    }
}

/// Navigator reporting where a click would take the user.
struct TerminalNavigator {
    state: Mutex<Value>,
}

impl TerminalNavigator {
    fn new() -> Self {
        Self {
            state: Mutex::new(Value::Null),
        }
    }
}

impl Navigator for TerminalNavigator {
    fn click(&self, link: &Link) {
        println!(
            "{} {}",
            "→".green(),
            t!("navigate_open", href = &link.href, target = &link.target)
        );
    }

    fn replace(&self, href: &str) {
        println!("{} {}", "→".green(), t!("navigate_replace", href = href));
    }

    fn history_state(&self) -> Value {
        self.state.lock().unwrap().clone()
    }

    fn push_state(&self, state: Value, url: Option<&str>) {
        println!(
            "{} {}",
            "→".green(),
            t!("navigate_push", url = url.unwrap_or("-"))
        );
        println!("   {}", state.to_string().dimmed());
        *self.state.lock().unwrap() = state;
    }
}

fn mount(overrides: &Overrides, quiet: bool) -> Result<(NotificationCenterHost, Arc<TerminalSurface>)> {
    let config = effective_config(overrides)?;
    let surface = Arc::new(TerminalSurface::new(quiet));
    let host = NotificationCenterHost::new(config, surface.clone(), Arc::new(TerminalNavigator::new()))?;
    Ok((host, surface))
}

fn rendered_matches(props: &Option<NotificationCenterProps>, state: &NotificationCenterState) -> bool {
    props.as_ref().is_some_and(|p| {
        p.loading == state.loading
            && p.error == state.error
            && p.unread == state.unread
            && p.notifications == state.notifications
    })
}

/// Wait until the surface has drawn the latest controller state.
async fn settle(surface: &TerminalSurface, center: &NotificationCenter) {
    let state = center.state();
    let mut rx = surface.rendered.subscribe();
    let waited = tokio::time::timeout(
        SETTLE_TIMEOUT,
        rx.wait_for(|props| rendered_matches(props, &state)),
    )
    .await;
    if waited.is_err() {
        tracing::debug!("Surface did not catch up within {:?}", SETTLE_TIMEOUT);
    }
}

fn print_footer(state: &NotificationCenterState) {
    let shown = state.notifications.len();
    match (state.count, state.unread) {
        (Some(count), Some(unread)) => println!(
            "\n{}",
            t!("center_footer", shown = shown, count = count, unread = unread).dimmed()
        ),
        _ => println!("\n{}", t!("center_footer_no_counts", shown = shown).dimmed()),
    }
}

async fn browse(pages: usize, mark_all: bool, format: OutputFormat, overrides: &Overrides) -> Result<()> {
    let quiet = !matches!(format, OutputFormat::Plain);
    let (mut host, surface) = mount(overrides, quiet)?;

    if !quiet {
        let labels = host.config().labels();
        println!("{}\n", labels.get(LabelKey::Title).bold());
    }

    host.connected();
    host.initial_load().await;
    let center = host.center().clone();
    settle(&surface, &center).await;

    for _ in 1..pages {
        let state = center.state();
        if state.done || state.error {
            break;
        }
        center.next().await;
        settle(&surface, &center).await;
    }

    if mark_all {
        let modified = center.on_click_all().await?;
        settle(&surface, &center).await;
        if !quiet {
            match modified {
                Some(n) => println!("{} {}", "✓".green(), t!("marked_all_read_count", count = n)),
                None => println!("{} {}", "✓".green(), t!("marked_all_read")),
            }
        }
    }

    let state = center.state();
    if quiet {
        print_state(&host, &state, format);
    } else {
        print_footer(&state);
    }

    host.dispose();
    Ok(())
}

async fn open(index: usize, format: OutputFormat, overrides: &Overrides) -> Result<()> {
    let (mut host, surface) = mount(overrides, true)?;
    host.connected();
    host.initial_load().await;
    let center = host.center().clone();

    loop {
        let state = center.state();
        if state.notifications.len() > index || state.done || state.error {
            break;
        }
        center.next().await;
    }

    let state = center.state();
    if state.error {
        bail!("{}", host.config().labels().get(LabelKey::ErrorMessage));
    }
    let Some(notification) = state.notifications.get(index).cloned() else {
        bail!("{}", t!("no_such_notification", index = index, shown = state.notifications.len()));
    };

    let link = center.on_click(&notification, index).await?;
    settle(&surface, &center).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&link).unwrap_or_default());
        }
        _ => {
            if link.is_none() {
                println!("{}", t!("no_link", title = &notification.title));
            }
            if let Some(unread) = center.state().unread {
                println!("{}", t!("counts_unread", unread = unread));
            }
        }
    }

    host.dispose();
    Ok(())
}

fn print_state(host: &NotificationCenterHost, state: &NotificationCenterState, format: OutputFormat) {
    let labels = host.config().labels();
    match format {
        OutputFormat::Json => {
            let props = NotificationCenterProps::new(state, &labels);
            println!("{}", serde_json::to_string_pretty(&props).unwrap_or_default());
        }
        _ => {
            let date_format = labels.get(LabelKey::DateFormat);
            let rows: Vec<NotificationRow> = state
                .notifications
                .iter()
                .enumerate()
                .map(|(i, n)| NotificationRow::new(i, n, date_format))
                .collect();
            crate::output::print_table(rows, format);
        }
    }
}
