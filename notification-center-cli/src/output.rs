//! Output formatting.

use chrono::{DateTime, Local};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use notification_center::{Counters, Notification};
use rust_i18n::t;
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table format
    Table,
    /// JSON format
    Json,
    /// Plain text format
    #[default]
    Plain,
}

/// Trait for plain text output.
pub trait PlainPrint {
    /// Print as plain text with formatting.
    fn plain_print(&self);
}

/// Trait for table row generation.
pub trait TableRow {
    /// Get table headers.
    fn headers() -> Vec<&'static str>;
    /// Get row data as strings.
    fn row(&self) -> Vec<String>;
}

/// Print items in plain text format.
pub fn print_plain<T: PlainPrint>(items: &[T]) {
    if items.is_empty() {
        println!("{}", t!("no_results"));
        return;
    }
    for item in items {
        item.plain_print();
    }
}

/// Translate a `YYYY-MM-DD` style date label into a chrono format string.
pub fn chrono_format(pattern: &str) -> String {
    const TOKENS: [(&str, &str); 7] = [
        ("YYYY", "%Y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("YY", "%y"),
    ];

    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    'outer: while !rest.is_empty() {
        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }
    out
}

/// Format an ISO-8601 timestamp for display using a date label pattern.
pub fn format_time(timestamp: &str, pattern: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format(&chrono_format(pattern))
            .to_string(),
        Err(_) => "-".to_string(),
    }
}

/// Print a table of items with proper formatting for each output mode.
pub fn print_table<T: TableRow + Serialize + PlainPrint>(items: Vec<T>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items).unwrap_or_default());
        }
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", t!("no_results"));
                return;
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(T::headers());
            for item in &items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Plain => {
            print_plain(&items);
        }
    }
}

/// Row for notification list display.
#[derive(Serialize)]
pub struct NotificationRow {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub content: String,
    pub time: String,
    pub created_at: String,
    pub read: bool,
    pub link: Option<String>,
}

impl NotificationRow {
    pub fn new(index: usize, n: &Notification, date_format: &str) -> Self {
        Self {
            index,
            id: n.id.to_string(),
            title: n.title.clone(),
            content: n.content.clone().unwrap_or_default(),
            time: format_time(&n.created_at, date_format),
            created_at: n.created_at.clone(),
            read: n.read_state,
            link: n
                .on_click_callback
                .as_ref()
                .and_then(|cb| cb.content.url())
                .map(str::to_owned),
        }
    }
}

impl TableRow for NotificationRow {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Title", "Content", "Date", "Read"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.title.clone(),
            self.content.clone(),
            self.time.clone(),
            if self.read { "✓" } else { "" }.to_string(),
        ]
    }
}

impl PlainPrint for NotificationRow {
    fn plain_print(&self) {
        let marker = if self.read {
            " ".normal()
        } else {
            "●".yellow()
        };
        let title = if self.read {
            self.title.normal()
        } else {
            self.title.bold()
        };
        println!(
            "{} [{}] {} {}",
            marker,
            self.index.to_string().cyan(),
            title,
            self.time.dimmed()
        );
        for line in self.content.lines() {
            if !line.trim().is_empty() {
                println!("     {}", line);
            }
        }
        if let Some(link) = &self.link {
            println!("     {}", link.underline().blue());
        }
    }
}

/// Row for notification counters.
#[derive(Serialize)]
pub struct CountsRow {
    pub count: u64,
    pub unread: u64,
}

impl From<Counters> for CountsRow {
    fn from(c: Counters) -> Self {
        Self {
            count: c.count,
            unread: c.unread,
        }
    }
}

impl TableRow for CountsRow {
    fn headers() -> Vec<&'static str> {
        vec!["Total", "Unread"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.count.to_string(), self.unread.to_string()]
    }
}

impl PlainPrint for CountsRow {
    fn plain_print(&self) {
        let unread = if self.unread > 0 {
            self.unread.to_string().yellow().to_string()
        } else {
            self.unread.to_string().dimmed().to_string()
        };
        println!("{}", t!("counts_total", count = self.count));
        println!("{}", t!("counts_unread", unread = unread));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrono_format() {
        assert_eq!(chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(chrono_format("DD/MM/YY HH:mm"), "%d/%m/%y %H:%M");
        assert_eq!(chrono_format("100% sure"), "100%% sure");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("not a date", "YYYY"), "-");
        assert_eq!(format_time("2024-03-01T10:00:00.000Z", "YYYY"), "2024");
    }
}
