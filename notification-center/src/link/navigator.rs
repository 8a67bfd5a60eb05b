//! Navigation seam.

use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Link;

/// Something that can perform navigation on behalf of the notification center.
pub trait Navigator: Send + Sync {
    /// Follow an anchor, as a programmatic click would.
    fn click(&self, link: &Link);

    /// Replace the current location without adding a history entry.
    fn replace(&self, href: &str);

    /// Current history state.
    fn history_state(&self) -> Value;

    /// Push a history entry without navigating the document.
    fn push_state(&self, state: Value, url: Option<&str>);
}

/// One entry of a [`MemoryNavigator`] history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub state: Value,
}

/// In-memory navigator keeping a history stack.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<HistoryEntry>>,
    opened: Mutex<Vec<Link>>,
}

impl MemoryNavigator {
    /// Create a navigator positioned at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![HistoryEntry {
                url: url.into(),
                state: Value::Null,
            }]),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Current history entry.
    pub fn current(&self) -> HistoryEntry {
        let history = self.history();
        history.last().cloned().unwrap_or(HistoryEntry {
            url: String::new(),
            state: Value::Null,
        })
    }

    /// Number of history entries.
    pub fn len(&self) -> usize {
        self.history().len()
    }

    /// Check if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Links followed through [`Navigator::click`].
    pub fn opened(&self) -> Vec<Link> {
        self.opened_links().clone()
    }
}

impl MemoryNavigator {
    // Entries are written whole, so a poisoned lock still guards a valid history.
    fn history(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn opened_links(&self) -> MutexGuard<'_, Vec<Link>> {
        self.opened.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for MemoryNavigator {
    fn click(&self, link: &Link) {
        self.opened_links().push(link.clone());
        if link.target == "_self" {
            self.history().push(HistoryEntry {
                url: link.href.clone(),
                state: Value::Null,
            });
        }
    }

    fn replace(&self, href: &str) {
        let mut history = self.history();
        let entry = HistoryEntry {
            url: href.to_owned(),
            state: Value::Null,
        };
        match history.last_mut() {
            Some(last) => *last = entry,
            None => history.push(entry),
        }
    }

    fn history_state(&self) -> Value {
        self.current().state
    }

    fn push_state(&self, state: Value, url: Option<&str>) {
        let mut history = self.history();
        let url = url
            .map(str::to_owned)
            .or_else(|| history.last().map(|e| e.url.clone()))
            .unwrap_or_default();
        history.push(HistoryEntry { url, state });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(href: &str, target: &str) -> Link {
        Link {
            href: href.into(),
            protocol: "http:".into(),
            host: "localhost".into(),
            target: target.into(),
        }
    }

    #[test]
    fn test_click_self_adds_entry() {
        let nav = MemoryNavigator::new("/");
        nav.click(&link("/a", "_self"));
        assert_eq!(nav.len(), 2);
        assert_eq!(nav.current().url, "/a");
    }

    #[test]
    fn test_click_blank_keeps_location() {
        let nav = MemoryNavigator::new("/");
        nav.click(&link("/a", "_blank"));
        assert_eq!(nav.len(), 1);
        assert_eq!(nav.opened().len(), 1);
    }

    #[test]
    fn test_replace() {
        let nav = MemoryNavigator::new("/");
        nav.replace("/b");
        assert_eq!(nav.len(), 1);
        assert_eq!(nav.current().url, "/b");
    }

    #[test]
    fn test_push_without_url_keeps_location() {
        let nav = MemoryNavigator::new("/home");
        nav.push_state(json!({"k": 1}), None);
        assert_eq!(nav.len(), 2);
        assert_eq!(nav.current().url, "/home");
        assert_eq!(nav.history_state(), json!({"k": 1}));
    }

    #[test]
    fn test_survives_poisoned_history() {
        let navigator = MemoryNavigator::new("/home");
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = navigator.history.lock().unwrap();
            panic!("render failed while holding the history");
        }));
        assert!(navigator.history.is_poisoned());

        navigator.push_state(json!({"k": 1}), Some("/inbox"));
        assert_eq!(navigator.len(), 2);
        assert_eq!(navigator.current().url, "/inbox");
        assert_eq!(navigator.history_state(), json!({"k": 1}));
    }
}
