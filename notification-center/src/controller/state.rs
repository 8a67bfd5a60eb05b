//! Controller state and load bookkeeping.

use serde::Serialize;

use crate::models::{Notification, Pagination};

/// Everything a view needs to render the notification center.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationCenterState {
    /// Pages fetched since the last reload, in offset order.
    pub notifications: Vec<Notification>,
    pub loading: bool,
    /// Set when the last page fetch failed.
    pub error: bool,
    /// No more pages to fetch. Cleared by every load.
    pub done: bool,
    pub page: Pagination,
    /// Total notifications reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Unread notifications reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<u64>,
}

/// Which page a load fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// The page after the current cursor, appended.
    Next,
    /// The first page, replacing everything.
    Reload,
    /// From offset 0, enough items to cover the visible window, replacing it.
    KeepLimit,
}

impl LoadMode {
    /// Whether the fetched page replaces the accumulated notifications.
    pub fn replaces(&self) -> bool {
        !matches!(self, LoadMode::Next)
    }
}

/// How a load call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was fetched and merged.
    Loaded,
    /// The page fetch failed; `error` is set.
    Failed,
    /// Another load was in flight; nothing was requested.
    Skipped,
    /// The controller was disposed; results were dropped.
    Disposed,
}

/// Offset and size of the request a load issues.
pub(crate) fn request_window(mode: LoadMode, state: &NotificationCenterState, limit: usize) -> (usize, usize) {
    match mode {
        LoadMode::Next => (state.page.skip, limit),
        LoadMode::Reload => (0, limit),
        LoadMode::KeepLimit => {
            let len = state.notifications.len();
            (0, len.div_ceil(limit).max(1) * limit)
        }
    }
}
