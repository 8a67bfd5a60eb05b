//! Notification loading and read-state controller.
//!
//! [`NotificationCenter`] owns the list a user sees: it fetches pages and
//! counters together, merges them into a single state snapshot and applies
//! read-state changes locally once the service confirms them. Every state
//! change is published on a [`watch`] channel so views can re-render.

mod state;

pub use state::{LoadMode, LoadOutcome, NotificationCenterState};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::{ensure_id, NotificationBackend};
use crate::error::{Error, Result};
use crate::link::{dispatch_click, Link, LinkOptions, Navigator};
use crate::models::{Counters, Notification, Pagination, RawNotification};
use state::request_window;

/// Settings of a [`NotificationCenter`].
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Page size.
    pub limit: usize,
    /// Language for localization and server-side translation.
    pub lang: String,
    /// Upper bound for every network call.
    pub request_timeout: Duration,
    pub link: LinkOptions,
}

/// Controller behind a notification center widget.
pub struct NotificationCenter {
    backend: Arc<dyn NotificationBackend>,
    navigator: Arc<dyn Navigator>,
    options: ControllerOptions,
    state: watch::Sender<NotificationCenterState>,
    disposed: CancellationToken,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("options", &self.options)
            .field("state", &*self.state.borrow())
            .field("disposed", &self.disposed.is_cancelled())
            .finish()
    }
}

impl NotificationCenter {
    /// Create a controller with empty state.
    pub fn new(
        backend: Arc<dyn NotificationBackend>,
        navigator: Arc<dyn Navigator>,
        options: ControllerOptions,
    ) -> Self {
        let (state, _) = watch::channel(NotificationCenterState::default());
        Self {
            backend,
            navigator,
            options: ControllerOptions {
                limit: options.limit.max(1),
                ..options
            },
            state,
            disposed: CancellationToken::new(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> NotificationCenterState {
        self.state.borrow().clone()
    }

    /// Receive a notification on every state change.
    pub fn subscribe(&self) -> watch::Receiver<NotificationCenterState> {
        self.state.subscribe()
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Fetch the page after the current cursor.
    pub async fn next(&self) -> LoadOutcome {
        self.load(LoadMode::Next).await
    }

    /// Drop accumulated notifications and fetch the first page.
    pub async fn reload(&self) -> LoadOutcome {
        self.load(LoadMode::Reload).await
    }

    /// Refetch the visible window from offset 0.
    pub async fn refresh(&self) -> LoadOutcome {
        self.load(LoadMode::KeepLimit).await
    }

    /// Fetch a page and the counters, then merge both into the state.
    ///
    /// Only one load runs at a time: a call made while `loading` is set
    /// returns [`LoadOutcome::Skipped`] without touching the state. Network
    /// failures never escape; a failed page sets `error`, failed counters
    /// are ignored.
    pub async fn load(&self, mode: LoadMode) -> LoadOutcome {
        if self.is_disposed() {
            return LoadOutcome::Disposed;
        }

        let limit = self.options.limit;
        let mut window = None;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            window = Some(request_window(mode, state, limit));
            state.loading = true;
            state.done = false;
            true
        });

        let Some((skip, requested)) = window else {
            log::debug!("Load {:?} skipped, another load is in flight", mode);
            return LoadOutcome::Skipped;
        };

        let lang = self.options.lang.as_str();
        let legs = async {
            tokio::join!(
                self.bounded(self.backend.get_notifications(skip, Some(lang), Some(requested))),
                self.bounded(self.backend.get_counts()),
            )
        };

        let (page, counts) = tokio::select! {
            _ = self.disposed.cancelled() => {
                log::debug!("Dropping load results, notification center disposed");
                return LoadOutcome::Disposed;
            }
            legs = legs => legs,
        };

        let mut outcome = LoadOutcome::Loaded;
        self.state.send_modify(|state| {
            match page {
                Ok(items) => merge_page(state, mode, items, lang, skip, requested),
                Err(e) => {
                    log::warn!("Failed to fetch notifications at skip {}: {}", skip, e);
                    state.error = true;
                    outcome = LoadOutcome::Failed;
                }
            }

            match counts {
                Ok(counts) => merge_counts(state, counts),
                Err(e) => log::debug!("Ignoring counters failure: {}", e),
            }

            state.loading = false;
        });

        outcome
    }

    /// Handle a click on the notification at `index`.
    ///
    /// Unread notifications are marked read first; the local copy and the
    /// unread counter change only after the service accepts the patch. Then
    /// the click target, if any, is dispatched. Returns the followed link.
    pub async fn on_click(&self, notification: &Notification, index: usize) -> Result<Option<Link>> {
        if self.is_disposed() {
            return Err(Error::Disposed);
        }

        if notification.is_unread() {
            ensure_id(&notification.id)?;
            self.cancellable(
                self.backend
                    .patch_read_state(&notification.id, true),
            )
            .await?;

            self.state
                .send_modify(|state| mark_one_read(state, notification, index));
        }

        match notification.on_click_callback {
            Some(ref callback) => {
                dispatch_click(&self.options.link, &callback.content, self.navigator.as_ref())
            }
            None => Ok(None),
        }
    }

    /// Mark every notification read.
    ///
    /// Returns the modified row count reported by the service.
    pub async fn on_click_all(&self) -> Result<Option<u64>> {
        if self.is_disposed() {
            return Err(Error::Disposed);
        }

        let modified = self
            .cancellable(self.backend.patch_all_read_state())
            .await?;

        self.state.send_modify(|state| {
            for notification in state.notifications.iter_mut() {
                notification.read_state = true;
            }
            state.unread = Some(0);
        });

        Ok(modified)
    }

    /// Stop all in-flight and future operations from touching the state.
    pub fn dispose(&self) {
        self.disposed.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_cancelled()
    }

    /// Token cancelled on disposal.
    pub fn disposal_token(&self) -> CancellationToken {
        self.disposed.clone()
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let timeout = self.options.request_timeout;
        tokio::time::timeout(timeout, fut)
            .await
            .unwrap_or(Err(Error::Timeout(timeout)))
    }

    async fn cancellable<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            _ = self.disposed.cancelled() => Err(Error::Disposed),
            res = self.bounded(fut) => res,
        }
    }
}

fn merge_page(
    state: &mut NotificationCenterState,
    mode: LoadMode,
    items: Vec<RawNotification>,
    lang: &str,
    skip: usize,
    requested: usize,
) {
    let received = items.len();
    let localized = items.into_iter().map(|raw| raw.localize(lang));

    state.error = false;
    if mode.replaces() {
        state.notifications = localized.collect();
    } else {
        state.notifications.extend(localized);
    }
    state.page = Pagination {
        skip: skip + requested,
        last: Some(skip),
    };

    if received == 0 || received < requested {
        state.done = true;
    }
}

fn merge_counts(state: &mut NotificationCenterState, counts: Counters) {
    state.count = Some(counts.count);
    state.unread = Some(counts.unread);

    if state.notifications.len() as u64 == counts.count {
        state.done = true;
    }
}

fn mark_one_read(state: &mut NotificationCenterState, notification: &Notification, index: usize) {
    let read = Notification {
        read_state: true,
        ..notification.clone()
    };

    match state.notifications.get_mut(index) {
        Some(slot) if slot.id == notification.id => *slot = read,
        _ => match state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification.id)
        {
            Some(slot) => *slot = read,
            None => log::warn!("Notification {} is no longer listed", notification.id),
        },
    }

    state.unread = match state.unread {
        Some(0) => {
            log::warn!("Unread counter already at zero while marking {} read", notification.id);
            Some(0)
        }
        Some(n) => Some(n - 1),
        None => None,
    };
}
