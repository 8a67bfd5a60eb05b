//! Notification service contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Counters, NotificationId, RawNotification};

/// Operations the notification center needs from its backend.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Fetch one page of notifications starting at `skip`.
    ///
    /// `limit` overrides the configured page size for this request.
    async fn get_notifications(
        &self,
        skip: usize,
        lang: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<RawNotification>>;

    /// Fetch total and unread counters.
    async fn get_counts(&self) -> Result<Counters>;

    /// Set the read state of one notification.
    async fn patch_read_state(&self, id: &NotificationId, read_state: bool) -> Result<()>;

    /// Mark every notification of the current user as read.
    ///
    /// Returns the number of modified rows when the service reports it.
    async fn patch_all_read_state(&self) -> Result<Option<u64>>;
}
