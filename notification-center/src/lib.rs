//! Embeddable notification center core.
//!
//! Loads paginated notifications for the current user, keeps unread
//! counters in sync with read-state changes, localizes fields and labels,
//! and turns notification clicks into navigation.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod i18n;
pub mod link;
pub mod models;
pub mod render;

#[cfg(test)]
mod testing;

// Re-export main types
pub use client::{HttpConfig, NotificationClient, NotificationClientBuilder};
pub use config::{FetchMode, NotificationCenterConfig};
pub use controller::{
    ControllerOptions, LoadMode, LoadOutcome, NotificationCenter, NotificationCenterState,
};
pub use error::{Error, Result};
pub use host::NotificationCenterHost;

// Re-export commonly used models
pub use models::{
    ClickCallback, ClickContent, Counters, LocalizedString, Notification, NotificationId,
    Pagination, RawNotification,
};

// Re-export API and view types
pub use api::{NotificationApi, NotificationBackend};
pub use i18n::{LabelKey, Labels};
pub use link::{ClickStrategy, Link, LinkOptions, MemoryNavigator, Navigator};
pub use render::{NotificationCenterProps, RenderBridge, RenderSurface};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = NotificationClient::builder().build();
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.config().limit, 10);
    }

    #[test]
    fn test_client_with_endpoint() {
        let client = NotificationClient::builder()
            .endpoint("https://example.com/my-notifications")
            .limit(5)
            .build()
            .unwrap();

        assert_eq!(client.config().endpoint, "https://example.com/my-notifications");
        assert_eq!(client.notifications().limit(), 5);
    }
}
