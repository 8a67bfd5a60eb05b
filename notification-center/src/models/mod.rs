//! Data models for notification center entities.

mod ids;
mod localized;
mod notification;

pub use ids::{CreatorId, NotificationId};
pub use localized::LocalizedString;
pub use notification::{
    ClickCallback, ClickContent, Counters, Notification, Pagination, RawNotification,
};
