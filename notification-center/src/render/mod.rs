//! Bridge between controller state and a view.

mod bridge;
mod subscription;

pub use bridge::{Attach, Lifecycle, RenderBridge};
pub use subscription::Subscription;

use serde::Serialize;

use crate::controller::NotificationCenterState;
use crate::i18n::Labels;
use crate::models::Notification;

/// Props handed to a view on every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationCenterProps {
    pub notifications: Vec<Notification>,
    pub loading: bool,
    pub error: bool,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<u64>,
    pub locales: Labels,
}

impl NotificationCenterProps {
    /// Build props from a state snapshot.
    pub fn new(state: &NotificationCenterState, labels: &Labels) -> Self {
        Self {
            notifications: state.notifications.clone(),
            loading: state.loading,
            error: state.error,
            done: state.done,
            count: state.count,
            unread: state.unread,
            locales: labels.clone(),
        }
    }
}

/// A view that can display the notification center.
pub trait RenderSurface: Send + Sync {
    /// Draw the given props, replacing whatever was drawn before.
    fn render(&self, props: &NotificationCenterProps);

    /// Remove the view.
    fn unmount(&self);
}
