//! Mount/unmount lifecycle of a render surface.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{NotificationCenterProps, RenderSurface, Subscription};
use crate::controller::NotificationCenter;
use crate::i18n::Labels;

/// Whether the surface is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Detached,
    Attached,
}

/// Result of [`RenderBridge::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// First time the surface is attached.
    First,
    /// Re-attached after a detach; only a render happened.
    Again,
    /// Already attached; nothing happened.
    Unchanged,
}

/// Re-renders a surface on every controller state change while attached.
pub struct RenderBridge {
    center: Arc<NotificationCenter>,
    surface: Arc<dyn RenderSurface>,
    labels: Labels,
    lifecycle: Lifecycle,
    attached_before: bool,
    subscription: Option<Subscription>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RenderBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderBridge")
            .field("lifecycle", &self.lifecycle)
            .field("attached_before", &self.attached_before)
            .finish()
    }
}

impl RenderBridge {
    pub fn new(center: Arc<NotificationCenter>, surface: Arc<dyn RenderSurface>, labels: Labels) -> Self {
        Self {
            center,
            surface,
            labels,
            lifecycle: Lifecycle::Detached,
            attached_before: false,
            subscription: None,
            task: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Props for the current controller state.
    pub fn props(&self) -> NotificationCenterProps {
        NotificationCenterProps::new(&self.center.state(), &self.labels)
    }

    /// Render the current state and follow state changes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(&mut self) -> Attach {
        if self.lifecycle == Lifecycle::Attached {
            return Attach::Unchanged;
        }

        self.surface.render(&self.props());

        let subscription = Subscription::new();
        let surface = self.surface.clone();
        let render = subscription.add(move |props: NotificationCenterProps| surface.render(&props));
        let labels = self.labels.clone();
        let mut rx = self.center.subscribe();

        self.task = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let props = NotificationCenterProps::new(&rx.borrow_and_update(), &labels);
                if render(props).is_none() {
                    break;
                }
            }
        }));
        self.subscription = Some(subscription);
        self.lifecycle = Lifecycle::Attached;

        if std::mem::replace(&mut self.attached_before, true) {
            log::debug!("Surface re-attached, rendering without fetching");
            Attach::Again
        } else {
            Attach::First
        }
    }

    /// Stop rendering and unmount the surface. Controller state is kept.
    pub fn detach(&mut self) {
        if self.lifecycle == Lifecycle::Detached {
            return;
        }

        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.surface.unmount();
        self.lifecycle = Lifecycle::Detached;
    }
}

impl Drop for RenderBridge {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
