//! Hosting element for a notification center.
//!
//! Owns the controller for its whole life and mirrors the attach/detach
//! cycle of the element it stands for: the first attach triggers the
//! initial load, later attaches only re-render.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::NotificationBackend;
use crate::config::{FetchMode, NotificationCenterConfig};
use crate::controller::{ControllerOptions, LoadOutcome, NotificationCenter};
use crate::error::Result;
use crate::link::Navigator;
use crate::render::{Attach, Lifecycle, RenderBridge, RenderSurface};

/// A notification center bound to a render surface.
pub struct NotificationCenterHost {
    config: NotificationCenterConfig,
    center: Arc<NotificationCenter>,
    bridge: RenderBridge,
    initial_load: Option<JoinHandle<LoadOutcome>>,
    polling: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for NotificationCenterHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenterHost")
            .field("endpoint", &self.config.endpoint)
            .field("lifecycle", &self.bridge.lifecycle())
            .field("polling", &self.polling.is_some())
            .finish()
    }
}

impl NotificationCenterHost {
    /// Create a host talking HTTP to the configured endpoint.
    pub fn new(
        config: NotificationCenterConfig,
        surface: Arc<dyn RenderSurface>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let backend = Arc::new(config.build_client()?.notifications());
        Self::with_backend(config, backend, surface, navigator)
    }

    /// Create a host over an arbitrary backend.
    pub fn with_backend(
        config: NotificationCenterConfig,
        backend: Arc<dyn NotificationBackend>,
        surface: Arc<dyn RenderSurface>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;
        let options = ControllerOptions {
            limit: config.limit,
            lang: config.language(),
            request_timeout: config.request_timeout(),
            link: config.link_options()?,
        };
        let center = Arc::new(NotificationCenter::new(backend, navigator, options));
        let bridge = RenderBridge::new(center.clone(), surface, config.labels());

        Ok(Self {
            config,
            center,
            bridge,
            initial_load: None,
            polling: None,
        })
    }

    /// The controller, for wiring view actions.
    pub fn center(&self) -> &Arc<NotificationCenter> {
        &self.center
    }

    pub fn config(&self) -> &NotificationCenterConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.bridge.lifecycle()
    }

    /// The host was attached. Must be called from within a tokio runtime.
    pub fn connected(&mut self) -> Attach {
        let attach = self.bridge.attach();
        if attach == Attach::First {
            let center = self.center.clone();
            self.initial_load = Some(tokio::spawn(async move { center.next().await }));

            if self.config.mode == FetchMode::Polling {
                self.polling = Some(self.spawn_polling());
            }
        }
        attach
    }

    /// The host was detached. State and timers survive.
    pub fn disconnected(&mut self) {
        self.bridge.detach();
    }

    /// Wait for the load triggered by the first attach.
    pub async fn initial_load(&mut self) -> Option<LoadOutcome> {
        let handle = self.initial_load.take()?;
        handle.await.ok()
    }

    /// Tear the host down; in-flight responses are dropped.
    pub fn dispose(&mut self) {
        self.center.dispose();
        if let Some(polling) = self.polling.take() {
            polling.abort();
        }
        self.bridge.detach();
    }

    fn spawn_polling(&self) -> JoinHandle<()> {
        let center = self.center.clone();
        let token = center.disposal_token();
        let period = self.config.polling_frequency();
        log::debug!("Polling notifications every {:?}", period);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        center.refresh().await;
                    }
                }
            }
        })
    }
}

impl Drop for NotificationCenterHost {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::MemoryNavigator;
    use crate::testing::{notifications, Call, RecordingSurface, ScriptedBackend};
    use std::time::Duration;

    fn host(
        config: NotificationCenterConfig,
        backend: &Arc<ScriptedBackend>,
    ) -> (NotificationCenterHost, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let host = NotificationCenterHost::with_backend(
            NotificationCenterConfig {
                lang: Some("en".into()),
                ..config
            },
            backend.clone(),
            surface.clone(),
            Arc::new(MemoryNavigator::new("/")),
        )
        .unwrap();
        (host, surface)
    }

    fn page_requests(backend: &ScriptedBackend) -> usize {
        backend.count_calls(|c| matches!(c, Call::GetNotifications { .. }))
    }

    #[tokio::test]
    async fn test_first_attach_loads_once() {
        let backend = Arc::new(ScriptedBackend::new().page(notifications(0, 3)).counts(3, 3));
        let (mut host, surface) = host(NotificationCenterConfig::default(), &backend);

        assert_eq!(host.connected(), Attach::First);
        assert_eq!(host.initial_load().await, Some(LoadOutcome::Loaded));
        assert_eq!(host.center().state().notifications.len(), 3);

        host.disconnected();
        assert_eq!(host.lifecycle(), Lifecycle::Detached);
        assert_eq!(surface.unmounts(), 1);

        assert_eq!(host.connected(), Attach::Again);
        assert_eq!(host.initial_load().await, None);
        assert_eq!(page_requests(&backend), 1);

        let last = surface.renders().last().cloned().unwrap();
        assert_eq!(last.notifications.len(), 3);
    }

    #[tokio::test]
    async fn test_polling_refreshes_until_disposed() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .page(notifications(0, 2))
                .page(notifications(0, 3))
                .counts(3, 3),
        );
        let config = NotificationCenterConfig {
            mode: FetchMode::Polling,
            polling_frequency_ms: 30,
            ..Default::default()
        };
        let (mut host, _) = host(config, &backend);

        host.connected();
        host.initial_load().await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(page_requests(&backend) >= 2);
        assert!(backend.calls().contains(&Call::GetNotifications {
            skip: 0,
            lang: Some("en".into()),
            limit: Some(10),
        }));

        host.dispose();
        let after_dispose = page_requests(&backend);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(page_requests(&backend), after_dispose);
        assert!(host.center().is_disposed());
    }

    #[tokio::test]
    async fn test_zero_polling_period_rejected() {
        let backend = Arc::new(ScriptedBackend::new());
        let result = NotificationCenterHost::with_backend(
            NotificationCenterConfig {
                mode: FetchMode::Polling,
                polling_frequency_ms: 0,
                ..Default::default()
            },
            backend.clone(),
            Arc::new(RecordingSurface::default()),
            Arc::new(MemoryNavigator::new("/")),
        );

        assert!(matches!(result, Err(crate::error::Error::InvalidArgument(_))));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_once_mode_does_not_poll() {
        let backend = Arc::new(ScriptedBackend::new().page(notifications(0, 1)));
        let config = NotificationCenterConfig {
            polling_frequency_ms: 10,
            ..Default::default()
        };
        let (mut host, _) = host(config, &backend);

        host.connected();
        host.initial_load().await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(page_requests(&backend), 1);
    }
}
