//! Scripted backend for unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::NotificationBackend;
use crate::error::{Error, Result};
use crate::models::{ClickCallback, ClickContent, Counters, NotificationId, RawNotification};

/// A request observed by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetNotifications {
        skip: usize,
        lang: Option<String>,
        limit: Option<usize>,
    },
    GetCounts,
    PatchReadState(String, bool),
    PatchAllReadState,
}

/// Backend answering from queued responses.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pages: Mutex<VecDeque<Option<Vec<RawNotification>>>>,
    counts: Mutex<Option<Counters>>,
    fail_patches: Mutex<bool>,
    modified: Mutex<Option<u64>>,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page.
    pub fn page(self, items: Vec<RawNotification>) -> Self {
        self.pages.lock().unwrap().push_back(Some(items));
        self
    }

    /// Queue a failing page.
    pub fn failing_page(self) -> Self {
        self.pages.lock().unwrap().push_back(None);
        self
    }

    /// Counters returned by every counts request; unset means failure.
    pub fn counts(self, count: u64, unread: u64) -> Self {
        *self.counts.lock().unwrap() = Some(Counters { count, unread });
        self
    }

    pub fn failing_patches(self) -> Self {
        *self.fail_patches.lock().unwrap() = true;
        self
    }

    pub fn modified(self, n: u64) -> Self {
        *self.modified.lock().unwrap() = Some(n);
        self
    }

    /// Sleep before answering page requests.
    pub fn delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn patch_result(&self) -> Result<()> {
        if *self.fail_patches.lock().unwrap() {
            Err(Error::api(500, "Internal Server Error", "patch failed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationBackend for ScriptedBackend {
    async fn get_notifications(
        &self,
        skip: usize,
        lang: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<RawNotification>> {
        self.record(Call::GetNotifications {
            skip,
            lang: lang.map(str::to_owned),
            limit,
        });

        let delay = *self.delay.lock().unwrap();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        match self.pages.lock().unwrap().pop_front() {
            Some(Some(items)) => Ok(items),
            Some(None) => Err(Error::api(500, "Internal Server Error", "page failed")),
            None => Ok(Vec::new()),
        }
    }

    async fn get_counts(&self) -> Result<Counters> {
        self.record(Call::GetCounts);
        tokio::task::yield_now().await;

        self.counts
            .lock()
            .unwrap()
            .ok_or_else(|| Error::api(503, "Service Unavailable", "counts failed"))
    }

    async fn patch_read_state(&self, id: &NotificationId, read_state: bool) -> Result<()> {
        self.record(Call::PatchReadState(id.to_string(), read_state));
        tokio::task::yield_now().await;
        self.patch_result()
    }

    async fn patch_all_read_state(&self) -> Result<Option<u64>> {
        self.record(Call::PatchAllReadState);
        tokio::task::yield_now().await;
        self.patch_result()?;
        Ok(*self.modified.lock().unwrap())
    }
}

/// `n` unread notifications with ids `n{start}`..
pub fn notifications(start: usize, n: usize) -> Vec<RawNotification> {
    (start..start + n)
        .map(|i| RawNotification {
            id: NotificationId::new(format!("n{}", i)),
            creator_id: "creator".into(),
            created_at: "2024-03-01T10:00:00.000Z".into(),
            title: Some(crate::models::LocalizedString::localized([
                ("en", format!("Title {}", i)),
                ("it", format!("Titolo {}", i)),
            ])),
            content: None,
            read_state: None,
            on_click_callback: None,
        })
        .collect()
}

/// Attach a click target to a notification.
pub fn with_link(mut raw: RawNotification, url: &str) -> RawNotification {
    raw.on_click_callback = Some(ClickCallback {
        kind: "href".into(),
        content: ClickContent::Url(url.into()),
    });
    raw
}

/// Surface remembering every render.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    renders: Mutex<Vec<crate::render::NotificationCenterProps>>,
    unmounts: Mutex<usize>,
}

impl RecordingSurface {
    pub fn renders(&self) -> Vec<crate::render::NotificationCenterProps> {
        self.renders.lock().unwrap().clone()
    }

    pub fn unmounts(&self) -> usize {
        *self.unmounts.lock().unwrap()
    }
}

impl crate::render::RenderSurface for RecordingSurface {
    fn render(&self, props: &crate::render::NotificationCenterProps) {
        self.renders.lock().unwrap().push(props.clone());
    }

    fn unmount(&self) {
        *self.unmounts.lock().unwrap() += 1;
    }
}
