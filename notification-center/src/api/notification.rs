//! Notification API.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::{ensure_id, NotificationBackend};
use crate::{
    client::{routes, ClientInner},
    error::Result,
    models::{Counters, NotificationId, RawNotification},
};

/// Body of read-state patches.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadStateRequest {
    read_state: bool,
}

/// API for notification operations.
#[derive(Clone)]
pub struct NotificationApi {
    client: Arc<ClientInner>,
}

impl NotificationApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Page size configured on the client.
    pub fn limit(&self) -> usize {
        self.client.config.limit
    }

    /// List notifications of the current user.
    pub fn list(&self) -> NotificationListBuilder {
        NotificationListBuilder {
            client: self.client.clone(),
            skip: 0,
            limit: self.client.config.limit,
            lang: None,
        }
    }

    /// Get total and unread counts.
    pub async fn counts(&self) -> Result<Counters> {
        self.client.executor().get_json(routes::COUNT, &[]).await
    }

    /// Set the read state of a notification.
    pub async fn mark_read(&self, id: &NotificationId, read_state: bool) -> Result<()> {
        ensure_id(id)?;

        let url = self
            .client
            .config
            .resolve_item_url(routes::SET_READ, id.as_str())?;
        self.client
            .executor()
            .patch_json_at(url, &ReadStateRequest { read_state })
            .await?;

        Ok(())
    }

    /// Mark all notifications as read.
    pub async fn mark_all_read(&self) -> Result<Option<u64>> {
        let route = format!("{}{}", routes::SET_READ, routes::FETCH);
        let body = self
            .client
            .executor()
            .patch_json(&route, &ReadStateRequest { read_state: true })
            .await?;

        Ok(body.as_ref().and_then(modified_count))
    }
}

/// Extract the modified row count from a mark-all response body.
fn modified_count(body: &serde_json::Value) -> Option<u64> {
    match body {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::Object(map) => ["modifiedCount", "count", "modified"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_u64())),
        _ => None,
    }
}

#[async_trait]
impl NotificationBackend for NotificationApi {
    async fn get_notifications(
        &self,
        skip: usize,
        lang: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<RawNotification>> {
        let mut builder = self.list().skip(skip);
        if let Some(limit) = limit {
            builder = builder.limit(limit);
        }
        if let Some(lang) = lang {
            builder = builder.lang(lang);
        }
        builder.send().await
    }

    async fn get_counts(&self) -> Result<Counters> {
        self.counts().await
    }

    async fn patch_read_state(&self, id: &NotificationId, read_state: bool) -> Result<()> {
        self.mark_read(id, read_state).await
    }

    async fn patch_all_read_state(&self) -> Result<Option<u64>> {
        self.mark_all_read().await
    }
}

/// Builder for notification list requests.
pub struct NotificationListBuilder {
    client: Arc<ClientInner>,
    skip: usize,
    limit: usize,
    lang: Option<String>,
}

impl NotificationListBuilder {
    /// Set the offset.
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Ask the service to localize titles and contents.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Execute the request.
    pub async fn send(self) -> Result<Vec<RawNotification>> {
        let config = &self.client.config;

        let mut query = vec![
            (config.skip_query_param.as_str(), self.skip.to_string()),
            (config.limit_query_param.as_str(), self.limit.to_string()),
        ];
        if let Some(ref lang) = self.lang {
            query.push(("lang", lang.clone()));
        }

        self.client
            .executor()
            .get_json(routes::FETCH, &query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NotificationClient;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_modified_count() {
        assert_eq!(modified_count(&json!(12)), Some(12));
        assert_eq!(modified_count(&json!({"modifiedCount": 3})), Some(3));
        assert_eq!(modified_count(&json!({"count": 4})), Some(4));
        assert_eq!(modified_count(&json!("ok")), None);
    }

    #[tokio::test]
    async fn test_mark_read_rejects_empty_id() {
        let api = NotificationClient::builder().build().unwrap().notifications();

        let err = api.mark_read(&NotificationId::default(), true).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: `_id` cannot be undefined or an empty string"
        );
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
