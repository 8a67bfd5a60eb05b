//! HTTP client and configuration.

mod http;

pub use http::{
    routes, HttpConfig, DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_PAGINATION_LIMIT,
};

use crate::api::NotificationApi;
use crate::error::{Error, Result};
use http::{build_client, HttpExecutor};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating NotificationClient.
#[derive(Debug, Default)]
pub struct NotificationClientBuilder {
    http_config: HttpConfig,
}

impl NotificationClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document origin used to resolve a relative endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Set the notification service endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.http_config.endpoint = endpoint.into();
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_config.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all request headers.
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.http_config.headers = headers;
        self
    }

    /// Send `Authorization: Bearer <token>`.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.http_config.limit = limit;
        self
    }

    /// Set the names of the pagination query parameters.
    pub fn query_params(mut self, skip: impl Into<String>, limit: impl Into<String>) -> Self {
        self.http_config.skip_query_param = skip.into();
        self.http_config.limit_query_param = limit.into();
        self
    }

    /// Set custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http_config.user_agent = Some(ua.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Build NotificationClient.
    pub fn build(self) -> Result<NotificationClient> {
        if self.http_config.limit == 0 {
            return Err(Error::InvalidArgument(
                "pagination limit must be at least 1".into(),
            ));
        }

        self.http_config.resolve_url(routes::FETCH)?;
        let http_client = build_client(&self.http_config)?;

        Ok(NotificationClient {
            inner: Arc::new(ClientInner {
                http: http_client,
                config: self.http_config,
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct ClientInner {
    pub http: reqwest::Client,
    pub config: HttpConfig,
}

impl ClientInner {
    /// Create HTTP executor.
    pub fn executor(&self) -> HttpExecutor<'_> {
        HttpExecutor::new(&self.http, &self.config)
    }
}

/// Client for the notification service.
#[derive(Clone)]
pub struct NotificationClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl NotificationClient {
    /// Create a new client builder.
    pub fn builder() -> NotificationClientBuilder {
        NotificationClientBuilder::new()
    }

    /// Get the notification API.
    pub fn notifications(&self) -> NotificationApi {
        NotificationApi::new(self.inner.clone())
    }

    /// Get the HTTP configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for NotificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationClient")
            .field("endpoint", &self.inner.config.endpoint)
            .field("base_url", &self.inner.config.base_url)
            .field("limit", &self.inner.config.limit)
            .finish()
    }
}
