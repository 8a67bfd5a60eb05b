//! HTTP client configuration and request execution.

use crate::error::{Error, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Default notification service endpoint, relative to the document origin.
pub const DEFAULT_ENDPOINT: &str = "/api/v1/micro-lc-notification-center";

/// Default document origin used to resolve relative endpoints.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Default page size.
pub const DEFAULT_PAGINATION_LIMIT: usize = 10;

/// Routes of the notification service, relative to the endpoint.
pub mod routes {
    pub const FETCH: &str = "/own";
    pub const SET_READ: &str = "/read-state";
    pub const COUNT: &str = "/own/count";
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Origin against which a relative endpoint is resolved.
    pub base_url: String,
    /// Notification service endpoint, absolute or relative.
    pub endpoint: String,
    /// Headers attached to every request.
    pub headers: BTreeMap<String, String>,
    /// Page size.
    pub limit: usize,
    /// Name of the offset query parameter.
    pub skip_query_param: String,
    /// Name of the page size query parameter.
    pub limit_query_param: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// Custom user agent.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            headers: BTreeMap::new(),
            limit: DEFAULT_PAGINATION_LIMIT,
            skip_query_param: "skip".to_owned(),
            limit_query_param: "limit".to_owned(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Resolve a service route to a full URL.
    pub fn resolve_url(&self, route: &str) -> Result<Url> {
        let path = format!("{}{}", self.endpoint.trim_end_matches('/'), route);
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(&path).map_err(Error::Url);
        }

        Url::parse(&self.base_url)
            .and_then(|b| b.join(&path))
            .map_err(Error::Url)
    }

    /// Resolve a route followed by one opaque path segment, percent-encoded.
    pub fn resolve_item_url(&self, route: &str, item: &str) -> Result<Url> {
        let mut url = self.resolve_url(route)?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidArgument(format!("cannot append `{}` to {}", item, route)))?
            .push(item);
        Ok(url)
    }

    /// Origin of the document hosting the notification center.
    pub fn origin(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(Error::Url)
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .gzip(true);

    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua.clone());
    }

    builder.build().map_err(Error::Network)
}

/// Error body returned by the notification service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor.
    pub fn new(client: &'a Client, config: &'a HttpConfig) -> Self {
        Self { client, config }
    }

    /// Build a request with the configured headers.
    fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{} {}", method, url);

        self.config
            .headers
            .iter()
            .fold(self.client.request(method, url), |req, (name, value)| {
                req.header(name.as_str(), value.as_str())
            })
    }

    /// Execute a GET request and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.config.resolve_url(route)?;

        let response = self
            .build_request(Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(Error::Network)?;

        match self.handle_response(response).await? {
            Some(value) => serde_json::from_value(value).map_err(Error::Json),
            None => Err(Error::api(204, "No Content", "expected a JSON body")),
        }
    }

    /// Execute a PATCH request with a JSON body.
    ///
    /// Returns the decoded response body, or `None` for empty responses.
    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<Option<serde_json::Value>> {
        let url = self.config.resolve_url(route)?;
        self.patch_json_at(url, body).await
    }

    /// Execute a PATCH request against an already resolved URL.
    pub async fn patch_json_at<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Option<serde_json::Value>> {
        let response = self
            .build_request(Method::PATCH, url)
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;

        self.handle_response(response).await
    }

    /// Map non-success statuses to errors and decode JSON bodies.
    async fn handle_response(&self, response: Response) -> Result<Option<serde_json::Value>> {
        let status = response.status();
        let text = response.text().await.map_err(Error::Network)?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) if !body.error.is_empty() || !body.message.is_empty() => {
                    Error::api(status.as_u16(), body.error, body.message)
                }
                _ => Error::api(status.as_u16(), reason, text),
            });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text).map(Some).map_err(Error::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_endpoint() {
        let config = HttpConfig::default();

        let url = config.resolve_url(routes::COUNT).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/api/v1/micro-lc-notification-center/own/count"
        );
    }

    #[test]
    fn test_resolve_absolute_endpoint() {
        let config = HttpConfig {
            endpoint: "https://example.com/my-notifications/".into(),
            ..HttpConfig::default()
        };

        let url = config.resolve_url(routes::FETCH).unwrap();
        assert_eq!(url.as_str(), "https://example.com/my-notifications/own");
    }

    #[test]
    fn test_resolve_item_url_encodes_segment() {
        let config = HttpConfig::default();

        let url = config.resolve_item_url(routes::SET_READ, "abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/api/v1/micro-lc-notification-center/read-state/abc123"
        );

        let url = config.resolve_item_url(routes::SET_READ, "a/b?c#d").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/api/v1/micro-lc-notification-center/read-state/a%2Fb%3Fc%23d"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_origin() {
        let config = HttpConfig {
            base_url: "http://localhost:8080/some/page".into(),
            ..HttpConfig::default()
        };
        let origin = config.origin().unwrap();
        assert_eq!(origin.host_str(), Some("localhost"));
        assert_eq!(origin.port(), Some(8080));
    }
}
