//! Notification center configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::client::{
    HttpConfig, NotificationClient, DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_PAGINATION_LIMIT,
};
use crate::error::{Error, Result};
use crate::i18n::{preferred_language, Labels, Translations};
use crate::link::{ClickStrategy, LinkOptions, DEFAULT_LINK_TARGET, DEFAULT_PUSH_STATE_KEY};

/// How notifications are refreshed after the first load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Load on first mount only; the user drives further loads.
    #[default]
    Once,
    /// Periodically refresh the visible window.
    Polling,
}

/// Everything a host can configure on a notification center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationCenterConfig {
    /// Notification service endpoint, absolute or relative to `base_url`.
    pub endpoint: String,
    /// Document origin.
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    /// Page size.
    pub limit: usize,
    pub skip_query_param: String,
    pub limit_query_param: String,
    pub click_strategy: ClickStrategy,
    pub allow_external_hrefs: bool,
    pub link_target: String,
    pub push_state_key: String,
    /// Label overrides.
    pub locales: Translations,
    pub mode: FetchMode,
    pub polling_frequency_ms: u64,
    pub request_timeout_ms: u64,
    /// Preferred language; the environment's when unset.
    pub lang: Option<String>,
}

impl Default for NotificationCenterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            headers: BTreeMap::new(),
            limit: DEFAULT_PAGINATION_LIMIT,
            skip_query_param: "skip".to_owned(),
            limit_query_param: "limit".to_owned(),
            click_strategy: ClickStrategy::default(),
            allow_external_hrefs: false,
            link_target: DEFAULT_LINK_TARGET.to_owned(),
            push_state_key: DEFAULT_PUSH_STATE_KEY.to_owned(),
            locales: Translations::new(),
            mode: FetchMode::default(),
            polling_frequency_ms: 10_000,
            request_timeout_ms: 20_000,
            lang: None,
        }
    }
}

impl NotificationCenterConfig {
    /// Language used for localization and the `lang` query parameter.
    pub fn language(&self) -> String {
        self.lang
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(preferred_language)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn polling_frequency(&self) -> Duration {
        Duration::from_millis(self.polling_frequency_ms)
    }

    /// HTTP settings derived from this configuration.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            endpoint: self.endpoint.clone(),
            headers: self.headers.clone(),
            limit: self.limit,
            skip_query_param: self.skip_query_param.clone(),
            limit_query_param: self.limit_query_param.clone(),
            read_timeout: self.request_timeout(),
            ..HttpConfig::default()
        }
    }

    /// Build an HTTP client for this configuration.
    pub fn build_client(&self) -> Result<NotificationClient> {
        let http = self.http_config();
        NotificationClient::builder()
            .base_url(http.base_url)
            .endpoint(http.endpoint)
            .headers(http.headers)
            .limit(http.limit)
            .query_params(http.skip_query_param, http.limit_query_param)
            .read_timeout(http.read_timeout)
            .build()
    }

    /// Click dispatch settings.
    pub fn link_options(&self) -> Result<LinkOptions> {
        Ok(LinkOptions {
            origin: self.http_config().origin()?,
            strategy: self.click_strategy,
            allow_external_hrefs: self.allow_external_hrefs,
            link_target: self.link_target.clone(),
            push_state_key: self.push_state_key.clone(),
        })
    }

    /// Labels resolved for the configured language.
    pub fn labels(&self) -> Labels {
        Labels::resolve(&self.locales, &self.language())
    }

    /// Reject values the notification center cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidArgument(
                "pagination limit must be at least 1".into(),
            ));
        }
        if self.mode == FetchMode::Polling && self.polling_frequency_ms == 0 {
            return Err(Error::InvalidArgument(
                "polling frequency must be at least 1 ms".into(),
            ));
        }
        Ok(())
    }
}
