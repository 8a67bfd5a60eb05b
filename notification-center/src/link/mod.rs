//! Link resolution and click dispatch.

mod navigator;
mod resolve;

pub use navigator::{HistoryEntry, MemoryNavigator, Navigator};
pub use resolve::{resolve_link, sanitize_target, sanitize_url, Link, DEFAULT_LINK_TARGET};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, Result};
use crate::models::ClickContent;

/// Default key under which `push` data is stored in the history state.
pub const DEFAULT_PUSH_STATE_KEY: &str = "micro-lc-notification-center";

/// What happens when a notification with a click target is clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickStrategy {
    /// Follow an anchor.
    #[default]
    Default,
    /// Same as `Default`.
    Href,
    /// Replace the current location.
    Replace,
    /// Push a history entry.
    Push,
}

impl FromStr for ClickStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ClickStrategy::Default),
            "href" => Ok(ClickStrategy::Href),
            "replace" => Ok(ClickStrategy::Replace),
            "push" => Ok(ClickStrategy::Push),
            other => Err(Error::InvalidArgument(format!(
                "unknown click strategy `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for ClickStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClickStrategy::Default => "default",
            ClickStrategy::Href => "href",
            ClickStrategy::Replace => "replace",
            ClickStrategy::Push => "push",
        };
        f.write_str(name)
    }
}

/// Settings governing click dispatch.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Document origin used for relative URLs and same-origin trimming.
    pub origin: Url,
    pub strategy: ClickStrategy,
    pub allow_external_hrefs: bool,
    pub link_target: String,
    pub push_state_key: String,
}

impl LinkOptions {
    /// Options with defaults for the given origin.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            strategy: ClickStrategy::default(),
            allow_external_hrefs: false,
            link_target: DEFAULT_LINK_TARGET.to_owned(),
            push_state_key: DEFAULT_PUSH_STATE_KEY.to_owned(),
        }
    }

    /// Resolve a literal URL with these options.
    pub fn resolve(&self, content: &str) -> Result<Link> {
        resolve_link(
            &self.origin,
            content,
            self.allow_external_hrefs,
            &self.link_target,
        )
    }
}

/// Perform the navigation configured by `options` for `content`.
///
/// Returns the followed anchor for `default`, `href` and `replace`;
/// `push` only mutates the history and returns `None`. Structured content
/// is only honoured by `push`.
pub fn dispatch_click(
    options: &LinkOptions,
    content: &ClickContent,
    navigator: &dyn Navigator,
) -> Result<Option<Link>> {
    if options.strategy == ClickStrategy::Push {
        push(options, content, navigator)?;
        return Ok(None);
    }

    let ClickContent::Url(url) = content else {
        log::debug!("Ignoring structured click content for {} strategy", options.strategy);
        return Ok(None);
    };

    let link = options.resolve(url)?;
    match options.strategy {
        ClickStrategy::Replace => navigator.replace(&link.href),
        _ => navigator.click(&link),
    }

    Ok(Some(link))
}

fn push(options: &LinkOptions, content: &ClickContent, navigator: &dyn Navigator) -> Result<()> {
    let mut state = match navigator.history_state() {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let url = match content {
        ClickContent::Url(url) => Some(url.as_str()),
        ClickContent::Structured { url, data } => {
            if let Some(data) = data {
                state.insert(options.push_state_key.clone(), data.clone());
            }
            url.as_deref()
        }
    };

    let href = url.map(|u| options.resolve(u)).transpose()?.map(|l| l.href);
    navigator.push_state(Value::Object(state), href.as_deref());
    Ok(())
}
