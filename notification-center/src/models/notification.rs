//! Notification models.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{CreatorId, LocalizedString, NotificationId};

/// Target of a notification click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClickContent {
    /// A literal URL.
    Url(String),
    /// History payload, only meaningful for the `push` click strategy.
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
}

impl ClickContent {
    /// The URL carried by this content, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            ClickContent::Url(url) => Some(url),
            ClickContent::Structured { url, .. } => url.as_deref(),
        }
    }
}

/// Click-target descriptor attached to a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickCallback {
    /// Callback kind, usually `href`.
    #[serde(default)]
    pub kind: String,
    pub content: ClickContent,
}

/// A notification as served by the backend, before localization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotification {
    #[serde(rename = "_id")]
    pub id: NotificationId,
    #[serde(default)]
    pub creator_id: CreatorId,
    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click_callback: Option<ClickCallback>,
}

impl RawNotification {
    /// Resolve title and content for `lang`.
    pub fn localize(self, lang: &str) -> Notification {
        Notification {
            id: self.id,
            creator_id: self.creator_id,
            created_at: self.created_at,
            title: self.title.map(|t| t.resolve(lang)).unwrap_or_default(),
            content: self.content.map(|c| c.resolve(lang)),
            read_state: self.read_state.unwrap_or(false),
            on_click_callback: self.on_click_callback,
        }
    }
}

/// A notification ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: NotificationId,
    pub creator_id: CreatorId,
    pub created_at: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub read_state: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click_callback: Option<ClickCallback>,
}

impl Notification {
    /// Parsed creation time, if the timestamp is valid RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }

    /// Check whether the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read_state
    }
}

/// Aggregate counters for the current user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Total notifications.
    pub count: u64,
    /// Unread notifications.
    pub unread: u64,
}

/// Pagination cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Offset of the next page.
    pub skip: usize,
    /// Offset most recently requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_wire_notification() {
        let raw: RawNotification = serde_json::from_str(
            r#"{
                "_id": "n1",
                "creatorId": "c1",
                "createdAt": "2024-03-01T10:00:00.000Z",
                "title": {"en": "Hello", "it": "Ciao"},
                "content": "body",
                "onClickCallback": {"kind": "href", "content": "http://localhost/link"}
            }"#,
        )
        .unwrap();

        assert_eq!(raw.id.as_str(), "n1");
        assert_eq!(raw.read_state, None);
        assert_eq!(
            raw.on_click_callback.as_ref().unwrap().content,
            ClickContent::Url("http://localhost/link".into())
        );

        let view = raw.localize("it-IT");
        assert_eq!(view.title, "Ciao");
        assert_eq!(view.content.as_deref(), Some("body"));
        assert!(view.is_unread());
        assert!(view.created_at().is_some());
    }

    #[test]
    fn test_structured_click_content() {
        let callback: ClickCallback = serde_json::from_str(
            r#"{"kind": "push", "content": {"url": "/route", "data": {"id": 3}}}"#,
        )
        .unwrap();

        match &callback.content {
            ClickContent::Structured { url, data } => {
                assert_eq!(url.as_deref(), Some("/route"));
                assert_eq!(data.as_ref().unwrap()["id"], 3);
            }
            other => panic!("unexpected content: {:?}", other),
        }
        assert_eq!(callback.content.url(), Some("/route"));
    }

    #[test]
    fn test_missing_title_localizes_to_empty() {
        let raw: RawNotification = serde_json::from_str(r#"{"_id": "n2"}"#).unwrap();
        let view = raw.localize("en");
        assert_eq!(view.title, "");
        assert_eq!(view.content, None);
    }
}
