//! Widget labels with built-in defaults and user overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::LocalizedString;

/// Keys of the labels shown by the notification center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelKey {
    Title,
    LoadingButton,
    DateFormat,
    NoNotification,
    ErrorMessage,
    ReadAll,
    Reload,
    BackOnTop,
}

impl LabelKey {
    /// All label keys.
    pub const ALL: [LabelKey; 8] = [
        LabelKey::Title,
        LabelKey::LoadingButton,
        LabelKey::DateFormat,
        LabelKey::NoNotification,
        LabelKey::ErrorMessage,
        LabelKey::ReadAll,
        LabelKey::Reload,
        LabelKey::BackOnTop,
    ];

    /// Built-in label text.
    pub fn default_text(&self) -> &'static str {
        match self {
            LabelKey::Title => "Notifications",
            LabelKey::LoadingButton => "Load More",
            LabelKey::DateFormat => "YYYY-MM-DD",
            LabelKey::NoNotification => "No notification to show",
            LabelKey::ErrorMessage => "An error occurred, try again",
            LabelKey::ReadAll => "Mark all as read",
            LabelKey::Reload => "Reload",
            LabelKey::BackOnTop => "Back on top",
        }
    }
}

/// User supplied label overrides, each either plain or per language.
pub type Translations = BTreeMap<LabelKey, LocalizedString>;

/// Resolved labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels(BTreeMap<LabelKey, String>);

impl Default for Labels {
    fn default() -> Self {
        Labels(
            LabelKey::ALL
                .iter()
                .map(|key| (*key, key.default_text().to_owned()))
                .collect(),
        )
    }
}

impl Labels {
    /// Layer `overrides` resolved for `lang` over the default labels.
    ///
    /// An override that resolves to an empty string keeps the default.
    pub fn resolve(overrides: &Translations, lang: &str) -> Self {
        let mut labels = Labels::default();
        for (key, value) in overrides {
            let text = value.resolve(lang);
            if !text.is_empty() {
                labels.0.insert(*key, text);
            }
        }
        labels
    }

    /// Get the text of a label.
    pub fn get(&self, key: LabelKey) -> &str {
        self.0
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_text())
    }
}
