//! Dual-shape text fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::i18n::translate;

/// A text field that is either a plain string or a map from language tag
/// to translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedString {
    /// Build a language map from `(tag, text)` pairs.
    pub fn localized<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LocalizedString::Localized(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Resolve to a single display string for `lang`.
    ///
    /// Plain strings are returned as is; language maps go through
    /// [`translate`], so a missing language yields an empty string.
    pub fn resolve(&self, lang: &str) -> String {
        match self {
            LocalizedString::Plain(s) => s.clone(),
            LocalizedString::Localized(options) => translate(options, lang),
        }
    }
}

impl From<&str> for LocalizedString {
    fn from(s: &str) -> Self {
        LocalizedString::Plain(s.to_owned())
    }
}

impl From<String> for LocalizedString {
    fn from(s: String) -> Self {
        LocalizedString::Plain(s)
    }
}
