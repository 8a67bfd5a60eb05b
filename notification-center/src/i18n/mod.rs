//! Language resolution for notification fields and widget labels.

mod labels;

pub use labels::{LabelKey, Labels, Translations};

use std::collections::BTreeMap;
use std::env;

/// Language used when the environment reports none.
pub const DEFAULT_LANG: &str = "en";

/// Pick the translation for `lang` out of `options`.
///
/// Tries the exact tag first, then the two-letter primary subtag
/// (`it-IT` → `it`). Returns an empty string when neither is present.
pub fn translate(options: &BTreeMap<String, String>, lang: &str) -> String {
    if let Some(text) = options.get(lang).filter(|s| !s.is_empty()) {
        return text.clone();
    }

    primary_subtag(lang)
        .and_then(|short| options.get(short))
        .cloned()
        .unwrap_or_default()
}

fn primary_subtag(lang: &str) -> Option<&str> {
    lang.get(..2)
}

/// The preferred language reported by the process environment.
///
/// Reads `LC_ALL`, `LC_MESSAGES` and `LANG` in that order and normalizes
/// POSIX locale names (`it_IT.UTF-8`) to language tags (`it-IT`).
/// Falls back to [`DEFAULT_LANG`].
pub fn preferred_language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find_map(|value| normalize_locale(&value))
        .unwrap_or_else(|| DEFAULT_LANG.to_owned())
}

/// Convert a POSIX locale name into a language tag.
///
/// Returns `None` for empty values and the `C`/`POSIX` locales.
pub fn normalize_locale(value: &str) -> Option<String> {
    let base = value
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }

    Some(base.replace('_', "-"))
}
