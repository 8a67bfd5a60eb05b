//! URL sanitization and same-origin trimming.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

lazy_static! {
    static ref CTRL_CHARS_RE: Regex =
        Regex::new(r"[\u0000-\u001F\u007F-\u009F\u2000-\u200D\uFEFF]").unwrap();
    static ref UNSAFE_SCHEME_RE: Regex =
        Regex::new(r"(?i)^[^\w]*(javascript|data|vbscript):").unwrap();
    static ref TARGET_RE: Regex = Regex::new(r"^[\w-]+$").unwrap();
}

/// Default browsing context for links.
pub const DEFAULT_LINK_TARGET: &str = "_self";

/// A resolved anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Href to navigate to; path-relative for trimmed same-origin links.
    pub href: String,
    /// Scheme of the resolved URL, with trailing colon (`http:`).
    pub protocol: String,
    /// Host of the resolved URL, with port when not default.
    pub host: String,
    /// Browsing context name.
    pub target: String,
}

/// Strip invisible characters and reject script-capable schemes.
pub fn sanitize_url(input: &str) -> Result<String> {
    let cleaned = CTRL_CHARS_RE.replace_all(input, "");
    let cleaned = cleaned.trim();

    let compact: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();
    if UNSAFE_SCHEME_RE.is_match(&compact) {
        return Err(Error::UnsafeHref(input.to_owned()));
    }

    Ok(cleaned.to_owned())
}

/// Accept `_self`-style keywords and plain frame names, otherwise `_self`.
pub fn sanitize_target(target: &str) -> String {
    let target = target.trim();
    if TARGET_RE.is_match(target) {
        target.to_owned()
    } else {
        DEFAULT_LINK_TARGET.to_owned()
    }
}

/// Resolve `content` against the document `origin`.
///
/// Same-origin URLs are trimmed to their path, query and fragment unless
/// `allow_external_hrefs` is set. URLs on another origin are only accepted
/// when `allow_external_hrefs` is set.
pub fn resolve_link(
    origin: &Url,
    content: &str,
    allow_external_hrefs: bool,
    target: &str,
) -> Result<Link> {
    let sanitized = sanitize_url(content)?;
    let url = origin.join(&sanitized)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::UnsafeHref(content.to_owned()));
    }

    let same_origin = url.origin() == origin.origin();
    let href = match (same_origin, allow_external_hrefs) {
        (_, true) => url.to_string(),
        (true, false) => path_relative(&url),
        (false, false) => return Err(Error::ExternalHref(url.to_string())),
    };

    Ok(Link {
        href,
        protocol: format!("{}:", url.scheme()),
        host: host_with_port(&url),
        target: sanitize_target(target),
    })
}

fn path_relative(url: &Url) -> String {
    let mut href = url.path().to_owned();
    if let Some(query) = url.query() {
        href.push('?');
        href.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        href.push('#');
        href.push_str(fragment);
    }
    href
}

fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn localhost() -> Url {
        Url::parse("http://localhost").unwrap()
    }

    #[test]
    fn test_trims_same_origin() {
        let link = resolve_link(&localhost(), "http://localhost/link", false, "_self").unwrap();
        assert_eq!(
            link,
            Link {
                href: "/link".into(),
                protocol: "http:".into(),
                host: "localhost".into(),
                target: "_self".into(),
            }
        );
    }

    #[test]
    fn test_relative_content_untouched() {
        let link = resolve_link(&localhost(), "/content?a=1#top", false, "_self").unwrap();
        assert_eq!(link.href, "/content?a=1#top");
        assert_eq!(link.host, "localhost");
    }

    #[test]
    fn test_same_origin_kept_absolute_when_external_allowed() {
        let link = resolve_link(&localhost(), "http://localhost/link", true, "_self").unwrap();
        assert_eq!(link.href, "http://localhost/link");
    }

    #[test]
    fn test_external_allowed() {
        let link = resolve_link(&localhost(), "https://google.com/content", true, "_blank").unwrap();
        assert_eq!(link.href, "https://google.com/content");
        assert_eq!(link.protocol, "https:");
        assert_eq!(link.host, "google.com");
        assert_eq!(link.target, "_blank");
    }

    #[test]
    fn test_external_rejected_by_default() {
        let err = resolve_link(&localhost(), "https://google.com/link", false, "_self").unwrap_err();
        assert!(matches!(err, Error::ExternalHref(href) if href == "https://google.com/link"));
    }

    #[test]
    fn test_port_is_part_of_origin() {
        let origin = Url::parse("http://localhost:3000").unwrap();
        let link = resolve_link(&origin, "http://localhost:3000/a", false, "_self").unwrap();
        assert_eq!(link.href, "/a");
        assert_eq!(link.host, "localhost:3000");

        assert!(resolve_link(&origin, "http://localhost:4000/a", false, "_self").is_err());
    }

    #[test]
    fn test_unsafe_schemes_rejected() {
        for content in [
            "javascript:alert(1)",
            "  JavaScript:alert(1)",
            "java\u{0009}script:alert(1)",
            "data:text/html;base64,PHNjcmlwdD4=",
            "vbscript:msgbox",
        ] {
            let err = resolve_link(&localhost(), content, true, "_self").unwrap_err();
            assert!(matches!(err, Error::UnsafeHref(_)), "{:?}", content);
        }
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = resolve_link(&localhost(), "ftp://localhost/file", true, "_self").unwrap_err();
        assert!(matches!(err, Error::UnsafeHref(_)));
    }

    #[test]
    fn test_sanitize_target() {
        assert_eq!(sanitize_target("_blank"), "_blank");
        assert_eq!(sanitize_target("my-frame"), "my-frame");
        assert_eq!(sanitize_target("javascript:alert(1)"), "_self");
        assert_eq!(sanitize_target(""), "_self");
    }
}
