//! Cross-link graph.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::section::LinkKind;

/// Link with its resolution outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessedLink {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub text: String,
    pub resolved: bool,
    /// Present only for resolved links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Outgoing and incoming links of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub outgoing: Vec<ProcessedLink>,
    pub incoming: Vec<ProcessedLink>,
}

/// Link graph keyed by document id.
pub type LinkMap = BTreeMap<String, LinkEntry>;

/// Stable link id: `<source>-<target>-<kind>` with every character outside
/// `[A-Za-z0-9-]` replaced by `-`.
#[must_use]
pub fn link_id(source: &str, target: &str, kind: LinkKind) -> String {
    format!("{source}-{target}-{kind}")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

/// Resolve an internal link target to an absolute href.
///
/// - `#anchor` and `/absolute` targets are returned unchanged
/// - `./` and `../` targets are resolved against `base_path`
/// - anything else is taken relative to `/docs`
///
/// # Example
///
/// ```
/// use mdc_navigation::resolve_internal_link;
///
/// assert_eq!(resolve_internal_link("../api", "/docs/guide"), "/docs/api");
/// assert_eq!(resolve_internal_link("setup", ""), "/docs/setup");
/// ```
#[must_use]
pub fn resolve_internal_link(target: &str, base_path: &str) -> String {
    if target.starts_with('#') || target.starts_with('/') {
        return target.to_owned();
    }
    if target.starts_with("./") || target.starts_with("../") {
        return resolve_relative_path(target, base_path);
    }
    format!("/docs/{target}")
}

/// Apply `.`/`..` segments of `target` to the segments of `base_path`.
///
/// `..` above the root stays at the root.
#[must_use]
pub fn resolve_relative_path(target: &str, base_path: &str) -> String {
    let mut segments: Vec<&str> = base_path.split('/').filter(|s| !s.is_empty()).collect();

    for segment in target.split('/').filter(|s| !s.is_empty()) {
        match segment {
            "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Directory part of a document path, used as the base for relative links.
///
/// Paths that are not absolute have no base.
#[must_use]
pub fn parent_path(path: &str) -> &str {
    if !path.starts_with('/') {
        return "";
    }
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Valid anchor target: `#` followed by at least one character.
#[must_use]
pub fn is_valid_anchor(target: &str) -> bool {
    target.len() > 1 && target.starts_with('#')
}

/// Valid external target: parses as an absolute URL.
#[must_use]
pub fn is_valid_url(target: &str) -> bool {
    Url::parse(target).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id() {
        assert_eq!(
            link_id("page1.md", "#introduction", LinkKind::Anchor),
            "page1-md--introduction-anchor"
        );
        assert_eq!(
            link_id("/docs/a", "https://x.io/p?q=1", LinkKind::External),
            "-docs-a-https---x-io-p-q-1-external"
        );
    }

    #[test]
    fn test_resolve_internal_link() {
        assert_eq!(resolve_internal_link("#intro", "/docs/guide"), "#intro");
        assert_eq!(resolve_internal_link("/docs/api", "/docs/guide"), "/docs/api");
        assert_eq!(resolve_internal_link("./setup", "/docs/guide"), "/docs/guide/setup");
        assert_eq!(resolve_internal_link("../api", "/docs/guide"), "/docs/api");
        assert_eq!(resolve_internal_link("getting-started", "/x"), "/docs/getting-started");
    }

    #[test]
    fn test_resolve_relative_above_root() {
        assert_eq!(resolve_relative_path("../../../a", "/docs"), "/a");
        assert_eq!(resolve_relative_path("./", ""), "/");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/docs/guide/setup"), "/docs/guide");
        assert_eq!(parent_path("/docs"), "");
        assert_eq!(parent_path("page1.md"), "");
    }

    #[test]
    fn test_anchor_validation() {
        assert!(is_valid_anchor("#valid-anchor"));
        assert!(!is_valid_anchor("#"));
        assert!(!is_valid_anchor("invalid"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("invalid-url"));
        assert!(!is_valid_url("/docs/relative"));
    }
}
