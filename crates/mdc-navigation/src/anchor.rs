//! Heading anchors.

use std::collections::HashSet;

use serde::Serialize;

/// Scroll target for a heading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorLink {
    pub id: String,
    pub text: String,
    /// `#<anchor>`.
    pub href: String,
    pub level: u8,
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Anchor link for a heading: id `anchor-<slug>`, href `#<slug>`.
#[must_use]
pub fn create_anchor_link(text: &str, level: u8) -> AnchorLink {
    let anchor = slugify(text);
    AnchorLink {
        id: format!("anchor-{anchor}"),
        text: text.to_owned(),
        href: format!("#{anchor}"),
        level,
    }
}

/// Check an anchor id: an ASCII letter followed by letters, digits, `-` or `_`.
#[must_use]
pub fn is_valid_anchor_id(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Rewrite `id` so that [`is_valid_anchor_id`] accepts it.
///
/// Leading non-letters are dropped (an id with no letters becomes
/// `heading`), other invalid characters become dashes, and dash runs
/// collapse.
#[must_use]
pub fn sanitize_anchor_id(id: &str) -> String {
    let trimmed = id.trim_start_matches(|c: char| !c.is_ascii_alphabetic());
    if trimmed.is_empty() {
        return "heading".to_owned();
    }

    let mut result = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' };
        if c == '-' && result.ends_with('-') {
            continue;
        }
        result.push(c);
    }
    while result.ends_with('-') {
        result.pop();
    }
    result
}

/// Id of the heading nearest to `position`; ties keep the earlier heading.
#[must_use]
pub fn closest_heading<'a>(position: usize, headings: &[(&'a str, usize)]) -> Option<&'a str> {
    headings
        .iter()
        .min_by_key(|(_, at)| at.abs_diff(position))
        .map(|(id, _)| *id)
}

/// Generates anchors that are unique within one document.
///
/// Repeated slugs get `-1`, `-2`, ... suffixes. Ids registered up front
/// with [`reserve`](Self::reserve) are never handed out.
#[derive(Debug, Default)]
pub struct UniqueAnchors {
    used: HashSet<String>,
}

impl UniqueAnchors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an id as taken.
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.used.insert(id.into());
    }

    /// Generate a unique anchor for `text`.
    pub fn generate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut id = base.clone();
        let mut counter = 1;
        while self.used.contains(&id) {
            id = format!("{base}-{counter}");
            counter += 1;
        }
        self.used.insert(id.clone());
        id
    }
}
