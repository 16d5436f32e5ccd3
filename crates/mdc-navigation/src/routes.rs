//! Section routes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::section::ContentSection;

/// Longest description taken from a section body.
const DESCRIPTION_LIMIT: usize = 150;

/// In-page route to a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionRoute {
    pub section_id: String,
    pub anchor: String,
    pub title: String,
    pub description: String,
}

/// Routes keyed by `#anchor`.
pub type RouteMap = BTreeMap<String, SectionRoute>;

/// Build `#anchor` routes for `sections`.
#[must_use]
pub fn section_routes(sections: &[ContentSection]) -> RouteMap {
    sections
        .iter()
        .map(|section| {
            let route = SectionRoute {
                section_id: section.id.clone(),
                anchor: section.anchor.clone(),
                title: section.title.clone(),
                description: extract_description(&section.content),
            };
            (format!("#{}", section.anchor), route)
        })
        .collect()
}

/// Short description of a section body.
///
/// The first sentence when it is at most 150 characters, otherwise the
/// first 150 characters followed by `...`.
#[must_use]
pub fn extract_description(content: &str) -> String {
    let first = content
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    if !first.is_empty() && first.chars().count() <= DESCRIPTION_LIMIT {
        return first.to_owned();
    }

    match content.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", content[..cut].trim()),
        None => content.trim().to_owned(),
    }
}
