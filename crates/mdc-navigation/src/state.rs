//! Request-scoped navigation builder.
//!
//! Accumulates section routes, known document routes and the link graph over
//! a set of documents, then derives a [`NavigationState`] for a path. Call
//! [`NavigationBuilder::clear`] before rebuilding for a new document set.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::breadcrumbs::{BreadcrumbTrail, Breadcrumbs};
use crate::links::{
    LinkMap, ProcessedLink, is_valid_anchor, is_valid_url, link_id, parent_path,
    resolve_internal_link,
};
use crate::routes::{RouteMap, section_routes};
use crate::section::{ContentSection, CrossReference, LinkKind, ParsedDocument};
use crate::toc::{TableOfContents, build_toc};

/// Everything the presentation layer needs for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub current_path: String,
    /// Fragment of the current path, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_section: Option<String>,
    pub breadcrumbs: BreadcrumbTrail,
    pub toc: TableOfContents,
    pub cross_links: LinkMap,
}

/// Builds navigation data for a set of documents.
///
/// # Example
///
/// ```
/// use mdc_navigation::{NavigationBuilder, SectionExtractor};
///
/// let extractor = SectionExtractor::new();
/// let docs = vec![
///     extractor.extract("/docs/guide", "# Guide\n\nSee [setup](/docs/setup)."),
///     extractor.extract("/docs/setup", "# Setup\n\nSteps."),
/// ];
///
/// let mut builder = NavigationBuilder::new();
/// builder.add_routes(docs.iter().map(|d| d.source.clone()));
/// let state = builder.navigation_context("/docs/guide#guide", &docs);
///
/// assert_eq!(state.current_section.as_deref(), Some("guide"));
/// assert_eq!(state.cross_links["/docs/setup"].incoming.len(), 1);
/// assert!(state.cross_links["/docs/guide"].outgoing[0].resolved);
/// ```
#[derive(Debug, Default)]
pub struct NavigationBuilder {
    breadcrumbs: Breadcrumbs,
    routes: RouteMap,
    known_routes: BTreeSet<String>,
    links: LinkMap,
}

impl NavigationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific breadcrumb root.
    #[must_use]
    pub fn with_breadcrumbs(mut self, breadcrumbs: Breadcrumbs) -> Self {
        self.breadcrumbs = breadcrumbs;
        self
    }

    /// Register document routes that internal links may point to.
    pub fn add_routes<I, S>(&mut self, routes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_routes.extend(routes.into_iter().map(Into::into));
    }

    /// Register `#anchor` routes for `sections` and return them.
    pub fn create_section_routes(&mut self, sections: &[ContentSection]) -> RouteMap {
        let routes = section_routes(sections);
        self.routes
            .extend(routes.iter().map(|(k, v)| (k.clone(), v.clone())));
        routes
    }

    /// Section routes registered so far.
    #[must_use]
    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    /// Resolve `references` and add them to the link graph.
    ///
    /// Every link is added to its source's outgoing list. Internal links are
    /// added to the target's incoming list and anchor links to the source's
    /// own incoming list; external links have no incoming side. Returns the
    /// graph for this batch only.
    pub fn build_cross_links(&mut self, references: &[CrossReference]) -> LinkMap {
        let mut batch = LinkMap::new();

        for reference in references {
            let link = self.process(reference);
            if !link.resolved {
                tracing::debug!(
                    source = %link.source,
                    target = %link.target,
                    kind = %link.kind,
                    "Unresolved link"
                );
            }

            let incoming_key = match reference.kind {
                LinkKind::Anchor => Some(reference.source.clone()),
                LinkKind::Internal => Some(
                    link.href
                        .clone()
                        .unwrap_or_else(|| reference.target.clone()),
                ),
                LinkKind::External => None,
            };

            batch
                .entry(reference.source.clone())
                .or_default()
                .outgoing
                .push(link.clone());
            if let Some(key) = incoming_key {
                batch.entry(key).or_default().incoming.push(link);
            }
        }

        for (key, entry) in &batch {
            let accumulated = self.links.entry(key.clone()).or_default();
            accumulated.outgoing.extend(entry.outgoing.iter().cloned());
            accumulated.incoming.extend(entry.incoming.iter().cloned());
        }

        tracing::debug!(
            references = references.len(),
            documents = batch.len(),
            "Built cross links"
        );
        batch
    }

    /// Link graph accumulated so far.
    #[must_use]
    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Check whether `target` resolves for its kind.
    ///
    /// Internal targets resolve when they equal or are contained in a known
    /// document route or section route.
    #[must_use]
    pub fn validate_link(&self, target: &str, kind: LinkKind) -> bool {
        match kind {
            LinkKind::Anchor => is_valid_anchor(target),
            LinkKind::Internal => self.route_exists(target),
            LinkKind::External => is_valid_url(target),
        }
    }

    /// Derive the breadcrumb trail for `path`.
    #[must_use]
    pub fn derive_breadcrumbs(&self, path: &str) -> BreadcrumbTrail {
        self.breadcrumbs.derive(path)
    }

    /// Navigation state for `current_path` over `documents`, using the link
    /// graph accumulated so far.
    #[must_use]
    pub fn navigation_state(
        &self,
        current_path: &str,
        documents: &[ParsedDocument],
    ) -> NavigationState {
        let current_section = current_path
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_owned);

        NavigationState {
            current_path: current_path.to_owned(),
            current_section,
            breadcrumbs: self.derive_breadcrumbs(current_path),
            toc: build_toc(documents),
            cross_links: self.links.clone(),
        }
    }

    /// Rebuild section routes and links from `documents`, then compute the
    /// state.
    ///
    /// Section routes and links from earlier calls are dropped first, so
    /// repeated calls give the same state. Document routes registered with
    /// [`add_routes`](Self::add_routes) are kept; document sources are not
    /// registered automatically.
    pub fn navigation_context(
        &mut self,
        current_path: &str,
        documents: &[ParsedDocument],
    ) -> NavigationState {
        self.routes.clear();
        self.links.clear();
        for document in documents {
            self.create_section_routes(&document.sections);
        }
        for document in documents {
            self.build_cross_links(&document.references);
        }
        self.navigation_state(current_path, documents)
    }

    /// Forget all routes and links.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.known_routes.clear();
        self.links.clear();
    }

    fn process(&self, reference: &CrossReference) -> ProcessedLink {
        let base = parent_path(&reference.source);
        let (resolved, href) = match reference.kind {
            LinkKind::Anchor | LinkKind::External => {
                let ok = self.validate_link(&reference.target, reference.kind);
                (ok, ok.then(|| reference.target.clone()))
            }
            LinkKind::Internal => {
                let href = resolve_internal_link(&reference.target, base);
                let ok = self.route_exists(&reference.target) || self.route_exists(&href);
                (ok, ok.then_some(href))
            }
        };

        ProcessedLink {
            id: link_id(&reference.source, &reference.target, reference.kind),
            source: reference.source.clone(),
            target: reference.target.clone(),
            kind: reference.kind,
            text: reference.text.clone(),
            resolved,
            href,
        }
    }

    fn route_exists(&self, target: &str) -> bool {
        if target.is_empty() {
            return false;
        }
        self.known_routes
            .iter()
            .chain(self.routes.keys())
            .any(|route| route == target || route.contains(target))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::section::SectionExtractor;

    fn reference(source: &str, target: &str) -> CrossReference {
        CrossReference::new(source, target, "text")
    }

    #[test]
    fn test_cross_links_by_kind() {
        let mut builder = NavigationBuilder::new();
        let links = builder.build_cross_links(&[
            reference("page1.md", "#introduction"),
            reference("page1.md", "/docs/guide"),
            reference("page1.md", "https://example.com"),
        ]);

        let entry = &links["page1.md"];
        assert_eq!(entry.outgoing.len(), 3);

        let anchor = entry
            .outgoing
            .iter()
            .find(|l| l.kind == LinkKind::Anchor)
            .unwrap();
        assert_eq!(anchor.target, "#introduction");
        assert!(anchor.resolved);
        assert_eq!(anchor.href.as_deref(), Some("#introduction"));

        // Anchor links point back into their own document
        assert_eq!(entry.incoming.len(), 1);
        assert_eq!(entry.incoming[0].kind, LinkKind::Anchor);

        // No known routes, so the internal link stays unresolved
        let internal = entry
            .outgoing
            .iter()
            .find(|l| l.kind == LinkKind::Internal)
            .unwrap();
        assert!(!internal.resolved);
        assert_eq!(internal.href, None);
        assert_eq!(links["/docs/guide"].incoming.len(), 1);

        let external = entry
            .outgoing
            .iter()
            .find(|l| l.kind == LinkKind::External)
            .unwrap();
        assert!(external.resolved);
        assert!(!links.contains_key("https://example.com"));
    }

    #[test]
    fn test_internal_link_resolves_against_routes() {
        let mut builder = NavigationBuilder::new();
        builder.add_routes(["/docs/guide/setup"]);

        let links = builder.build_cross_links(&[
            reference("/docs/guide/intro", "./setup"),
            reference("/docs/guide/intro", "guide/setup"),
            reference("/docs/guide/intro", "../missing"),
        ]);

        let outgoing = &links["/docs/guide/intro"].outgoing;
        assert_eq!(outgoing[0].href.as_deref(), Some("/docs/guide/setup"));
        assert_eq!(outgoing[1].href.as_deref(), Some("/docs/guide/setup"));
        assert!(!outgoing[2].resolved);
        assert_eq!(links["/docs/guide/setup"].incoming.len(), 2);
    }

    #[test]
    fn test_section_routes_resolve_substring_targets() {
        let mut builder = NavigationBuilder::new();
        let doc = SectionExtractor::new().extract("a", "# Getting Started\n\nHello.");
        builder.create_section_routes(&doc.sections);

        assert!(builder.validate_link("#getting-started", LinkKind::Internal));
        assert!(builder.validate_link("getting", LinkKind::Internal));
        assert!(!builder.validate_link("", LinkKind::Internal));
        assert!(!builder.validate_link("missing", LinkKind::Internal));
    }

    #[test]
    fn test_validate_link() {
        let builder = NavigationBuilder::new();
        assert!(builder.validate_link("#valid-anchor", LinkKind::Anchor));
        assert!(!builder.validate_link("#", LinkKind::Anchor));
        assert!(!builder.validate_link("invalid", LinkKind::Anchor));
        assert!(builder.validate_link("https://example.com", LinkKind::External));
        assert!(!builder.validate_link("invalid-url", LinkKind::External));
    }

    #[test]
    fn test_link_map_accumulates() {
        let mut builder = NavigationBuilder::new();
        builder.build_cross_links(&[reference("a", "#x")]);
        builder.build_cross_links(&[reference("a", "#y")]);

        assert_eq!(builder.links()["a"].outgoing.len(), 2);

        builder.clear();
        assert!(builder.links().is_empty());
        assert!(builder.routes().is_empty());
    }

    #[test]
    fn test_navigation_state() {
        let extractor = SectionExtractor::new();
        let docs = vec![extractor.extract("/docs/guide", "# Guide\n\n## Install\n\n## Usage")];

        let mut builder = NavigationBuilder::new();
        let state = builder.navigation_context("/docs/guide#install", &docs);

        assert_eq!(state.current_path, "/docs/guide#install");
        assert_eq!(state.current_section.as_deref(), Some("install"));
        assert_eq!(state.breadcrumbs.current.title, "Guide");
        assert_eq!(state.toc.sections.len(), 1);
        assert_eq!(state.toc.sections[0].children.len(), 2);
        assert_eq!(builder.routes().len(), 3);
    }

    #[test]
    fn test_navigation_context_rebuilds() {
        let extractor = SectionExtractor::new();
        let docs = vec![
            extractor.extract("/docs/a", "# A\n\nSee [b](/docs/b) and [top](#a)."),
            extractor.extract("/docs/b", "# B"),
        ];

        let mut builder = NavigationBuilder::new();
        builder.add_routes(["/docs/a", "/docs/b"]);
        let first = builder.navigation_context("/docs/a", &docs);
        let second = builder.navigation_context("/docs/a", &docs);

        assert_eq!(first.cross_links, second.cross_links);
        assert_eq!(second.cross_links["/docs/a"].outgoing.len(), 2);
        assert!(second.cross_links["/docs/a"].outgoing[0].resolved);
        assert_eq!(builder.routes().len(), 2);
    }

    #[test]
    fn test_navigation_state_without_fragment() {
        let builder = NavigationBuilder::new();
        let state = builder.navigation_state("/docs/guide#", &[]);
        assert_eq!(state.current_section, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let builder = NavigationBuilder::new();
        let json = serde_json::to_value(builder.navigation_state("/docs", &[])).unwrap();
        assert_eq!(json["currentPath"], "/docs");
        assert!(json.get("currentSection").is_none());
        assert!(json["crossLinks"].as_object().unwrap().is_empty());
    }
}
