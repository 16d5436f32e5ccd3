//! Document set composition.
//!
//! Combines front matter, component rendering and navigation over a set of
//! `(path, raw text)` pairs.

use std::sync::{Arc, RwLock};

use mdc_components::{
    ComponentParser, ComponentRegistry, ComponentRenderer, RenderOutput, ValidationResult,
};
use mdc_config::{ComponentsConfig, Config};
use mdc_navigation::{
    Breadcrumbs, NavigationBuilder, NavigationState, ParsedDocument, SectionExtractor,
};
use serde::Serialize;

use crate::frontmatter::{
    FrontMatter, split_front_matter, strip_front_matter, validate_front_matter,
};

/// Registry shared between document sets.
///
/// Rendering only takes the read lock.
pub type SharedRegistry = Arc<RwLock<ComponentRegistry>>;

/// Build a registry according to `config`.
#[must_use]
pub fn build_registry(config: &ComponentsConfig) -> ComponentRegistry {
    if config.builtins {
        ComponentRegistry::with_builtins()
    } else {
        ComponentRegistry::new()
    }
}

/// Build a shareable registry according to `config`.
#[must_use]
pub fn shared_registry(config: &ComponentsConfig) -> SharedRegistry {
    Arc::new(RwLock::new(build_registry(config)))
}

/// Error type for document set operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A writer panicked while holding the registry lock.
    #[error("Component registry lock poisoned")]
    RegistryPoisoned,
}

/// One processed document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// URL path, also the document's route and link source.
    pub path: String,
    pub front_matter: FrontMatter,
    /// Front matter validation outcome.
    pub validation: ValidationResult,
    /// Body with components replaced by placeholders.
    pub output: RenderOutput,
}

impl Document {
    /// Title from front matter.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.front_matter.title()
    }
}

/// Documents processed together with their navigation data.
#[derive(Debug)]
pub struct DocumentSet {
    documents: Vec<Document>,
    parsed: Vec<ParsedDocument>,
    navigation: NavigationBuilder,
    placeholder_prefix: String,
}

impl DocumentSet {
    /// Process `sources` as `(path, raw text)` pairs.
    ///
    /// Each document's front matter is split off and validated, its body
    /// rendered against `registry` and its sections and links extracted.
    /// All paths are registered as routes before links are resolved.
    /// Malformed front matter is reported in the document's validation
    /// result and does not stop the build.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::RegistryPoisoned` if the registry lock is poisoned.
    pub fn build<I, P, S>(
        config: &Config,
        registry: &SharedRegistry,
        sources: I,
    ) -> Result<Self, SiteError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: AsRef<str>,
    {
        let registry = registry.read().map_err(|_| SiteError::RegistryPoisoned)?;
        let renderer = ComponentRenderer::new(&registry)
            .with_parser(ComponentParser::new().with_strict_blocks(config.components.strict_blocks))
            .with_placeholder_prefix(config.components.placeholder_prefix.clone());
        let extractor =
            SectionExtractor::new().with_words_per_minute(config.navigation.words_per_minute);

        let mut documents = Vec::new();
        let mut parsed = Vec::new();
        for (path, raw) in sources {
            let path: String = path.into();
            let raw = raw.as_ref();

            let (front_matter, body, validation) = match split_front_matter(raw) {
                Ok((front_matter, body)) => {
                    let validation =
                        validate_front_matter(&front_matter, &config.frontmatter.visibility);
                    (front_matter, body, validation)
                }
                Err(e) => {
                    let mut validation = ValidationResult::new();
                    validation.error(e.to_string());
                    (FrontMatter::default(), strip_front_matter(raw), validation)
                }
            };
            if !validation.is_valid {
                tracing::warn!(path = %path, errors = ?validation.errors, "Invalid front matter");
            }

            let output = renderer.render(body);
            parsed.push(extractor.extract(&path, body));
            documents.push(Document {
                path,
                front_matter,
                validation,
                output,
            });
        }

        let mut navigation = NavigationBuilder::new().with_breadcrumbs(Breadcrumbs::new(
            config.navigation.root_title.clone(),
            config.navigation.root_href.clone(),
        ));
        navigation.add_routes(documents.iter().map(|d| d.path.clone()));
        for document in &parsed {
            navigation.create_section_routes(&document.sections);
        }
        for document in &parsed {
            navigation.build_cross_links(&document.references);
        }

        tracing::info!(
            documents = documents.len(),
            section_routes = navigation.routes().len(),
            "Built document set"
        );

        Ok(Self {
            documents,
            parsed,
            navigation,
            placeholder_prefix: config.components.placeholder_prefix.clone(),
        })
    }

    /// Documents in input order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Sections and references of each document, in input order.
    #[must_use]
    pub fn parsed(&self) -> &[ParsedDocument] {
        &self.parsed
    }

    /// Look up a document by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.path == path)
    }

    /// Body of the document at `path` with placeholders replaced by
    /// component output.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<String> {
        let output = &self.get(path)?.output;
        Some(
            output
                .replacements(&self.placeholder_prefix)
                .apply(&output.content),
        )
    }

    /// Navigation state for `path`, which may carry a `#fragment`.
    #[must_use]
    pub fn navigation_state(&self, path: &str) -> NavigationState {
        self.navigation.navigation_state(path, &self.parsed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const GUIDE: &str = "---\n\
title: Guide\n\
tags: [intro]\n\
---\n\
# Guide\n\
\n\
Read this first. See [setup](./setup) and [missing](/docs/missing).\n\
\n\
<Alert type=\"warning\" title=\"Heads up\" />\n\
\n\
## Details\n\
\n\
More text [below](#details).\n";

    const SETUP: &str = "---\n\
title: Setup\n\
---\n\
# Setup\n\
\n\
<Card>Missing title</Card>\n";

    fn build(config: &Config, sources: &[(&str, &str)]) -> DocumentSet {
        let registry = shared_registry(&config.components);
        DocumentSet::build(config, &registry, sources.iter().copied()).unwrap()
    }

    fn sample() -> DocumentSet {
        build(
            &Config::default(),
            &[("/docs/guide", GUIDE), ("/docs/setup", SETUP)],
        )
    }

    #[test]
    fn test_build_documents() {
        let set = sample();

        assert_eq!(set.len(), 2);
        let guide = set.get("/docs/guide").unwrap();
        assert_eq!(guide.title(), Some("Guide"));
        assert!(guide.validation.is_valid);
        assert_eq!(guide.output.components.len(), 1);
        assert!(guide.output.content.contains("__COMPONENT_0_Alert__"));
    }

    #[test]
    fn test_component_errors_stay_in_document() {
        let set = sample();
        let setup = set.get("/docs/setup").unwrap();

        assert!(!setup.output.components[0].is_valid);
        assert!(setup.output.content.contains("Component Error: Card"));
        assert_eq!(
            setup.output.errors,
            vec![r#"Required prop "title" is missing for component "Card""#]
        );
    }

    #[test]
    fn test_content_substitutes_placeholders() {
        let set = sample();
        let content = set.content("/docs/guide").unwrap();

        assert!(content.contains(r#"<div class="alert alert-warning" role="alert">"#));
        assert!(!content.contains("__COMPONENT_"));
        assert!(set.content("/docs/nope").is_none());
    }

    #[test]
    fn test_navigation_state() {
        let set = sample();
        let state = set.navigation_state("/docs/guide#details");

        assert_eq!(state.current_section.as_deref(), Some("details"));
        assert_eq!(state.breadcrumbs.current.title, "Guide");
        assert_eq!(state.toc.sections.len(), 2);

        let outgoing = &state.cross_links["/docs/guide"].outgoing;
        let resolved: Vec<_> = outgoing
            .iter()
            .map(|l| (l.target.as_str(), l.resolved))
            .collect();
        assert_eq!(
            resolved,
            vec![("./setup", true), ("/docs/missing", false), ("#details", true)]
        );
        assert_eq!(state.cross_links["/docs/setup"].incoming.len(), 1);
    }

    #[test]
    fn test_invalid_front_matter_kept() {
        let set = build(
            &Config::default(),
            &[
                ("/docs/a", "# No front matter\n"),
                ("/docs/b", "---\ntitle: [oops\n---\n# B\n"),
            ],
        );

        let a = set.get("/docs/a").unwrap();
        assert_eq!(
            a.validation.errors,
            vec![r#"Missing or invalid "title" field in frontmatter"#]
        );

        let b = set.get("/docs/b").unwrap();
        assert!(!b.validation.is_valid);
        assert!(b.validation.errors[0].starts_with("Invalid YAML"));
        assert_eq!(set.parsed()[1].sections[0].title, "B");
    }

    #[test]
    fn test_config_applied() {
        let mut config = Config::default();
        config.components.builtins = false;
        config.components.placeholder_prefix = "@@C_".to_owned();
        config.navigation.root_title = "Handbook".to_owned();
        config.navigation.root_href = "/handbook".to_owned();
        config.frontmatter.visibility = vec!["internal".to_owned()];

        let set = build(
            &config,
            &[(
                "/handbook/team",
                "---\ntitle: Team\nvisibility: public\n---\n<Alert />\n",
            )],
        );

        let team = set.get("/handbook/team").unwrap();
        assert_eq!(
            team.validation.warnings,
            vec!["Visibility should be one of: internal"]
        );
        assert_eq!(team.output.errors, vec![r#"Component "Alert" is not registered"#]);

        let state = set.navigation_state("/handbook/team");
        assert_eq!(state.breadcrumbs.items[0].title, "Handbook");
        assert_eq!(state.breadcrumbs.current.href, "/handbook/team");
    }

    #[test]
    fn test_empty_set() {
        let set = build(&Config::default(), &[]);
        assert!(set.is_empty());
        assert!(set.navigation_state("/docs").cross_links.is_empty());
    }
}
