//! Document-level component rendering.
//!
//! Runs the parser and registry over a whole document and replaces each
//! occurrence with either a placeholder token or an inline error notice.

use serde::Serialize;

use crate::ValidationResult;
use crate::handler::ComponentOutput;
use crate::parser::{ComponentDefinition, ComponentParser, splice};
use crate::registry::ComponentRegistry;
use crate::replacements::Replacements;
use crate::value::{PropValue, Props};

/// Prefix of placeholder tokens left in processed text.
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "__COMPONENT_";

/// Byte span of an occurrence in the original text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

/// Manifest entry for one component occurrence.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedComponent {
    pub name: String,
    /// Props as written.
    pub props: Props,
    /// Props after defaults were applied, when resolution got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_props: Option<Props>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    /// Whether the occurrence was replaced by a placeholder.
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub position: Position,
    /// Token left in the processed text on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip)]
    pub output: Option<ComponentOutput>,
}

/// Result of rendering a document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderOutput {
    /// Processed text.
    pub content: String,
    /// One entry per occurrence, in document order.
    pub components: Vec<RenderedComponent>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RenderOutput {
    /// Collect the handler output of every successful component, keyed by its
    /// placeholder token.
    #[must_use]
    pub fn replacements(&self, prefix: &str) -> Replacements {
        let mut replacements = Replacements::with_prefix(prefix);
        for component in &self.components {
            if let (Some(placeholder), Some(output)) = (&component.placeholder, &component.output)
            {
                replacements.add(placeholder.clone(), output.as_str());
            }
        }
        replacements
    }
}

/// Renders components in a document against a registry.
///
/// # Example
///
/// ```
/// use mdc_components::{ComponentOutput, ComponentRegistry, ComponentRenderer, ComponentSchema, Props};
///
/// let mut registry = ComponentRegistry::new();
/// registry
///     .register(
///         "Alert",
///         ComponentSchema::new().with_handler(|_: &Props| Ok(ComponentOutput::html("<aside></aside>"))),
///     )
///     .unwrap();
///
/// let output = ComponentRenderer::new(&registry).render(r#"Note: <Alert type="warning" />"#);
/// assert_eq!(output.content, "Note: __COMPONENT_0_Alert__");
/// assert!(output.components[0].is_valid);
/// ```
#[derive(Debug)]
pub struct ComponentRenderer<'r> {
    registry: &'r ComponentRegistry,
    parser: ComponentParser,
    placeholder_prefix: String,
}

impl<'r> ComponentRenderer<'r> {
    /// Create a renderer with the default parser and placeholder prefix.
    #[must_use]
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            parser: ComponentParser::new(),
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_owned(),
        }
    }

    /// Use a specific parser.
    #[must_use]
    pub fn with_parser(mut self, parser: ComponentParser) -> Self {
        self.parser = parser;
        self
    }

    /// Use a different placeholder prefix.
    #[must_use]
    pub fn with_placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn placeholder_prefix(&self) -> &str {
        &self.placeholder_prefix
    }

    /// Render every component occurrence in `text`.
    ///
    /// If syntax validation reports errors the text is returned untouched
    /// with those errors. Otherwise occurrences are processed from last to
    /// first, so each splice leaves earlier offsets valid. Errors are
    /// reported in document order.
    #[must_use]
    pub fn render(&self, text: &str) -> RenderOutput {
        let syntax = self.parser.validate_syntax(text);
        if !syntax.is_valid {
            tracing::warn!(
                errors = syntax.errors.len(),
                "Component syntax rejected, leaving text untouched"
            );
            return RenderOutput {
                content: text.to_owned(),
                components: Vec::new(),
                errors: syntax.errors,
                warnings: syntax.warnings,
            };
        }

        let occurrences = self.parser.parse_components(text);
        let mut content = text.to_owned();
        let mut components = Vec::with_capacity(occurrences.len());

        for (index, occurrence) in occurrences.iter().enumerate().rev() {
            let definition = with_children(occurrence.definition());
            let mut info = RenderedComponent {
                name: occurrence.name.clone(),
                props: occurrence.props.clone(),
                resolved_props: None,
                children: occurrence.children.clone(),
                is_valid: false,
                errors: Vec::new(),
                position: Position {
                    start: occurrence.start,
                    end: occurrence.end,
                },
                placeholder: None,
                output: None,
            };

            let validation = self.registry.validate_definition(&definition);
            if validation.is_valid {
                let resolution = self.registry.resolve(&definition.name, &definition.props);
                info.resolved_props = Some(resolution.props);
                if resolution.is_valid {
                    info.is_valid = true;
                    info.placeholder = Some(self.placeholder(index, &occurrence.name));
                    info.output = resolution.output;
                } else {
                    info.errors = resolution.errors;
                }
            } else {
                info.errors = validation.errors;
            }

            let replacement = match &info.placeholder {
                Some(placeholder) => placeholder.clone(),
                None => error_notice(&info.name, &info.errors),
            };
            splice(&mut content, occurrence.start, occurrence.end, &replacement);
            components.push(info);
        }

        components.reverse();

        let mut errors = syntax.errors;
        errors.extend(components.iter().flat_map(|c| c.errors.iter().cloned()));

        tracing::debug!(
            components = components.len(),
            errors = errors.len(),
            "Rendered components"
        );

        RenderOutput {
            content,
            components,
            errors,
            warnings: syntax.warnings,
        }
    }

    /// Validate syntax and every component definition without rendering.
    ///
    /// Definitions are checked with block children under `children`, the
    /// same props [`render`](Self::render) validates and resolves.
    #[must_use]
    pub fn validate_components(&self, text: &str) -> ValidationResult {
        let mut result = self.parser.validate_syntax(text);
        for definition in self.extract_definitions(text) {
            result.merge(self.registry.validate_definition(&with_children(definition)));
        }
        result
    }

    /// Definitions of every occurrence in document order.
    #[must_use]
    pub fn extract_definitions(&self, text: &str) -> Vec<ComponentDefinition> {
        self.parser
            .parse_components(text)
            .iter()
            .map(|occurrence| occurrence.definition())
            .collect()
    }

    fn placeholder(&self, index: usize, name: &str) -> String {
        format!("{}{index}_{name}__", self.placeholder_prefix)
    }
}

/// Definition as validated and handed to the handler: block children are
/// added under `children`, unless a prop of that name was written explicitly.
fn with_children(mut definition: ComponentDefinition) -> ComponentDefinition {
    if let Some(children) = &definition.children {
        definition
            .props
            .entry("children".to_owned())
            .or_insert_with(|| PropValue::String(children.clone()));
    }
    definition
}

/// Block-quoted notice that replaces a failed component.
fn error_notice(name: &str, errors: &[String]) -> String {
    let mut notice = format!("\n> **Component Error: {name}**\n>\n");
    for error in errors {
        notice.push_str("> - ");
        notice.push_str(error);
        notice.push('\n');
    }
    notice
}
