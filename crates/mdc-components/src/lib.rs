//! Component syntax engine for Markdown.
//!
//! Documents embed components as `<Name prop="v" />` or
//! `<Name prop="v">children</Name>`. This crate finds those occurrences,
//! validates them against a [`ComponentRegistry`] of schemas, and replaces
//! them with placeholder tokens (or inline error notices) that a later
//! presentation stage substitutes with real output.
//!
//! # Architecture
//!
//! - [`scanner`]: character-level readers for quoted, braced and bare tokens
//! - [`parse_props`]: prop strings to typed [`PropValue`]s
//! - [`ComponentParser`]: occurrence discovery and substitution
//! - [`ComponentRegistry`]: schemas, validation, defaults, guarded rendering
//! - [`ComponentRenderer`]: the document-level pipeline
//! - [`Replacements`]: placeholder substitution for presentation output
//!
//! # Example
//!
//! ```
//! use mdc_components::{ComponentRegistry, ComponentRenderer};
//!
//! let registry = ComponentRegistry::with_builtins();
//! let renderer = ComponentRenderer::new(&registry);
//!
//! let output = renderer.render(r#"Intro <Card title="Setup">Install it.</Card>"#);
//! assert_eq!(output.content, "Intro __COMPONENT_0_Card__");
//!
//! let html = output
//!     .replacements(renderer.placeholder_prefix())
//!     .apply(&output.content);
//! assert!(html.contains("Install it."));
//! ```

mod builtin;
mod handler;
mod parser;
mod props;
mod registry;
mod renderer;
mod replacements;
pub mod scanner;
mod validation;
mod value;

pub use builtin::{escape_html, register_builtins};
pub use handler::{ComponentHandler, ComponentOutput, HandlerError};
pub use parser::{
    ComponentDefinition, ComponentOccurrence, ComponentParser, is_valid_component_name,
};
pub use props::{parse_literal, parse_props};
pub use registry::{
    ComponentError, ComponentRegistry, ComponentSchema, PropCheck, PropSpec, PropsCheck,
    RegistryError, Resolution,
};
pub use renderer::{
    ComponentRenderer, DEFAULT_PLACEHOLDER_PREFIX, Position, RenderOutput, RenderedComponent,
};
pub use replacements::Replacements;
pub use validation::ValidationResult;
pub use value::{PropKind, PropValue, Props};
