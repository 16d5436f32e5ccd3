//! Component render handlers.
//!
//! A handler turns a validated property bag into output for the presentation
//! layer. The renderer itself only leaves placeholders in the text; the
//! handler's output travels on the [`Resolution`](crate::Resolution) so a
//! later stage can substitute it.

use crate::value::Props;

/// Output produced by a component handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentOutput {
    /// Rendered HTML.
    Html(String),
    /// Markdown that still needs to go through the markdown pipeline.
    Markdown(String),
}

impl ComponentOutput {
    /// Create an HTML output.
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }

    /// Create a markdown output.
    #[must_use]
    pub fn markdown(s: impl Into<String>) -> Self {
        Self::Markdown(s.into())
    }

    /// The raw output text regardless of format.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html(s) | Self::Markdown(s) => s,
        }
    }
}

/// Failure reported by a component handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Renders a component from its resolved props.
///
/// Handlers are shared by every document rendered against a registry, so they
/// must be `Send + Sync`. Closures with the matching signature implement this
/// trait.
///
/// # Example
///
/// ```
/// use mdc_components::{ComponentHandler, ComponentOutput, HandlerError, Props};
///
/// struct Badge;
///
/// impl ComponentHandler for Badge {
///     fn render(&self, props: &Props) -> Result<ComponentOutput, HandlerError> {
///         let label = props
///             .get("label")
///             .and_then(|v| v.as_str())
///             .ok_or_else(|| HandlerError::new("label is not a string"))?;
///         Ok(ComponentOutput::html(format!("<span class=\"badge\">{label}</span>")))
///     }
/// }
/// ```
pub trait ComponentHandler: Send + Sync {
    /// Render the component.
    fn render(&self, props: &Props) -> Result<ComponentOutput, HandlerError>;
}

impl<F> ComponentHandler for F
where
    F: Fn(&Props) -> Result<ComponentOutput, HandlerError> + Send + Sync,
{
    fn render(&self, props: &Props) -> Result<ComponentOutput, HandlerError> {
        self(props)
    }
}
