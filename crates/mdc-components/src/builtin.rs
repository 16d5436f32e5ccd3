//! Built-in component schemas.
//!
//! `Alert`, `Card`, `Callout` and `CodeBlock` render to plain HTML. Block
//! children arrive under the `children` prop and are escaped like every other
//! text value.

use std::fmt::Write;

use crate::handler::{ComponentOutput, HandlerError};
use crate::registry::{ComponentRegistry, ComponentSchema, PropSpec};
use crate::value::{PropValue, Props};

const CALLOUT_TYPES: [&str; 4] = ["info", "warning", "error", "success"];

impl ComponentRegistry {
    /// Create a registry with the built-in components registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }
}

/// Register the built-in components, replacing any existing registrations
/// with the same names.
pub fn register_builtins(registry: &mut ComponentRegistry) {
    for (name, schema) in [
        ("Alert", alert_schema()),
        ("Card", card_schema()),
        ("Callout", callout_schema()),
        ("CodeBlock", code_block_schema()),
    ] {
        if let Err(e) = registry.register(name, schema) {
            tracing::warn!(component = name, error = %e, "Failed to register built-in component");
        }
    }
}

fn alert_schema() -> ComponentSchema {
    ComponentSchema::new()
        .with_prop("type", PropSpec::string().with_default("info"))
        .with_prop("title", PropSpec::string())
        .with_handler(render_alert)
}

fn card_schema() -> ComponentSchema {
    ComponentSchema::new()
        .with_prop("title", PropSpec::string().required())
        .with_handler(render_card)
}

fn callout_schema() -> ComponentSchema {
    ComponentSchema::new()
        .with_prop(
            "type",
            PropSpec::string()
                .with_default("info")
                .with_check(|v| v.as_str().is_some_and(|s| CALLOUT_TYPES.contains(&s))),
        )
        .with_prop("title", PropSpec::string())
        .with_prop("icon", PropSpec::boolean().with_default(true))
        .with_handler(render_callout)
}

fn code_block_schema() -> ComponentSchema {
    ComponentSchema::new()
        .with_prop("language", PropSpec::string().with_default("text"))
        .with_prop("title", PropSpec::string())
        .with_prop("showLineNumbers", PropSpec::boolean().with_default(false))
        .with_handler(render_code_block)
}

fn render_alert(props: &Props) -> Result<ComponentOutput, HandlerError> {
    let kind = str_prop(props, "type").unwrap_or("info");
    let mut html = format!(r#"<div class="alert alert-{}" role="alert">"#, escape_html(kind));
    if let Some(title) = str_prop(props, "title") {
        let _ = write!(html, r#"<p class="alert-title">{}</p>"#, escape_html(title));
    }
    push_children(&mut html, props);
    html.push_str("</div>");
    Ok(ComponentOutput::Html(html))
}

fn render_card(props: &Props) -> Result<ComponentOutput, HandlerError> {
    let title = str_prop(props, "title").ok_or_else(|| HandlerError::new("title is required"))?;
    let mut html = format!(
        r#"<div class="card"><h3 class="card-title">{}</h3>"#,
        escape_html(title)
    );
    push_children(&mut html, props);
    html.push_str("</div>");
    Ok(ComponentOutput::Html(html))
}

fn render_callout(props: &Props) -> Result<ComponentOutput, HandlerError> {
    let kind = str_prop(props, "type").unwrap_or("info");
    let icon = match kind {
        "warning" => "⚠️",
        "error" => "❌",
        "success" => "✅",
        _ => "ℹ️",
    };

    let mut html = format!(r#"<div class="callout callout-{kind}">"#);
    if props.get("icon").and_then(PropValue::as_bool).unwrap_or(true) {
        let _ = write!(html, r#"<span class="callout-icon">{icon}</span>"#);
    }
    html.push_str(r#"<div class="callout-body">"#);
    if let Some(title) = str_prop(props, "title") {
        let _ = write!(html, r#"<h4 class="callout-title">{}</h4>"#, escape_html(title));
    }
    push_children(&mut html, props);
    html.push_str("</div></div>");
    Ok(ComponentOutput::Html(html))
}

fn render_code_block(props: &Props) -> Result<ComponentOutput, HandlerError> {
    let language = str_prop(props, "language").unwrap_or("text");
    let code = str_prop(props, "children").unwrap_or("");
    let line_numbers = props
        .get("showLineNumbers")
        .and_then(PropValue::as_bool)
        .unwrap_or(false);

    let mut html = String::from(r#"<div class="code-block">"#);
    if let Some(title) = str_prop(props, "title") {
        let _ = write!(html, r#"<div class="code-block-title">{}</div>"#, escape_html(title));
    }
    if line_numbers {
        html.push_str(r#"<pre class="line-numbers">"#);
    } else {
        html.push_str("<pre>");
    }
    let _ = write!(
        html,
        r#"<code class="language-{}">{}</code></pre>"#,
        escape_html(language),
        escape_html(code)
    );
    if line_numbers {
        html.push_str(r#"<div class="code-block-lines">"#);
        for n in 1..=code.split('\n').count() {
            let _ = write!(html, "<span>{n}</span>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    Ok(ComponentOutput::Html(html))
}

fn str_prop<'a>(props: &'a Props, name: &str) -> Option<&'a str> {
    props.get(name).and_then(PropValue::as_str)
}

fn push_children(html: &mut String, props: &Props) {
    if let Some(children) = str_prop(props, "children") {
        html.push_str(&escape_html(children));
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
