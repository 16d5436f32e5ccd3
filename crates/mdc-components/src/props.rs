//! Component prop string parsing.
//!
//! Parses the attribute portion of a component tag:
//! `title="Hello" count={3} items={["a", "b"]} open variant=compact`.

use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::{
    char_len_at, read_bare, read_braced, read_quoted, scan_identifier, skip_whitespace,
};
use crate::value::{PropValue, Props};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap());

/// Parse a raw prop string into a property bag.
///
/// - `name` or `name=` (nothing after) is the flag `true`
/// - `name="..."` is an unescaped string
/// - `name={...}` is a literal, see [`parse_literal`]
/// - `name=value` is taken verbatim as a string
///
/// Characters that cannot start a prop name are skipped, so parsing always
/// terminates and never fails.
///
/// # Example
///
/// ```
/// use mdc_components::{PropValue, parse_props};
///
/// let props = parse_props(r#"title="Hi" count={3} open"#);
/// assert_eq!(props["title"], PropValue::from("Hi"));
/// assert_eq!(props["count"], PropValue::Number(3.0));
/// assert_eq!(props["open"], PropValue::Bool(true));
/// ```
#[must_use]
pub fn parse_props(input: &str) -> Props {
    let mut props = Props::new();

    if input.trim().is_empty() {
        return props;
    }

    let len = input.len();
    let mut i = 0;

    while i < len {
        i = skip_whitespace(input, i);
        if i >= len {
            break;
        }

        let name_end = scan_identifier(input, i);
        if name_end == i {
            // Not a prop name, skip one character
            i += char_len_at(input, i);
            continue;
        }
        let name = input[i..name_end].to_owned();

        i = skip_whitespace(input, name_end);
        if !input[i..].starts_with('=') {
            props.insert(name, PropValue::Bool(true));
            continue;
        }

        i = skip_whitespace(input, i + 1);
        if i >= len {
            props.insert(name, PropValue::Bool(true));
            break;
        }

        let (value, next) = match input[i..].chars().next() {
            Some('"') => {
                let (value, next) = read_quoted(input, i);
                (PropValue::String(value), next)
            }
            Some('{') => {
                let (literal, next) = read_braced(input, i);
                (parse_literal(literal), next)
            }
            _ => {
                let (token, next) = read_bare(input, i);
                (PropValue::String(token.to_owned()), next)
            }
        };

        props.insert(name, value);
        i = next;
    }

    props
}

/// Parse the contents of a `{...}` prop literal.
///
/// Keywords (`true`, `false`, `null`, `undefined`) and plain decimal numbers
/// are recognized directly. Array and object literals are parsed as strict
/// JSON, then once more with single quotes rewritten to double quotes; if
/// both attempts fail the raw text is kept as a string. A quoted literal
/// yields the unquoted text, anything else is kept as a string.
#[must_use]
pub fn parse_literal(raw: &str) -> PropValue {
    let trimmed = raw.trim();

    match trimmed {
        "true" => return PropValue::Bool(true),
        "false" => return PropValue::Bool(false),
        "null" => return PropValue::Null,
        "undefined" => return PropValue::Undefined,
        _ => {}
    }

    if NUMBER_RE.is_match(trimmed)
        && let Ok(n) = trimmed.parse::<f64>()
    {
        return PropValue::Number(n);
    }

    let is_array = trimmed.starts_with('[') && trimmed.ends_with(']');
    let is_object = trimmed.starts_with('{') && trimmed.ends_with('}');
    if is_array || is_object {
        return parse_json(trimmed)
            .or_else(|| parse_json(&trimmed.replace('\'', "\"")))
            .unwrap_or_else(|| PropValue::String(trimmed.to_owned()));
    }

    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        return PropValue::String(trimmed[1..trimmed.len() - 1].to_owned());
    }

    PropValue::String(trimmed.to_owned())
}

fn parse_json(text: &str) -> Option<PropValue> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .map(PropValue::from)
}
