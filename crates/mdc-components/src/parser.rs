//! Component syntax parsing.
//!
//! Finds `<Name prop="v" />` and `<Name prop="v">children</Name>` in text.
//!
//! Block matching is first-match by default: the first `</Name>` after an
//! opening tag closes it, so nested tags with the same name are not balanced.
//! [`ComponentParser::strict`] enables depth-aware matching instead.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::ValidationResult;
use crate::props::parse_props;
use crate::value::Props;

static SELF_CLOSING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Z][a-zA-Z0-9]*)\s*([^>]*?)\s*/>").unwrap());

static OPENING_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Z][a-zA-Z0-9]*)\s*([^>]*?)>").unwrap());

static TAG_LIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Z][a-zA-Z0-9]*[^>]*>").unwrap());

/// One textual match of component syntax.
///
/// Offsets are byte offsets into the parsed text, `start < end`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOccurrence {
    /// The matched text, tags included.
    pub full_text: String,
    /// Component name.
    pub name: String,
    /// Parsed props.
    pub props: Props,
    /// Trimmed inner text for block components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    /// Offset of the opening `<`.
    pub start: usize,
    /// Offset just past the match.
    pub end: usize,
}

impl ComponentOccurrence {
    /// The canonical definition of this occurrence.
    #[must_use]
    pub fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            name: self.name.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
        }
    }
}

/// Name, props and children of a component, without position.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ComponentDefinition {
    pub name: String,
    pub props: Props,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
}

/// Parser for component syntax.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComponentParser {
    strict_blocks: bool,
}

impl ComponentParser {
    /// Create a parser with first-match block semantics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that balances nested same-named block tags.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_blocks: true,
        }
    }

    /// Enable or disable depth-aware block matching.
    #[must_use]
    pub fn with_strict_blocks(mut self, strict: bool) -> Self {
        self.strict_blocks = strict;
        self
    }

    /// Find all component occurrences, ordered by start offset.
    ///
    /// # Example
    ///
    /// ```
    /// use mdc_components::ComponentParser;
    ///
    /// let found = ComponentParser::new()
    ///     .parse_components(r#"Intro <Alert type="info" /> and <Card>Body</Card>"#);
    /// assert_eq!(found.len(), 2);
    /// assert_eq!(found[0].name, "Alert");
    /// assert_eq!(found[1].children.as_deref(), Some("Body"));
    /// ```
    #[must_use]
    pub fn parse_components(&self, text: &str) -> Vec<ComponentOccurrence> {
        let mut found = self_closing(text);
        found.extend(self.blocks(text));
        found.sort_by_key(|occurrence| occurrence.start);

        tracing::debug!(count = found.len(), "Parsed component occurrences");
        found
    }

    /// Parse the first component in `text`.
    #[must_use]
    pub fn parse_component_definition(&self, text: &str) -> Option<ComponentDefinition> {
        self.parse_components(text)
            .first()
            .map(ComponentOccurrence::definition)
    }

    /// Replace every occurrence with the result of `replacer`.
    ///
    /// Replacements are applied from the last occurrence to the first so
    /// earlier offsets stay valid.
    pub fn replace_components<F>(&self, text: &str, mut replacer: F) -> String
    where
        F: FnMut(&ComponentOccurrence) -> String,
    {
        let occurrences = self.parse_components(text);
        let mut result = text.to_owned();

        for occurrence in occurrences.iter().rev() {
            let replacement = replacer(occurrence);
            splice(&mut result, occurrence.start, occurrence.end, &replacement);
        }

        result
    }

    /// Check component syntax in `text`.
    ///
    /// Warns when there are more tag-like substrings than parsed components,
    /// which usually means a tag is malformed or never closed.
    #[must_use]
    pub fn validate_syntax(&self, text: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let occurrences = self.parse_components(text);

        let tag_like = TAG_LIKE_RE.find_iter(text).count();
        if tag_like > occurrences.len() {
            result.warn("Some component syntax may be malformed and was not parsed");
        }

        for occurrence in &occurrences {
            if occurrence.name.is_empty() {
                result.error(format!(
                    "Component at position {} has no name",
                    occurrence.start
                ));
            } else if !is_valid_component_name(&occurrence.name) {
                result.error(format!(
                    "Component name \"{}\" must start with uppercase letter and contain only alphanumeric characters",
                    occurrence.name
                ));
            }
        }

        result
    }

    fn blocks(&self, text: &str) -> Vec<ComponentOccurrence> {
        let mut found = Vec::new();
        let mut pos = 0;

        while let Some(caps) = OPENING_TAG_RE.captures_at(text, pos) {
            let Some(tag) = caps.get(0) else { break };
            let name = &caps[1];
            let raw_props = caps.get(2).map_or("", |m| m.as_str());

            // `<Name ... />` belongs to the self-closing form
            if raw_props.trim_end().ends_with('/') {
                pos = tag.start() + 1;
                continue;
            }

            let close_tag = format!("</{name}>");
            let close_start = if self.strict_blocks {
                find_balanced_close(text, tag.end(), name)
            } else {
                text[tag.end()..]
                    .find(&close_tag)
                    .map(|offset| tag.end() + offset)
            };

            let Some(close_start) = close_start else {
                pos = tag.start() + 1;
                continue;
            };

            let end = close_start + close_tag.len();
            found.push(ComponentOccurrence {
                full_text: text[tag.start()..end].to_owned(),
                name: name.to_owned(),
                props: parse_props(raw_props),
                children: Some(text[tag.end()..close_start].trim().to_owned()),
                start: tag.start(),
                end,
            });
            pos = end;
        }

        found
    }
}

fn self_closing(text: &str) -> Vec<ComponentOccurrence> {
    SELF_CLOSING_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ComponentOccurrence {
                full_text: whole.as_str().to_owned(),
                name: caps[1].to_owned(),
                props: parse_props(caps.get(2).map_or("", |m| m.as_str())),
                children: None,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Find the `</name>` that closes an opening tag ending at `from`, counting
/// nested non-self-closing openings of the same name.
fn find_balanced_close(text: &str, from: usize, name: &str) -> Option<usize> {
    let close_tag = format!("</{name}>");
    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let close_start = pos + text[pos..].find(&close_tag)?;

        depth += OPENING_TAG_RE
            .captures_iter(&text[pos..close_start])
            .filter(|caps| &caps[1] == name)
            .filter(|caps| !caps.get(2).is_some_and(|m| m.as_str().trim_end().ends_with('/')))
            .count();
        depth -= 1;

        if depth == 0 {
            return Some(close_start);
        }
        pos = close_start + close_tag.len();
    }
}

/// Check a component name: uppercase ASCII letter, then ASCII alphanumerics.
#[must_use]
pub fn is_valid_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Replace `text[start..end]` with `replacement`.
///
/// Offsets are clamped to the text and widened to character boundaries, so
/// stale offsets (from overlapping occurrences) never panic.
pub(crate) fn splice(text: &mut String, start: usize, end: usize, replacement: &str) {
    let mut end = end.min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    let mut start = start.min(end);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    text.replace_range(start..end, replacement);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value::PropValue;

    fn parse(text: &str) -> Vec<ComponentOccurrence> {
        ComponentParser::new().parse_components(text)
    }

    #[test]
    fn test_self_closing_component() {
        let found = parse(r#"<X a="1" b />"#);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "X");
        assert_eq!(found[0].props["a"], PropValue::from("1"));
        assert_eq!(found[0].props["b"], PropValue::Bool(true));
        assert_eq!(found[0].children, None);
        assert_eq!(found[0].start, 0);
        assert_eq!(found[0].end, 13);
    }

    #[test]
    fn test_self_closing_without_space() {
        let found = parse("<Divider/>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Divider");
        assert!(found[0].props.is_empty());
    }

    #[test]
    fn test_block_component_children_trimmed() {
        let text = "<Card title=\"Test\">\n  This is the content\n</Card>";
        let found = parse(text);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Card");
        assert_eq!(found[0].children.as_deref(), Some("This is the content"));
        assert_eq!(found[0].full_text, text);
        assert_eq!(found[0].end, text.len());
    }

    #[test]
    fn test_block_requires_matching_close_name() {
        let found = parse("<Card>text</Alert>");
        assert!(found.is_empty());
    }

    #[test]
    fn test_lowercase_tags_ignored() {
        assert!(parse("<div>html</div> <br />").is_empty());
    }

    #[test]
    fn test_mixed_forms_sorted_by_start() {
        let text = r#"<Card title="A">one</Card> then <Alert type="info" /> then <Card>two</Card>"#;
        let found = parse(text);

        let names: Vec<_> = found.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Card", "Alert", "Card"]);
        assert!(found.windows(2).all(|w| w[0].start < w[1].start));
        assert_eq!(found[2].children.as_deref(), Some("two"));
    }

    #[test]
    fn test_nested_same_name_first_match() {
        let text = "<Box>outer <Box>inner</Box> tail</Box>";
        let found = parse(text);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].children.as_deref(), Some("outer <Box>inner"));
    }

    #[test]
    fn test_nested_same_name_strict() {
        let text = "<Box>outer <Box>inner</Box> tail</Box>";
        let found = ComponentParser::strict().parse_components(text);

        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].children.as_deref(),
            Some("outer <Box>inner</Box> tail")
        );
        assert_eq!(found[0].end, text.len());
    }

    #[test]
    fn test_strict_ignores_nested_self_closing() {
        let text = "<Box>a <Box /> b</Box>";
        let found = ComponentParser::strict().parse_components(text);

        let block = found.iter().find(|o| o.children.is_some()).unwrap();
        assert_eq!(block.children.as_deref(), Some("a <Box /> b"));
    }

    #[test]
    fn test_self_closing_inside_block_found_twice() {
        let text = "<Tabs><Tab label=\"a\" /></Tabs>";
        let found = parse(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Tabs");
        assert_eq!(found[1].name, "Tab");
    }

    #[test]
    fn test_parse_component_definition() {
        let parser = ComponentParser::new();
        let def = parser
            .parse_component_definition(r#"text <Alert type="warning" /> <Card />"#)
            .unwrap();

        assert_eq!(def.name, "Alert");
        assert_eq!(def.props["type"], PropValue::from("warning"));
        assert!(parser.parse_component_definition("plain text").is_none());
    }

    #[test]
    fn test_replace_components() {
        let parser = ComponentParser::new();
        let text = r#"A <Alert type="info" /> B <Card title="x">body</Card> C"#;

        let replaced = parser.replace_components(text, |o| format!("[{}]", o.name));

        assert_eq!(replaced, "A [Alert] B [Card] C");
        assert!(parser.parse_components(&replaced).is_empty());
    }

    #[test]
    fn test_replace_overlapping_does_not_panic() {
        let parser = ComponentParser::new();
        let text = "<Tabs>é<Tab />é</Tabs> ende é rest";

        // The inner match shortens the text before the outer block is
        // spliced with its original offsets.
        let replaced = parser.replace_components(text, |_| String::new());

        assert_eq!(replaced, " rest");
    }

    #[test]
    fn test_validate_syntax_clean() {
        let result = ComponentParser::new().validate_syntax(r#"<Alert type="info" />"#);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_syntax_unclosed_block_warns() {
        let result = ComponentParser::new().validate_syntax("<Card title=\"x\">never closed");
        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            vec!["Some component syntax may be malformed and was not parsed"]
        );
    }

    #[test]
    fn test_is_valid_component_name() {
        assert!(is_valid_component_name("Alert"));
        assert!(is_valid_component_name("Card2"));
        assert!(!is_valid_component_name("alert"));
        assert!(!is_valid_component_name("My-Card"));
        assert!(!is_valid_component_name(""));
    }

    #[test]
    fn test_splice_clamps_offsets() {
        let mut text = "héllo".to_owned();
        splice(&mut text, 2, 100, "!");
        assert_eq!(text, "h!");
    }
}
