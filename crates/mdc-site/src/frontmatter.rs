//! YAML front matter.
//!
//! A document may start with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Getting Started
//! tags: [intro]
//! ---
//! # Body
//! ```

use chrono::{DateTime, NaiveDate};
use mdc_components::ValidationResult;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

const DELIMITER: &str = "---";

/// Front matter fields of a document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter(Mapping);

impl FrontMatter {
    /// Parse front matter from YAML content.
    ///
    /// Empty content gives empty front matter.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, FrontMatterError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        match serde_yaml::from_str(trimmed) {
            Ok(Value::Mapping(mapping)) => Ok(Self(mapping)),
            Ok(Value::Null) => Ok(Self::default()),
            Ok(_) => Err(FrontMatterError::Parse(
                "Front matter must be a mapping".to_owned(),
            )),
            Err(e) => Err(FrontMatterError::Parse(format!("Invalid YAML: {e}"))),
        }
    }

    /// Field value, treating `null` as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Error type for front matter operations.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// YAML parsing error.
    #[error("{0}")]
    Parse(String),
}

/// Split a leading front matter block from `text`.
///
/// Text without a block, or whose block is never closed, is returned whole
/// with empty front matter.
///
/// # Errors
///
/// Returns an error if the block's YAML is malformed.
pub fn split_front_matter(text: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    match find_block(text) {
        Some((yaml, body)) => Ok((FrontMatter::from_yaml(yaml)?, body)),
        None => Ok((FrontMatter::default(), text)),
    }
}

/// Body of `text` with any leading front matter block removed.
#[must_use]
pub fn strip_front_matter(text: &str) -> &str {
    find_block(text).map_or(text, |(_, body)| body)
}

fn find_block(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Check front matter fields.
///
/// A missing or non-string `title` is an error. Ill-typed optional fields
/// and a `visibility` outside `allowed_visibility` are warnings.
#[must_use]
pub fn validate_front_matter(
    front_matter: &FrontMatter,
    allowed_visibility: &[String],
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !front_matter.title().is_some_and(|title| !title.is_empty()) {
        result.error(r#"Missing or invalid "title" field in frontmatter"#);
    }

    if front_matter.get("description").is_some_and(|v| !v.is_string()) {
        result.warn("Description should be a string");
    }

    if front_matter.get("author").is_some_and(|v| !v.is_string()) {
        result.warn("Author should be a string");
    }

    if front_matter
        .get("date")
        .is_some_and(|v| !v.as_str().is_some_and(is_iso_date))
    {
        result.warn("Date should be in valid ISO format (YYYY-MM-DD)");
    }

    match front_matter.get("tags") {
        Some(Value::Sequence(tags)) => {
            if !tags.iter().all(Value::is_string) {
                result.warn("All tags should be strings");
            }
        }
        Some(_) => result.warn("Tags should be an array of strings"),
        None => {}
    }

    if front_matter.get("visibility").is_some_and(|v| {
        !v.as_str()
            .is_some_and(|s| allowed_visibility.iter().any(|allowed| allowed == s))
    }) {
        result.warn(format!(
            "Visibility should be one of: {}",
            allowed_visibility.join(", ")
        ));
    }

    result
}

/// `YYYY-MM-DD`, or a full RFC 3339 timestamp.
fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(s).is_ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn visibility() -> Vec<String> {
        vec!["public".to_owned(), "private".to_owned(), "draft".to_owned()]
    }

    fn validate(yaml: &str) -> ValidationResult {
        let front_matter = FrontMatter::from_yaml(yaml).unwrap();
        validate_front_matter(&front_matter, &visibility())
    }

    #[test]
    fn test_split_front_matter() {
        let text = "---\ntitle: Guide\n---\n# Guide\n";
        let (front_matter, body) = split_front_matter(text).unwrap();

        assert_eq!(front_matter.title(), Some("Guide"));
        assert_eq!(body, "# Guide\n");
    }

    #[test]
    fn test_split_without_block() {
        let text = "# Guide\n---\n";
        let (front_matter, body) = split_front_matter(text).unwrap();

        assert!(front_matter.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_unclosed_block() {
        let text = "---\ntitle: Guide\n# Guide\n";
        let (front_matter, body) = split_front_matter(text).unwrap();

        assert!(front_matter.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_empty_block() {
        let (front_matter, body) = split_front_matter("---\n---\nBody").unwrap();
        assert!(front_matter.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_crlf() {
        let (front_matter, body) = split_front_matter("---\r\ntitle: A\r\n---\r\nBody").unwrap();
        assert_eq!(front_matter.title(), Some("A"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_malformed_yaml() {
        let err = split_front_matter("---\ntitle: [unclosed\n---\nBody").unwrap_err();
        assert!(err.to_string().starts_with("Invalid YAML"));
        assert_eq!(strip_front_matter("---\ntitle: [unclosed\n---\nBody"), "Body");
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = FrontMatter::from_yaml("- a\n- b").unwrap_err();
        assert_eq!(err.to_string(), "Front matter must be a mapping");
    }

    #[test]
    fn test_valid_front_matter() {
        let result = validate(
            "title: Test Document\n\
             description: A test document\n\
             author: Test Author\n\
             date: 2023-12-01\n\
             tags: [test, markdown]\n\
             visibility: public\n",
        );

        assert_eq!(result, ValidationResult::new());
    }

    #[test]
    fn test_missing_title() {
        let result = validate("description: A test document");

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![r#"Missing or invalid "title" field in frontmatter"#]
        );
    }

    #[test]
    fn test_non_string_title() {
        let result = validate("title: 42");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_invalid_field_types() {
        let result = validate(
            "title: Test Document\n\
             description: 123\n\
             author: [a, b]\n\
             tags: not-an-array\n\
             date: invalid-date\n",
        );

        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            vec![
                "Description should be a string",
                "Author should be a string",
                "Date should be in valid ISO format (YYYY-MM-DD)",
                "Tags should be an array of strings",
            ]
        );
    }

    #[test]
    fn test_non_string_tags() {
        let result = validate("title: T\ntags: [a, 1]");
        assert_eq!(result.warnings, vec!["All tags should be strings"]);
    }

    #[test]
    fn test_invalid_visibility() {
        let result = validate("title: T\nvisibility: invalid-visibility");

        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            vec!["Visibility should be one of: public, private, draft"]
        );
    }

    #[test]
    fn test_custom_visibility() {
        let front_matter = FrontMatter::from_yaml("title: T\nvisibility: internal").unwrap();
        let result = validate_front_matter(&front_matter, &["internal".to_owned()]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_null_fields_ignored() {
        let result = validate("title: T\ndescription:\ndate: ~");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_rfc3339_date() {
        let result = validate("title: T\ndate: 2023-12-01T10:00:00Z");
        assert!(result.warnings.is_empty());
    }
}
