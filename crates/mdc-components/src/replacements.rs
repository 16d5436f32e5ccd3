//! Single-pass placeholder substitution.
//!
//! The renderer leaves `<prefix><index>_<Name>__` tokens in processed text.
//! A presentation stage registers the output for each token and swaps them
//! all in one pass over the text.

use std::collections::HashMap;

use regex::Regex;

use crate::renderer::DEFAULT_PLACEHOLDER_PREFIX;

/// Collects placeholder outputs for single-pass application.
///
/// Tokens without a registered output are left in place, so a later stage
/// can still see which components were not substituted.
///
/// # Example
///
/// ```
/// use mdc_components::Replacements;
///
/// let mut replacements = Replacements::new();
/// replacements.add("__COMPONENT_0_Alert__", "<div class=\"alert\"></div>");
///
/// let text = "Intro __COMPONENT_0_Alert__ and __COMPONENT_1_Card__";
/// assert_eq!(
///     replacements.apply(text),
///     "Intro <div class=\"alert\"></div> and __COMPONENT_1_Card__"
/// );
/// ```
#[derive(Debug)]
pub struct Replacements {
    token: Regex,
    items: HashMap<String, String>,
}

impl Default for Replacements {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PLACEHOLDER_PREFIX)
    }
}

impl Replacements {
    /// Create an empty collector for the default placeholder prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collector for tokens starting with `prefix`.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let pattern = format!(r"{}[0-9]+_[A-Za-z0-9]+__", regex::escape(prefix));
        let token = Regex::new(&pattern).expect("escaped prefix forms a valid pattern");
        Self {
            token,
            items: HashMap::new(),
        }
    }

    /// Register the output for a placeholder token. Later registrations for
    /// the same token win.
    pub fn add(&mut self, placeholder: impl Into<String>, output: impl Into<String>) {
        self.items.insert(placeholder.into(), output.into());
    }

    /// Substitute every registered token in `text`.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if self.items.is_empty() {
            return text.to_owned();
        }

        self.token
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let token = &caps[0];
                self.items
                    .get(token)
                    .cloned()
                    .unwrap_or_else(|| token.to_owned())
            })
            .into_owned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
