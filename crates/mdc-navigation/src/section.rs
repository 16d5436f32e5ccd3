//! Section and cross-reference extraction.
//!
//! Walks a Markdown document with pulldown-cmark and splits it into
//! heading-delimited sections plus the links found along the way.

use std::fmt;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::anchor::{UniqueAnchors, slugify};

/// Reading speed used when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Kind of a cross reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Another document in the site.
    Internal,
    /// A URL outside the site.
    External,
    /// A heading in the same document.
    Anchor,
}

impl LinkKind {
    /// Classify a link target by its shape.
    #[must_use]
    pub fn classify(target: &str) -> Self {
        if target.starts_with('#') {
            Self::Anchor
        } else if target.contains("://")
            || target.starts_with("mailto:")
            || target.starts_with("tel:")
        {
            Self::External
        } else {
            Self::Internal
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Anchor => "anchor",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heading and the text up to the next heading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub id: String,
    pub title: String,
    /// Heading level, 1-6.
    pub level: u8,
    /// Plain text of the section body.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub child_ids: Vec<String>,
    pub anchor: String,
    pub word_count: usize,
    /// Minutes, at least 1.
    pub estimated_read_time: usize,
}

impl ContentSection {
    /// Create a section with no body, parent or children.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        level: u8,
        anchor: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            content: String::new(),
            parent_id: None,
            child_ids: Vec::new(),
            anchor: anchor.into(),
            word_count: 0,
            estimated_read_time: 1,
        }
    }

    /// Set the body text and recompute word count and read time.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>, words_per_minute: usize) -> Self {
        self.set_content(content.into(), words_per_minute);
        self
    }

    fn set_content(&mut self, content: String, words_per_minute: usize) {
        self.word_count = content.split_whitespace().count();
        self.estimated_read_time = read_time(self.word_count, words_per_minute);
        self.content = content;
    }
}

/// A link found in a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CrossReference {
    /// Id of the document containing the link.
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub text: String,
}

impl CrossReference {
    /// Create a reference, classifying the target.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, text: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            source: source.into(),
            kind: LinkKind::classify(&target),
            target,
            text: text.into(),
        }
    }
}

/// Sections and references of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Document id, used as the link source.
    pub source: String,
    pub sections: Vec<ContentSection>,
    pub references: Vec<CrossReference>,
}

/// Reading time in minutes, rounded up, at least 1.
#[must_use]
pub fn read_time(word_count: usize, words_per_minute: usize) -> usize {
    word_count.div_ceil(words_per_minute.max(1)).max(1)
}

/// Extracts sections and references from Markdown.
#[derive(Clone, Copy, Debug)]
pub struct SectionExtractor {
    words_per_minute: usize,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

impl SectionExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading speed used for read time estimates.
    #[must_use]
    pub fn with_words_per_minute(mut self, words_per_minute: usize) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    /// Extract sections and references from `markdown`.
    ///
    /// Text before the first heading belongs to no section; links in it are
    /// still collected. Explicit `{#id}` heading attributes are used as
    /// anchors, other anchors are slugs of the heading text made unique
    /// within the document.
    ///
    /// # Example
    ///
    /// ```
    /// use mdc_navigation::SectionExtractor;
    ///
    /// let doc = SectionExtractor::new().extract("guide", "# Guide\n\n## Install\n\nRun it.");
    /// assert_eq!(doc.sections.len(), 2);
    /// assert_eq!(doc.sections[1].parent_id.as_deref(), Some("section-1"));
    /// assert_eq!(doc.sections[1].anchor, "install");
    /// ```
    #[must_use]
    pub fn extract(&self, source: &str, markdown: &str) -> ParsedDocument {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;

        let mut anchors = UniqueAnchors::new();
        for event in Parser::new_ext(markdown, options) {
            if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
                anchors.reserve(id.to_string());
            }
        }

        let mut walker = Walker::new(source, self.words_per_minute, anchors);
        for event in Parser::new_ext(markdown, options) {
            walker.event(event);
        }
        let document = walker.finish();

        tracing::debug!(
            source,
            sections = document.sections.len(),
            references = document.references.len(),
            "Extracted sections"
        );
        document
    }
}

struct PendingHeading {
    level: u8,
    id: Option<String>,
    text: String,
}

struct Walker<'s> {
    source: &'s str,
    words_per_minute: usize,
    sections: Vec<ContentSection>,
    references: Vec<CrossReference>,
    anchors: UniqueAnchors,
    stack: Vec<usize>,
    heading: Option<PendingHeading>,
    link: Option<(String, String)>,
    body: String,
}

impl<'s> Walker<'s> {
    fn new(source: &'s str, words_per_minute: usize, anchors: UniqueAnchors) -> Self {
        Self {
            source,
            words_per_minute,
            sections: Vec::new(),
            references: Vec::new(),
            anchors,
            stack: Vec::new(),
            heading: None,
            link: None,
            body: String::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                self.close_section();
                self.heading = Some(PendingHeading {
                    level: heading_level_to_num(level),
                    id: id.map(|id| id.to_string()),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => self.open_section(),
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.link = Some((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Link) => {
                if let Some((target, text)) = self.link.take() {
                    self.references
                        .push(CrossReference::new(self.source, target, text.trim()));
                }
            }
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.push_text(" "),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote(_)
                | TagEnd::TableRow
                | TagEnd::TableHead,
            ) => {
                if self.heading.is_none() {
                    self.body.push('\n');
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, link_text)) = &mut self.link {
            link_text.push_str(text);
        }
        match &mut self.heading {
            Some(heading) => heading.text.push_str(text),
            None => self.body.push_str(text),
        }
    }

    fn open_section(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };

        let title = heading.text.trim().to_owned();
        // Explicit ids are reserved up front by `extract`.
        let anchor = match heading.id {
            Some(id) => id,
            None if slugify(&title).is_empty() => self.anchors.generate("heading"),
            None => self.anchors.generate(&title),
        };

        let index = self.sections.len();
        let mut section =
            ContentSection::new(format!("section-{}", index + 1), title, heading.level, anchor);

        while self
            .stack
            .last()
            .is_some_and(|&top| self.sections[top].level >= heading.level)
        {
            self.stack.pop();
        }
        if let Some(&parent) = self.stack.last() {
            section.parent_id = Some(self.sections[parent].id.clone());
            self.sections[parent].child_ids.push(section.id.clone());
        }

        self.sections.push(section);
        self.stack.push(index);
        self.body.clear();
    }

    fn close_section(&mut self) {
        let body = std::mem::take(&mut self.body);
        if let Some(section) = self.sections.last_mut() {
            section.set_content(body.trim().to_owned(), self.words_per_minute);
        }
    }

    fn finish(mut self) -> ParsedDocument {
        self.close_section();
        ParsedDocument {
            source: self.source.to_owned(),
            sections: self.sections,
            references: self.references,
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
