//! Table of contents.

use serde::Serialize;

use crate::anchor::AnchorLink;
use crate::section::{ContentSection, ParsedDocument};

/// Node of the heading hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocNode {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub anchor: String,
    pub children: Vec<TocNode>,
}

impl TocNode {
    fn leaf(section: &ContentSection) -> Self {
        Self {
            id: section.id.clone(),
            title: section.title.clone(),
            level: section.level,
            anchor: section.anchor.clone(),
            children: Vec::new(),
        }
    }
}

/// Heading hierarchy across a set of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    /// Top-level nodes.
    pub sections: Vec<TocNode>,
    /// Deepest heading level seen, 0 when empty.
    pub depth: u8,
    /// Every heading in document order, for scroll tracking.
    pub anchors: Vec<AnchorLink>,
}

/// Build the table of contents for `documents`.
///
/// Sections are taken in document order. Each section nests under the
/// nearest preceding section with a strictly lower level; a section with
/// no such predecessor is top-level.
///
/// # Example
///
/// ```
/// use mdc_navigation::{ContentSection, ParsedDocument, build_toc};
///
/// let sections = [1, 2, 2, 1]
///     .iter()
///     .enumerate()
///     .map(|(i, &level)| ContentSection::new(format!("s{i}"), format!("S{i}"), level, format!("s{i}")))
///     .collect();
/// let doc = ParsedDocument { sections, ..Default::default() };
///
/// let toc = build_toc(&[doc]);
/// assert_eq!(toc.sections.len(), 2);
/// assert_eq!(toc.sections[0].children.len(), 2);
/// assert!(toc.sections[1].children.is_empty());
/// ```
#[must_use]
pub fn build_toc(documents: &[ParsedDocument]) -> TableOfContents {
    let sections: Vec<&ContentSection> = documents.iter().flat_map(|d| &d.sections).collect();

    let anchors = sections
        .iter()
        .map(|s| AnchorLink {
            id: s.id.clone(),
            text: s.title.clone(),
            href: format!("#{}", s.anchor),
            level: s.level,
        })
        .collect();
    let depth = sections.iter().map(|s| s.level).max().unwrap_or(0);

    let mut pos = 0;
    let roots = nest(&sections, &mut pos, None);

    tracing::debug!(depth, nodes = sections.len(), "Built table of contents");

    TableOfContents {
        sections: roots,
        depth,
        anchors,
    }
}

/// Collect nodes starting at `pos` while their level is deeper than
/// `parent_level`. Equivalent to the monotonic stack: a node is closed as
/// soon as a section at the same or a shallower level appears.
fn nest(sections: &[&ContentSection], pos: &mut usize, parent_level: Option<u8>) -> Vec<TocNode> {
    let mut nodes = Vec::new();

    while let Some(section) = sections.get(*pos) {
        if parent_level.is_some_and(|parent| section.level <= parent) {
            break;
        }
        *pos += 1;

        let mut node = TocNode::leaf(section);
        node.children = nest(sections, pos, Some(section.level));
        nodes.push(node);
    }

    nodes
}
