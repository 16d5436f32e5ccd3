//! Navigation model for Markdown documents.
//!
//! Turns documents into heading sections and cross references, then builds
//! the navigation data a documentation UI renders: a table of contents,
//! breadcrumb trails and an incoming/outgoing link graph.
//!
//! # Example
//!
//! ```
//! use mdc_navigation::{NavigationBuilder, SectionExtractor};
//!
//! let doc = SectionExtractor::new().extract(
//!     "/docs/guide",
//!     "# Guide\n\n## Install\n\nSee [usage](#usage).\n\n## Usage\n\nRun it.",
//! );
//!
//! let mut builder = NavigationBuilder::new();
//! let state = builder.navigation_context("/docs/guide", &[doc]);
//!
//! assert_eq!(state.toc.sections[0].children.len(), 2);
//! assert_eq!(state.breadcrumbs.current.title, "Guide");
//! assert!(state.cross_links["/docs/guide"].outgoing[0].resolved);
//! ```

mod anchor;
mod breadcrumbs;
mod links;
mod routes;
mod section;
mod state;
mod toc;

pub use anchor::{
    AnchorLink, UniqueAnchors, closest_heading, create_anchor_link, is_valid_anchor_id,
    sanitize_anchor_id, slugify,
};
pub use breadcrumbs::{
    BreadcrumbItem, BreadcrumbTrail, Breadcrumbs, DEFAULT_ROOT_HREF, DEFAULT_ROOT_TITLE,
    format_segment_title,
};
pub use links::{
    LinkEntry, LinkMap, ProcessedLink, is_valid_anchor, is_valid_url, link_id, parent_path,
    resolve_internal_link, resolve_relative_path,
};
pub use routes::{RouteMap, SectionRoute, extract_description, section_routes};
pub use section::{
    ContentSection, CrossReference, DEFAULT_WORDS_PER_MINUTE, LinkKind, ParsedDocument,
    SectionExtractor, read_time,
};
pub use state::{NavigationBuilder, NavigationState};
pub use toc::{TableOfContents, TocNode, build_toc};
