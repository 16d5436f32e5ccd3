//! Document set composition for mdc.
//!
//! Ties the component engine and the navigation builder together for a set
//! of Markdown documents:
//!
//! - [`split_front_matter`] / [`validate_front_matter`]: YAML front matter
//! - [`shared_registry`]: a component registry shared behind `Arc<RwLock<_>>`
//! - [`DocumentSet`]: rendered documents plus their navigation state
//!
//! # Example
//!
//! ```
//! use mdc_config::Config;
//! use mdc_site::{DocumentSet, shared_registry};
//!
//! let config = Config::default();
//! let registry = shared_registry(&config.components);
//! let set = DocumentSet::build(
//!     &config,
//!     &registry,
//!     [("/docs/intro", "---\ntitle: Intro\n---\n# Intro\n\n<Alert />\n")],
//! )
//! .unwrap();
//!
//! let intro = set.get("/docs/intro").unwrap();
//! assert!(intro.validation.is_valid);
//! assert_eq!(set.navigation_state("/docs/intro").breadcrumbs.current.title, "Intro");
//! ```

mod frontmatter;
mod site;

pub use frontmatter::{
    FrontMatter, FrontMatterError, split_front_matter, strip_front_matter, validate_front_matter,
};
pub use site::{
    Document, DocumentSet, SharedRegistry, SiteError, build_registry, shared_registry,
};
