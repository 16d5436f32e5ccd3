//! Breadcrumb trails derived from URL paths.

use serde::Serialize;

/// Root title used when none is configured.
pub const DEFAULT_ROOT_TITLE: &str = "Documentation";

/// Root href used when none is configured.
pub const DEFAULT_ROOT_HREF: &str = "/docs";

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Link target path.
    pub href: String,
    pub is_active: bool,
}

/// Ancestors of the current page plus the page itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbTrail {
    /// Ancestors, root first. The current page is not included.
    pub items: Vec<BreadcrumbItem>,
    pub current: BreadcrumbItem,
}

/// Builds breadcrumb trails below a root item.
#[derive(Clone, Debug)]
pub struct Breadcrumbs {
    root_title: String,
    root_href: String,
}

impl Default for Breadcrumbs {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_TITLE, DEFAULT_ROOT_HREF)
    }
}

impl Breadcrumbs {
    #[must_use]
    pub fn new(root_title: impl Into<String>, root_href: impl Into<String>) -> Self {
        Self {
            root_title: root_title.into(),
            root_href: root_href.into(),
        }
    }

    /// Derive the trail for `path`.
    ///
    /// Leading segments that repeat the root href are skipped, each other
    /// segment becomes an item whose href accumulates below the root, and
    /// the last item becomes `current`. A `#fragment` or `?query` is
    /// ignored. The root path itself yields no items and the root as
    /// `current`.
    ///
    /// # Example
    ///
    /// ```
    /// use mdc_navigation::Breadcrumbs;
    ///
    /// let trail = Breadcrumbs::default().derive("/docs/guide/getting-started");
    /// let titles: Vec<_> = trail.items.iter().map(|i| i.title.as_str()).collect();
    /// assert_eq!(titles, vec!["Documentation", "Guide"]);
    /// assert_eq!(trail.current.title, "Getting Started");
    /// assert_eq!(trail.current.href, "/docs/guide/getting-started");
    /// ```
    #[must_use]
    pub fn derive(&self, path: &str) -> BreadcrumbTrail {
        let path = path.split(['#', '?']).next().unwrap_or_default();
        let root_segments: Vec<&str> = segments(&self.root_href).collect();

        let mut path_segments: Vec<&str> = segments(path).collect();
        if path_segments.starts_with(&root_segments) {
            path_segments.drain(..root_segments.len());
        }

        let mut items = vec![BreadcrumbItem {
            title: self.root_title.clone(),
            href: self.root_href.clone(),
            is_active: false,
        }];

        let mut href = self.root_href.trim_end_matches('/').to_owned();
        for segment in path_segments {
            href.push('/');
            href.push_str(segment);
            items.push(BreadcrumbItem {
                title: format_segment_title(segment),
                href: href.clone(),
                is_active: false,
            });
        }

        let mut current = items.pop().unwrap_or_else(|| BreadcrumbItem {
            title: self.root_title.clone(),
            href: self.root_href.clone(),
            is_active: false,
        });
        current.is_active = true;

        BreadcrumbTrail { items, current }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Title-case a path segment: `getting-started` becomes `Getting Started`.
#[must_use]
pub fn format_segment_title(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
