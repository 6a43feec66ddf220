//! Static catalog of logical cache entries.
//!
//! Entry paths are route templates: a `[name]` segment stands for any single
//! path segment, so `/articles/[slug]` covers every article detail page.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CacheError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheEntryKind {
    Page,
    Api,
    Data,
}

impl CacheEntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheEntryKind::Page => "page",
            CacheEntryKind::Api => "api",
            CacheEntryKind::Data => "data",
        }
    }
}

impl fmt::Display for CacheEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheEntryKind {
    type Err = CacheError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "page" => Ok(CacheEntryKind::Page),
            "api" => Ok(CacheEntryKind::Api),
            "data" => Ok(CacheEntryKind::Data),
            other => Err(CacheError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: CacheEntryKind,
    pub path: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const fn entry(
    id: &'static str,
    kind: CacheEntryKind,
    path: &'static str,
    label: &'static str,
    description: &'static str,
) -> CacheEntry {
    CacheEntry {
        id,
        kind,
        path,
        label,
        description,
    }
}

use CacheEntryKind::{Api, Data, Page};

pub const SITE_CACHE_ENTRIES: &[CacheEntry] = &[
    entry("home", Page, "/", "Home page", "Hero banners, latest articles and upcoming events"),
    entry("articles", Page, "/articles", "Articles", "Article listing"),
    entry("article-detail", Page, "/articles/[slug]", "Article detail", "Single article pages"),
    entry("gallery", Page, "/gallery", "Gallery", "Image and video gallery"),
    entry("faq", Page, "/faq", "FAQ", "Frequently asked questions"),
    entry("schedule", Page, "/schedule", "Schedule", "Event schedule"),
    entry("about", Page, "/about", "About", "About page content block"),
    entry("contact", Page, "/contact", "Contact", "Contact page and form"),
    entry("api-settings", Api, "/api/settings", "Settings API", "Public site settings"),
    entry(
        "api-page-content",
        Api,
        "/api/page-content",
        "Page content API",
        "Active content blocks",
    ),
    entry(
        "api-page-content-detail",
        Api,
        "/api/page-content/[pageKey]",
        "Page content detail API",
        "Single content block by key",
    ),
    entry("api-articles", Api, "/api/articles", "Articles API", "Published articles"),
    entry(
        "api-article-detail",
        Api,
        "/api/articles/[slug]",
        "Article detail API",
        "Single published article",
    ),
    entry("api-faqs", Api, "/api/faqs", "FAQ API", "Active questions"),
    entry("api-hero", Api, "/api/hero", "Hero API", "Active hero banners"),
    entry("api-gallery", Api, "/api/gallery", "Gallery API", "Categories and media"),
    entry("api-schedule", Api, "/api/schedule", "Schedule API", "Upcoming events"),
    entry(
        "data-settings",
        Data,
        "/data/settings",
        "Settings data",
        "Settings shared by every page layout",
    ),
    entry(
        "data-navigation",
        Data,
        "/data/navigation",
        "Navigation data",
        "Header and footer links derived from content",
    ),
];

/// Catalog of cache entries an invalidator may revalidate.
#[derive(Debug, Clone)]
pub struct CacheCatalog {
    entries: Vec<CacheEntry>,
}

impl CacheCatalog {
    /// Build a catalog; entry ids must be unique.
    pub fn new(entries: Vec<CacheEntry>) -> Result<Self, CacheError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(CacheError::DuplicateEntry(entry.id.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// The catalog of the public site.
    pub fn site() -> Self {
        Self {
            entries: SITE_CACHE_ENTRIES.to_vec(),
        }
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&CacheEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn of_kind(&self, kind: CacheEntryKind) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Whether `path` is a catalog path or a concrete path one of the templates covers.
    pub fn is_registered(&self, path: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.path == path || template_matches(entry.path, path))
    }
}

/// Match a concrete path (or a template) against a route template segment by segment.
pub fn template_matches(template: &str, path: &str) -> bool {
    let template_segments: Vec<&str> = split_segments(template).collect();
    let path_segments: Vec<&str> = split_segments(path).collect();

    if template_segments.len() != path_segments.len() {
        return false;
    }

    template_segments
        .iter()
        .zip(&path_segments)
        .all(|(expected, actual)| is_placeholder(expected) || expected == actual)
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.trim_end_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
}

fn is_placeholder(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']')
}
