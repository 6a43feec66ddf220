//! Catalog entries each kind of content write makes stale.

use tracing::warn;

use crate::cache::CacheInvalidator;

pub const SETTINGS_ENTRIES: &[&str] = &[
    "home",
    "contact",
    "api-settings",
    "data-settings",
    "data-navigation",
];
pub const PAGE_CONTENT_ENTRIES: &[&str] = &[
    "about",
    "contact",
    "api-page-content",
    "api-page-content-detail",
    "data-navigation",
];
pub const ARTICLE_ENTRIES: &[&str] = &[
    "home",
    "articles",
    "article-detail",
    "api-articles",
    "api-article-detail",
];
pub const FAQ_ENTRIES: &[&str] = &["faq", "api-faqs"];
pub const HERO_ENTRIES: &[&str] = &["home", "api-hero"];
pub const GALLERY_ENTRIES: &[&str] = &["gallery", "api-gallery"];
pub const SCHEDULE_ENTRIES: &[&str] = &["schedule", "api-schedule"];

/// Revalidate after a successful write. Failures are logged; the write stands.
pub(crate) async fn revalidate(
    cache: Option<&CacheInvalidator>,
    source: &'static str,
    entries: &[&str],
) {
    let Some(cache) = cache else {
        return;
    };
    let report = cache.clear_entries(entries).await;
    if !report.is_complete() {
        warn!(
            source,
            failed = report.failed.len(),
            succeeded = report.succeeded.len(),
            "content saved but cache revalidation was incomplete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheCatalog;

    #[test]
    fn every_entry_id_exists_in_site_catalog() {
        let catalog = CacheCatalog::site();
        for ids in [
            SETTINGS_ENTRIES,
            PAGE_CONTENT_ENTRIES,
            ARTICLE_ENTRIES,
            FAQ_ENTRIES,
            HERO_ENTRIES,
            GALLERY_ENTRIES,
            SCHEDULE_ENTRIES,
        ] {
            for id in ids {
                assert!(catalog.find(id).is_some(), "missing catalog entry `{id}`");
            }
        }
    }
}
