//! Revalidation of catalog entries on demand and after content writes.

use std::{sync::Arc, time::Instant};

use futures::future::join_all;
use metrics::{counter, histogram};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    CacheError, METRIC_CLEAR_MS, METRIC_REVALIDATE_TOTAL,
    catalog::{CacheCatalog, CacheEntryKind},
    revalidate::Revalidator,
    stats::{CacheStats, CacheStatsState},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPath {
    pub path: String,
    pub error: String,
}

/// Per-path outcome of one clear request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedPath>,
}

impl ClearReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Some paths succeeded and some failed.
    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Clears catalog entries through a [`Revalidator`] and tracks [`CacheStats`].
#[derive(Clone)]
pub struct CacheInvalidator {
    catalog: Arc<CacheCatalog>,
    revalidator: Arc<dyn Revalidator>,
    stats: Arc<CacheStatsState>,
}

impl CacheInvalidator {
    pub fn new(
        catalog: Arc<CacheCatalog>,
        revalidator: Arc<dyn Revalidator>,
        stats: Arc<CacheStatsState>,
    ) -> Self {
        Self {
            catalog,
            revalidator,
            stats,
        }
    }

    pub fn catalog(&self) -> &CacheCatalog {
        &self.catalog
    }

    pub async fn stats(&self) -> CacheStats {
        let cache_size = self.revalidator.cached_entries().await;
        self.stats.snapshot(self.catalog.len(), cache_size)
    }

    /// Revalidate one registered path.
    pub async fn clear_path(&self, path: &str) -> Result<ClearReport, CacheError> {
        if path.trim().is_empty() || !self.catalog.is_registered(path) {
            return Err(CacheError::InvalidTarget(path.to_string()));
        }
        Ok(self.run("path", vec![path.to_string()]).await)
    }

    /// Revalidate every entry of a kind (`page`, `api` or `data`).
    pub async fn clear_by_type(&self, kind: &str) -> Result<ClearReport, CacheError> {
        let kind: CacheEntryKind = kind.parse()?;
        let paths = self
            .catalog
            .of_kind(kind)
            .map(|entry| entry.path.to_string())
            .collect();
        Ok(self.run(kind.as_str(), paths).await)
    }

    pub async fn clear_all(&self) -> ClearReport {
        let paths = self
            .catalog
            .entries()
            .iter()
            .map(|entry| entry.path.to_string())
            .collect();
        self.run("all", paths).await
    }

    /// Revalidate the entries a content write affected. Unknown ids are skipped.
    pub async fn clear_entries(&self, ids: &[&str]) -> ClearReport {
        let mut paths: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            match self.catalog.find(id) {
                Some(entry) => {
                    if !paths.iter().any(|path| path == entry.path) {
                        paths.push(entry.path.to_string());
                    }
                }
                None => warn!(entry_id = *id, "skipping unknown cache entry"),
            }
        }
        self.run("entries", paths).await
    }

    async fn run(&self, scope: &'static str, paths: Vec<String>) -> ClearReport {
        let started_at = Instant::now();
        let outcomes = join_all(paths.iter().map(|path| self.revalidator.revalidate(path))).await;

        let mut report = ClearReport::default();
        for (path, outcome) in paths.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.succeeded.push(path),
                Err(err) => {
                    warn!(path = %path, error = %err, "cache revalidation failed");
                    report.failed.push(FailedPath {
                        path,
                        error: err.to_string(),
                    });
                }
            }
        }

        self.stats.record_batch(
            report.succeeded.len(),
            report.failed.len(),
            OffsetDateTime::now_utc(),
        );

        counter!(METRIC_REVALIDATE_TOTAL, "outcome" => "success")
            .increment(report.succeeded.len() as u64);
        counter!(METRIC_REVALIDATE_TOTAL, "outcome" => "failure")
            .increment(report.failed.len() as u64);
        histogram!(METRIC_CLEAR_MS, "scope" => scope)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        info!(
            scope,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "cache clear complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::super::{
        catalog::CacheEntry,
        revalidate::RevalidateError,
        stats::CacheHealth,
    };
    use super::*;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
        failing: HashSet<&'static str>,
    }

    impl Recording {
        fn failing(paths: &[&'static str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: paths.iter().copied().collect(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Revalidator for Recording {
        async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
            self.calls.lock().unwrap().push(path.to_string());
            if self.failing.contains(path) {
                Err(RevalidateError::new("upstream timeout"))
            } else {
                Ok(())
            }
        }

        async fn cached_entries(&self) -> usize {
            7
        }
    }

    fn three_path_catalog() -> CacheCatalog {
        CacheCatalog::new(vec![
            CacheEntry {
                id: "home",
                kind: CacheEntryKind::Page,
                path: "/",
                label: "Home",
                description: "",
            },
            CacheEntry {
                id: "article-detail",
                kind: CacheEntryKind::Page,
                path: "/articles/[slug]",
                label: "Article",
                description: "",
            },
            CacheEntry {
                id: "api-faqs",
                kind: CacheEntryKind::Api,
                path: "/api/faqs",
                label: "FAQ API",
                description: "",
            },
        ])
        .unwrap()
    }

    fn invalidator(revalidator: Arc<Recording>) -> CacheInvalidator {
        CacheInvalidator::new(
            Arc::new(three_path_catalog()),
            revalidator,
            Arc::new(CacheStatsState::new()),
        )
    }

    #[tokio::test]
    async fn partial_failure_is_reported_per_path() {
        let revalidator = Arc::new(Recording::failing(&["/api/faqs"]));
        let invalidator = invalidator(revalidator.clone());

        let report = invalidator.clear_all().await;

        assert_eq!(report.succeeded, vec!["/", "/articles/[slug]"]);
        assert_eq!(
            report.failed,
            vec![FailedPath {
                path: "/api/faqs".into(),
                error: "upstream timeout".into(),
            }]
        );
        assert!(report.is_partial());

        let stats = invalidator.stats().await;
        assert_eq!(stats.status, CacheHealth::Warning);
        assert!(stats.last_cleared.is_some());
        assert_eq!(stats.total_paths, 3);
        assert_eq!(stats.cache_size, 7);
    }

    #[tokio::test]
    async fn total_failure_keeps_last_cleared_unset() {
        let revalidator = Arc::new(Recording::failing(&["/api/faqs"]));
        let invalidator = invalidator(revalidator);

        let report = invalidator.clear_path("/api/faqs").await.unwrap();
        assert!(report.succeeded.is_empty());

        let stats = invalidator.stats().await;
        assert_eq!(stats.status, CacheHealth::Error);
        assert_eq!(stats.last_cleared, None);
    }

    #[tokio::test]
    async fn unregistered_and_empty_paths_are_invalid_targets() {
        let revalidator = Arc::new(Recording::default());
        let invalidator = invalidator(revalidator.clone());

        assert_eq!(
            invalidator.clear_path("/nope").await,
            Err(CacheError::InvalidTarget("/nope".into()))
        );
        assert_eq!(
            invalidator.clear_path("").await,
            Err(CacheError::InvalidTarget(String::new()))
        );
        assert!(revalidator.calls().is_empty());
        assert_eq!(invalidator.stats().await.last_cleared, None);
    }

    #[tokio::test]
    async fn concrete_paths_under_templates_are_accepted() {
        let revalidator = Arc::new(Recording::default());
        let invalidator = invalidator(revalidator.clone());

        let report = invalidator.clear_path("/articles/open-day").await.unwrap();
        assert_eq!(report.succeeded, vec!["/articles/open-day"]);
        assert_eq!(revalidator.calls(), vec!["/articles/open-day"]);
    }

    #[tokio::test]
    async fn clear_by_type_selects_kind_and_rejects_unknown() {
        let revalidator = Arc::new(Recording::default());
        let invalidator = invalidator(revalidator.clone());

        let report = invalidator.clear_by_type("page").await.unwrap();
        assert_eq!(report.succeeded, vec!["/", "/articles/[slug]"]);

        assert_eq!(
            invalidator.clear_by_type("pages").await,
            Err(CacheError::InvalidType("pages".into()))
        );
        assert_eq!(revalidator.calls().len(), 2);
    }

    #[tokio::test]
    async fn clear_entries_skips_unknown_ids_and_duplicates() {
        let revalidator = Arc::new(Recording::default());
        let invalidator = invalidator(revalidator.clone());

        let report = invalidator
            .clear_entries(&["home", "missing", "home", "api-faqs"])
            .await;
        assert_eq!(report.succeeded, vec!["/", "/api/faqs"]);
        assert_eq!(revalidator.calls().len(), 2);
    }
}
