//! Advisory statistics about cache invalidation.

use std::sync::RwLock;

use serde::Serialize;
use time::OffsetDateTime;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealth {
    Healthy,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_paths: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_cleared: Option<OffsetDateTime>,
    pub cache_size: usize,
    pub status: CacheHealth,
}

#[derive(Debug)]
struct StatsInner {
    last_cleared: Option<OffsetDateTime>,
    status: CacheHealth,
}

/// Process-lifetime invalidation state, owned by whoever constructs the invalidator.
///
/// Concurrent clears race on `last_cleared`; the last writer wins.
#[derive(Debug)]
pub struct CacheStatsState {
    inner: RwLock<StatsInner>,
}

impl CacheStatsState {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StatsInner {
                last_cleared: None,
                status: CacheHealth::Healthy,
            }),
        }
    }

    /// Record the outcome of one batch of revalidations.
    pub fn record_batch(&self, succeeded: usize, failed: usize, at: OffsetDateTime) {
        if succeeded == 0 && failed == 0 {
            return;
        }
        let mut inner = rw_write(&self.inner, SOURCE, "record_batch");
        if succeeded > 0 {
            inner.last_cleared = Some(at);
        }
        inner.status = match (succeeded, failed) {
            (_, 0) => CacheHealth::Healthy,
            (0, _) => CacheHealth::Error,
            _ => CacheHealth::Warning,
        };
    }

    pub fn snapshot(&self, total_paths: usize, cache_size: usize) -> CacheStats {
        let inner = rw_read(&self.inner, SOURCE, "snapshot");
        CacheStats {
            total_paths,
            last_cleared: inner.last_cleared,
            cache_size,
            status: inner.status,
        }
    }
}

impl Default for CacheStatsState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn starts_healthy_and_never_cleared() {
        let stats = CacheStatsState::new().snapshot(3, 0);
        assert_eq!(stats.status, CacheHealth::Healthy);
        assert_eq!(stats.last_cleared, None);
        assert_eq!(stats.total_paths, 3);
    }

    #[test]
    fn status_follows_batch_outcome() {
        let state = CacheStatsState::new();
        let first = datetime!(2025-01-01 10:00 UTC);
        let second = datetime!(2025-01-01 11:00 UTC);

        state.record_batch(2, 1, first);
        let stats = state.snapshot(3, 0);
        assert_eq!(stats.status, CacheHealth::Warning);
        assert_eq!(stats.last_cleared, Some(first));

        state.record_batch(0, 3, second);
        let stats = state.snapshot(3, 0);
        assert_eq!(stats.status, CacheHealth::Error);
        assert_eq!(stats.last_cleared, Some(first), "failed batch keeps timestamp");

        state.record_batch(3, 0, second);
        assert_eq!(state.snapshot(3, 0).status, CacheHealth::Healthy);
        assert_eq!(state.snapshot(3, 0).last_cleared, Some(second));
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let state = CacheStatsState::new();
        state.record_batch(0, 0, datetime!(2025-01-01 10:00 UTC));
        assert_eq!(state.snapshot(0, 0).last_cleared, None);
    }
}
