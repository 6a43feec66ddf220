//! Cache catalog, revalidation and the public response cache.
//!
//! Content writes revalidate the catalog entries they affect. Operators can
//! clear one path, every entry of a kind, or the whole catalog from the admin
//! API. Each revalidation goes through a [`Revalidator`]: the in-process
//! [`ResponseCache`] always, plus an optional frontend webhook.
//!
//! ```toml
//! [cache]
//! enable_response_cache = true
//! response_limit = 500
//! webhook_url = "http://frontend:3000/api/revalidate"
//! ```

mod catalog;
mod config;
mod invalidator;
mod lock;
mod middleware;
mod response;
mod revalidate;
mod stats;

use thiserror::Error;

pub use catalog::{CacheCatalog, CacheEntry, CacheEntryKind, SITE_CACHE_ENTRIES, template_matches};
pub use config::CacheConfig;
pub use invalidator::{CacheInvalidator, ClearReport, FailedPath};
pub use middleware::{ResponseCacheState, response_cache_layer};
pub use response::{CachedResponse, ResponseCache};
pub use revalidate::{
    FanoutRevalidator, LocalRevalidator, RevalidateError, Revalidator, WebhookRevalidator,
};
pub use stats::{CacheHealth, CacheStats, CacheStatsState};

pub(crate) const METRIC_REVALIDATE_TOTAL: &str = "bulletin_cache_revalidate_total";
pub(crate) const METRIC_CLEAR_MS: &str = "bulletin_cache_clear_ms";
pub(crate) const METRIC_RESPONSE_HIT_TOTAL: &str = "bulletin_response_cache_hit_total";
pub(crate) const METRIC_RESPONSE_MISS_TOTAL: &str = "bulletin_response_cache_miss_total";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("`{0}` is not a registered cache path")]
    InvalidTarget(String),
    #[error("unknown cache type `{0}` (expected page, api or data)")]
    InvalidType(String),
    #[error("duplicate cache entry id `{0}`")]
    DuplicateEntry(String),
}
