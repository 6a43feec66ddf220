//! Cache configuration.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

const DEFAULT_RESPONSE_LIMIT: usize = 500;
const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_SECRET_HEADER: &str = "x-revalidate-secret";

/// Cache configuration from the `[cache]` section.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache successful public GET responses in process.
    pub enable_response_cache: bool,
    /// Maximum cached responses; new responses are not stored beyond it.
    pub response_limit: usize,
    /// Optional frontend endpoint told about every revalidated path.
    pub webhook_url: Option<Url>,
    /// Shared secret sent with every webhook call.
    pub webhook_secret: Option<String>,
    pub webhook_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_response_cache: true,
            response_limit: DEFAULT_RESPONSE_LIMIT,
            webhook_url: None,
            webhook_secret: None,
            webhook_timeout_ms: DEFAULT_WEBHOOK_TIMEOUT_MS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enable_response_cache: settings.enable_response_cache,
            response_limit: settings.response_limit,
            webhook_url: settings.webhook_url.clone(),
            webhook_secret: settings.webhook_secret.clone(),
            webhook_timeout_ms: settings.webhook_timeout_ms,
        }
    }
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("enable_response_cache", &self.enable_response_cache)
            .field("response_limit", &self.response_limit)
            .field("webhook_url", &self.webhook_url.as_ref().map(Url::as_str))
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("webhook_timeout_ms", &self.webhook_timeout_ms)
            .finish()
    }
}

impl CacheConfig {
    /// Webhook timeout, never below one millisecond.
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_local_cache_only() {
        let config = CacheConfig::default();
        assert!(config.enable_response_cache);
        assert!(config.webhook_url.is_none());
        assert_eq!(config.response_limit, DEFAULT_RESPONSE_LIMIT);
    }

    #[test]
    fn debug_output_hides_webhook_secret() {
        let config = CacheConfig {
            webhook_secret: Some("frontend-shared-secret".into()),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("frontend-shared-secret"));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = CacheConfig {
            webhook_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.webhook_timeout(), Duration::from_millis(1));
    }
}
