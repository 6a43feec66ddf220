//! Mechanisms that make a cached path fresh again.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{
    CacheConfig,
    config::DEFAULT_SECRET_HEADER,
    response::ResponseCache,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RevalidateError(pub String);

impl RevalidateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Revalidates a single catalog path.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate(&self, path: &str) -> Result<(), RevalidateError>;

    /// Responses currently held by this mechanism, if it keeps any locally.
    async fn cached_entries(&self) -> usize {
        0
    }
}

/// Drops matching responses from the in-process response cache.
#[derive(Clone)]
pub struct LocalRevalidator {
    cache: ResponseCache,
}

impl LocalRevalidator {
    pub fn new(cache: ResponseCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Revalidator for LocalRevalidator {
    async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
        let removed = self.cache.invalidate_matching(path).await;
        debug!(path, removed, "dropped cached responses");
        Ok(())
    }

    async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    path: &'a str,
}

/// Notifies a frontend renderer that a path changed.
#[derive(Clone)]
pub struct WebhookRevalidator {
    client: Client,
    endpoint: Url,
    secret: Option<String>,
}

impl WebhookRevalidator {
    pub fn new(client: Client, endpoint: Url, secret: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            secret,
        }
    }

    /// Build from config; `None` when no webhook is configured.
    pub fn from_config(config: &CacheConfig) -> Result<Option<Self>, RevalidateError> {
        let Some(endpoint) = config.webhook_url.clone() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(config.webhook_timeout())
            .build()
            .map_err(|err| RevalidateError::new(format!("failed to build webhook client: {err}")))?;
        Ok(Some(Self::new(
            client,
            endpoint,
            config.webhook_secret.clone(),
        )))
    }
}

#[async_trait]
impl Revalidator for WebhookRevalidator {
    async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&WebhookPayload { path });
        if let Some(secret) = &self.secret {
            request = request.header(DEFAULT_SECRET_HEADER, secret);
        }

        let response = request
            .send()
            .await
            .map_err(|err| RevalidateError::new(format!("webhook request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RevalidateError::new(format!(
                "webhook responded with {status}"
            )));
        }
        Ok(())
    }
}

/// Runs every inner revalidator; a path fails when any of them fails.
#[derive(Clone, Default)]
pub struct FanoutRevalidator {
    targets: Vec<Arc<dyn Revalidator>>,
}

impl FanoutRevalidator {
    pub fn new(targets: Vec<Arc<dyn Revalidator>>) -> Self {
        Self { targets }
    }

    pub fn push(&mut self, target: Arc<dyn Revalidator>) {
        self.targets.push(target);
    }
}

#[async_trait]
impl Revalidator for FanoutRevalidator {
    async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
        let mut errors = Vec::new();
        for target in &self.targets {
            if let Err(err) = target.revalidate(path).await {
                errors.push(err.0);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RevalidateError::new(errors.join("; ")))
        }
    }

    async fn cached_entries(&self) -> usize {
        let mut total = 0;
        for target in &self.targets {
            total += target.cached_entries().await;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use bytes::Bytes;

    use super::super::response::CachedResponse;
    use super::*;

    struct Failing;

    #[async_trait]
    impl Revalidator for Failing {
        async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
            Err(RevalidateError::new(format!("renderer down for {path}")))
        }
    }

    #[tokio::test]
    async fn local_revalidator_reports_cache_size() {
        let cache = ResponseCache::new(10);
        cache
            .put(
                "/gallery",
                "",
                CachedResponse::new(StatusCode::OK, &HeaderMap::new(), Bytes::new()),
            )
            .await;
        let local = LocalRevalidator::new(cache);
        assert_eq!(local.cached_entries().await, 1);
        local.revalidate("/gallery").await.unwrap();
        assert_eq!(local.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn fanout_fails_when_any_target_fails() {
        let cache = ResponseCache::new(10);
        let fanout = FanoutRevalidator::new(vec![
            Arc::new(LocalRevalidator::new(cache)),
            Arc::new(Failing),
        ]);
        let err = fanout.revalidate("/faq").await.unwrap_err();
        assert_eq!(err.0, "renderer down for /faq");
    }

    #[test]
    fn webhook_is_optional() {
        assert!(
            WebhookRevalidator::from_config(&CacheConfig::default())
                .unwrap()
                .is_none()
        );
    }
}
