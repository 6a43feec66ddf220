//! In-process store of rendered public responses, grouped by request path.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::Response,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use thiserror::Error;
use tokio::sync::RwLock;

use super::catalog::template_matches;

type Variants = HashMap<String, CachedResponse>;

#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, Variants>>>,
    limit: usize,
}

impl ResponseCache {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            limit,
        }
    }

    pub async fn get(&self, path: &str, query: &str) -> Option<Response<Body>> {
        let guard = self.entries.read().await;
        guard
            .get(path)
            .and_then(|variants| variants.get(query))
            .cloned()
            .map(CachedResponse::into_response)
    }

    /// Store a response; returns `false` when the cache is full.
    pub async fn put(&self, path: &str, query: &str, response: CachedResponse) -> bool {
        let mut guard = self.entries.write().await;
        let total: usize = guard.values().map(HashMap::len).sum();
        let replacing = guard
            .get(path)
            .is_some_and(|variants| variants.contains_key(query));
        if !replacing && total >= self.limit {
            return false;
        }
        guard
            .entry(path.to_string())
            .or_default()
            .insert(query.to_string(), response);
        true
    }

    /// Drop every cached variant whose path equals or is covered by `target`.
    ///
    /// Returns the number of responses removed.
    pub async fn invalidate_matching(&self, target: &str) -> usize {
        let mut guard = self.entries.write().await;
        let mut removed = 0;
        guard.retain(|path, variants| {
            let hit = path == target || template_matches(target, path);
            if hit {
                removed += variants.len();
            }
            !hit
        });
        removed
    }

    pub async fn len(&self) -> usize {
        let guard = self.entries.read().await;
        guard.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Clone)]
pub struct CachedResponse {
    status: StatusCode,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Bytes,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Self {
        let stored_headers = headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Self {
            status,
            headers: stored_headers,
            body,
        }
    }

    fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.clear();
        for (name, value) in self.headers {
            headers.append(name, value);
        }

        response
    }
}

#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("failed to buffer response body: {0}")]
    Buffer(String),
}

pub fn should_store_response(response: &Response) -> bool {
    if response.status() != StatusCode::OK {
        return false;
    }

    !response.headers().contains_key(header::SET_COOKIE)
}

pub async fn buffer_response(
    response: Response,
) -> Result<(Response, CachedResponse), (Response, CacheStoreError)> {
    let (parts, body) = response.into_parts();
    match BodyExt::collect(body).await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            let cached = CachedResponse::new(parts.status, &parts.headers, bytes.clone());
            let rebuilt = Response::from_parts(parts, Body::from(bytes));
            Ok((rebuilt, cached))
        }
        Err(error) => {
            let rebuilt = Response::from_parts(parts, Body::empty());
            Err((rebuilt, CacheStoreError::Buffer(error.to_string())))
        }
    }
}
