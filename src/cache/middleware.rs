//! Response cache middleware for the public listener.
//!
//! Serves cached GET responses and stores successful ones keyed by path and query.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::{debug, instrument, warn};

use super::{
    CacheConfig, METRIC_RESPONSE_HIT_TOTAL, METRIC_RESPONSE_MISS_TOTAL,
    response::{ResponseCache, buffer_response, should_store_response},
};

/// Shared cache state for middleware.
#[derive(Clone)]
pub struct ResponseCacheState {
    pub config: CacheConfig,
    pub cache: ResponseCache,
}

#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(state): State<ResponseCacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.enable_response_cache || request.method() != Method::GET {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("").to_string();

    if let Some(cached) = state.cache.get(&path, &query).await {
        counter!(METRIC_RESPONSE_HIT_TOTAL).increment(1);
        debug!(outcome = "hit", "serving cached response");
        return cached;
    }

    counter!(METRIC_RESPONSE_MISS_TOTAL).increment(1);
    debug!(outcome = "miss", "cache miss, executing handler");
    let response = next.run(request).await;
    if !should_store_response(&response) {
        return response;
    }

    match buffer_response(response).await {
        Ok((rebuilt, cached)) => {
            if !state.cache.put(&path, &query, cached).await {
                debug!(limit = state.config.response_limit, "response cache full");
            }
            rebuilt
        }
        Err((rebuilt, error)) => {
            warn!(error = %error, "failed to buffer response for caching");
            rebuilt
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn router(state: ResponseCacheState, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/api/faqs",
                get(move || {
                    let hits = hits.clone();
                    async move { format!("call {}", hits.fetch_add(1, Ordering::SeqCst) + 1) }
                }),
            )
            .layer(from_fn_with_state(state, response_cache_layer))
    }

    async fn body_of(router: &Router, uri: &str) -> String {
        let response = router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache_until_invalidated() {
        let cache = ResponseCache::new(10);
        let state = ResponseCacheState {
            config: CacheConfig::default(),
            cache: cache.clone(),
        };
        let hits = Arc::new(AtomicUsize::new(0));
        let app = router(state, hits.clone());

        assert_eq!(body_of(&app, "/api/faqs").await, "call 1");
        assert_eq!(body_of(&app, "/api/faqs").await, "call 1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        cache.invalidate_matching("/api/faqs").await;
        assert_eq!(body_of(&app, "/api/faqs").await, "call 2");
    }

    #[tokio::test]
    async fn disabled_cache_always_runs_handler() {
        let state = ResponseCacheState {
            config: CacheConfig {
                enable_response_cache: false,
                ..Default::default()
            },
            cache: ResponseCache::new(10),
        };
        let hits = Arc::new(AtomicUsize::new(0));
        let app = router(state, hits.clone());

        body_of(&app, "/api/faqs").await;
        body_of(&app, "/api/faqs").await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
