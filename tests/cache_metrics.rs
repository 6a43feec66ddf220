use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
    middleware,
    routing::get,
};
use bulletin::cache::{
    CacheCatalog, CacheConfig, CacheInvalidator, CacheStatsState, ResponseCache,
    ResponseCacheState, RevalidateError, Revalidator, response_cache_layer,
};
use metrics_util::debugging::DebuggingRecorder;
use tower::ServiceExt;

struct RejectAbout;

#[async_trait]
impl Revalidator for RejectAbout {
    async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
        if path == "/about" {
            Err(RevalidateError::new("frontend returned 500"))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let invalidator = CacheInvalidator::new(
        Arc::new(CacheCatalog::site()),
        Arc::new(RejectAbout),
        Arc::new(CacheStatsState::new()),
    );
    let report = invalidator.clear_all().await;
    assert_eq!(report.failed.len(), 1);

    let cache_state = ResponseCacheState {
        config: CacheConfig::default(),
        cache: ResponseCache::new(4),
    };
    let app = Router::new()
        .route("/api/hero", get(|| async { "[]" }))
        .layer(middleware::from_fn_with_state(
            cache_state,
            response_cache_layer,
        ));

    for uri in ["/api/hero", "/api/hero"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "bulletin_cache_revalidate_total",
        "bulletin_cache_clear_ms",
        "bulletin_response_cache_hit_total",
        "bulletin_response_cache_miss_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
