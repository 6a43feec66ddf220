use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bulletin::application::repos::{ScheduleEventParams, ScheduleRepo};
use bulletin::cache::{
    CacheCatalog, CacheConfig, CacheEntry, CacheEntryKind, CacheInvalidator, CacheStatsState,
    RevalidateError, Revalidator,
};
use bulletin::infra::{
    bootstrap::AppContext,
    http::{build_admin_router, build_public_router},
    memory::MemoryRepositories,
    store::Datastore,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower::ServiceExt;

const TOKEN: &str = "integration-admin-token";

struct Harness {
    memory: MemoryRepositories,
    context: AppContext,
}

impl Harness {
    fn new() -> Self {
        let memory = MemoryRepositories::new();
        let context = AppContext::build(
            Datastore::Memory(memory.clone()),
            &CacheConfig::default(),
            Some(TOKEN),
        )
        .expect("context builds without a webhook");
        Self { memory, context }
    }

    fn admin(&self) -> Router {
        build_admin_router(self.context.admin.clone(), self.context.admin_token.clone())
    }

    fn public(&self) -> Router {
        build_public_router(self.context.public.clone())
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn admin(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send(router, method, uri, body, Some(TOKEN)).await
}

#[tokio::test]
async fn admin_requests_without_a_valid_token_are_rejected_before_the_store() {
    let harness = Harness::new();
    let router = harness.admin();
    harness.memory.set_offline(true);

    let (status, body) = send(&router, Method::GET, "/settings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(&router, Method::GET, "/settings", None, Some("wrong-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A valid token reaches the (offline) store.
    let (status, _) = admin(&router, Method::GET, "/settings", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn admin_without_configured_token_refuses_everything() {
    let context = AppContext::build(
        Datastore::Memory(MemoryRepositories::new()),
        &CacheConfig::default(),
        None,
    )
    .unwrap();
    let router = build_admin_router(context.admin, context.admin_token);

    let (status, _) = admin(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn settings_upsert_then_read_back() {
    let harness = Harness::new();
    let router = harness.admin();

    let (status, body) = admin(
        &router,
        Method::POST,
        "/settings",
        Some(json!({"key": "site_name", "value": "Harbour Club", "type": "TEXT"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["value"], json!("Harbour Club"));

    let (status, body) = admin(&router, Method::GET, "/settings/site_name", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], json!("TEXT"));

    let (status, _) = admin(&router, Method::GET, "/settings/missing_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn setting_with_unknown_type_is_rejected_and_not_written() {
    let harness = Harness::new();
    let router = harness.admin();

    let (status, body) = admin(
        &router,
        Method::POST,
        "/settings",
        Some(json!({"key": "k", "value": "v", "type": "NOT_A_TYPE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (_, body) = admin(&router, Method::GET, "/settings", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn initializing_settings_twice_inserts_once() {
    let harness = Harness::new();
    let router = harness.admin();

    let (_, predefined) = admin(&router, Method::GET, "/settings/predefined", None).await;
    let expected = predefined["data"].as_array().unwrap().len();

    let (status, first) = admin(&router, Method::POST, "/settings/initialize", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["inserted"], json!(expected));

    let (_, second) = admin(&router, Method::POST, "/settings/initialize", None).await;
    assert_eq!(second["data"]["inserted"], json!(0));

    let (_, all) = admin(&router, Method::GET, "/settings", None).await;
    assert_eq!(all["data"].as_array().unwrap().len(), expected);
}

#[tokio::test]
async fn cache_actions_validate_before_clearing() {
    let harness = Harness::new();
    let router = harness.admin();

    let (status, _) = admin(
        &router,
        Method::POST,
        "/cache",
        Some(json!({"action": "purge"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = admin(
        &router,
        Method::POST,
        "/cache",
        Some(json!({"action": "clear-path", "target": "/not-registered"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, overview) = admin(&router, Method::GET, "/cache", None).await;
    assert_eq!(overview["data"]["stats"]["lastCleared"], Value::Null);

    let (status, body) = admin(
        &router,
        Method::POST,
        "/cache",
        Some(json!({"action": "clear-all"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["failed"].as_array().unwrap().is_empty());
    assert!(body["data"]["stats"]["lastCleared"].is_string());
}

struct FailingFor(&'static str);

#[async_trait]
impl Revalidator for FailingFor {
    async fn revalidate(&self, path: &str) -> Result<(), RevalidateError> {
        if path == self.0 {
            Err(RevalidateError::new("frontend unreachable"))
        } else {
            Ok(())
        }
    }
}

fn three_entry_catalog() -> CacheCatalog {
    let entry = |id, path| CacheEntry {
        id,
        kind: CacheEntryKind::Page,
        path,
        label: id,
        description: "",
    };
    CacheCatalog::new(vec![
        entry("home", "/"),
        entry("faq", "/faq"),
        entry("gallery", "/gallery"),
    ])
    .unwrap()
}

#[tokio::test]
async fn partial_revalidation_failure_is_multi_status() {
    let harness = Harness::new();
    let mut state = harness.context.admin.clone();
    state.cache = CacheInvalidator::new(
        Arc::new(three_entry_catalog()),
        Arc::new(FailingFor("/faq")),
        Arc::new(CacheStatsState::new()),
    );
    let router = build_admin_router(state, harness.context.admin_token.clone());

    let (status, body) = admin(
        &router,
        Method::POST,
        "/cache",
        Some(json!({"action": "clear-all"})),
    )
    .await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"]["succeeded"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["failed"][0]["path"], json!("/faq"));
}

#[tokio::test]
async fn health_reports_backend_and_outage() {
    let harness = Harness::new();
    let router = harness.admin();

    let (status, body) = admin(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["store"], json!("memory"));

    harness.memory.set_offline(true);
    let (status, _) = admin(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn public_settings_are_a_typed_map() {
    let harness = Harness::new();
    let admin_router = harness.admin();
    let public = harness.public();

    for (key, value, kind) in [
        ("site_name", "Harbour Club", "TEXT"),
        ("maintenance_mode", "true", "BOOLEAN"),
        ("social_links", "{\"facebook\":\"fb\"}", "JSON"),
    ] {
        let (status, _) = admin(
            &admin_router,
            Method::POST,
            "/settings",
            Some(json!({"key": key, "value": value, "type": kind})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&public, Method::GET, "/api/settings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["site_name"], json!("Harbour Club"));
    assert_eq!(body["data"]["maintenance_mode"], json!(true));
    assert_eq!(body["data"]["social_links"]["facebook"], json!("fb"));
}

#[tokio::test]
async fn inactive_page_content_is_hidden_from_the_public_api() {
    let harness = Harness::new();
    let admin_router = harness.admin();
    let public = harness.public();

    let (status, _) = admin(
        &admin_router,
        Method::POST,
        "/page-content",
        Some(json!({
            "pageKey": "about",
            "title": "About us",
            "content": "Founded long ago.",
            "metadata": {"address": "X", "phone": "Y"},
            "isActive": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&public, Method::GET, "/api/page-content/about", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = admin(&admin_router, Method::GET, "/page-content/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metadata"], json!({"address": "X", "phone": "Y"}));
}

#[tokio::test]
async fn writes_revalidate_cached_public_responses() {
    let harness = Harness::new();
    let admin_router = harness.admin();
    let public = harness.public();

    let (_, before) = send(&public, Method::GET, "/api/faqs", None, None).await;
    assert_eq!(before["data"], json!([]));

    let (status, _) = admin(
        &admin_router,
        Method::POST,
        "/faqs",
        Some(json!({"question": "Opening hours?", "answer": "Daily 9-17"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, after) = send(&public, Method::GET, "/api/faqs", None, None).await;
    assert_eq!(after["data"][0]["question"], json!("Opening hours?"));
}

#[tokio::test]
async fn only_published_articles_reach_the_public_api() {
    let harness = Harness::new();
    let admin_router = harness.admin();
    let public = harness.public();

    let (status, created) = admin(
        &admin_router,
        Method::POST,
        "/articles",
        Some(json!({"title": "Spring Regatta", "content": "Boats!"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let slug = created["data"]["slug"].as_str().unwrap().to_string();

    let detail = format!("/api/articles/{slug}");
    let (status, _) = send(&public, Method::GET, &detail, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = admin(
        &admin_router,
        Method::POST,
        &format!("/articles/{id}/publish"),
        Some(json!({"published": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&public, Method::GET, &detail, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], json!("Spring Regatta"));

    let (status, _) = admin(&admin_router, Method::GET, "/articles/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_submissions_flow_from_public_to_admin() {
    let harness = Harness::new();
    let admin_router = harness.admin();
    let public = harness.public();

    let (status, _) = send(
        &public,
        Method::POST,
        "/api/contact",
        Some(json!({"name": "Ada", "email": "not-an-email", "message": "Hi"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, receipt) = send(
        &public,
        Method::POST,
        "/api/contact",
        Some(json!({"name": "Ada", "email": "ada@example.org", "message": "Hi there"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = receipt["data"]["id"].as_str().unwrap().to_string();

    let (_, unread) = admin(&admin_router, Method::GET, "/contact?unread=true", None).await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 1);

    let (status, _) = admin(
        &admin_router,
        Method::POST,
        &format!("/contact/{id}/read"),
        Some(json!({"isRead": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, unread) = admin(&admin_router, Method::GET, "/contact?unread=true", None).await;
    assert!(unread["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn gallery_category_with_items_cannot_be_deleted() {
    let harness = Harness::new();
    let router = harness.admin();

    let (status, category) = admin(
        &router,
        Method::POST,
        "/gallery/categories",
        Some(json!({"name": "Events"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = admin(
        &router,
        Method::POST,
        "/gallery/items",
        Some(json!({
            "categoryId": category_id,
            "title": "Opening night",
            "mediaUrl": "https://cdn.example.org/opening.jpg"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = admin(
        &router,
        Method::DELETE,
        &format!("/gallery/categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn finished_events_drop_out_of_the_public_schedule() {
    let harness = Harness::new();
    let public = harness.public();

    let now = OffsetDateTime::now_utc();
    harness
        .memory
        .create_event(ScheduleEventParams {
            title: "Evening briefing".into(),
            description: None,
            location: None,
            starts_at: now - time::Duration::minutes(30),
            ends_at: Some(now + time::Duration::seconds(1)),
            timezone: chrono_tz::Tz::UTC,
        })
        .await
        .unwrap();

    let (status, before) = send(&public, Method::GET, "/api/schedule", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["data"][0]["title"], json!("Evening briefing"));

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (status, after) = send(&public, Method::GET, "/api/schedule", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["data"], json!([]));
}
