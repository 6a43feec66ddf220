//! Public read API consumed by the site frontend.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Router,
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::{
        admin::{
            articles::ArticleService,
            contact::ContactService,
            faqs::FaqService,
            gallery::{GalleryOverview, GalleryService},
            hero::HeroSectionService,
            schedule::ScheduleService,
        },
        page_content::PageContentService,
        settings::SettingsService,
    },
    cache::{ResponseCacheState, response_cache_layer},
    domain::{
        entities::{ArticleRecord, FaqRecord, HeroSectionRecord, ScheduleEventRecord},
        page_content::PageContentRecord,
        settings::TypedSettingValue,
    },
    util::timezone::localized_display,
};

use super::{
    middleware::{log_responses, set_request_context},
    models::ContactRequest,
    response::{ActionJson, ActionPath, ActionResponse, ActionResult},
};

#[derive(Clone)]
pub struct PublicState {
    pub settings: Arc<SettingsService>,
    pub page_content: Arc<PageContentService>,
    pub articles: Arc<ArticleService>,
    pub faqs: Arc<FaqService>,
    pub hero: Arc<HeroSectionService>,
    pub gallery: Arc<GalleryService>,
    pub schedule: Arc<ScheduleService>,
    pub contact: Arc<ContactService>,
    pub response_cache: ResponseCacheState,
}

pub fn build_public_router(state: PublicState) -> Router {
    // GET responses here are cached until a write revalidates their path.
    let cached_routes = Router::new()
        .route("/api/settings", get(site_settings))
        .route("/api/page-content", get(list_page_content))
        .route("/api/page-content/{page_key}", get(page_content_detail))
        .route("/api/articles", get(list_articles))
        .route("/api/articles/{slug}", get(article_detail))
        .route("/api/faqs", get(list_faqs))
        .route("/api/hero", get(list_hero_sections))
        .route("/api/gallery", get(gallery_overview))
        .layer(from_fn_with_state(
            state.response_cache.clone(),
            response_cache_layer,
        ));

    // The schedule depends on the clock as well as on writes.
    let uncached_routes = Router::new()
        .route("/api/schedule", get(upcoming_events))
        .route("/api/contact", post(submit_contact));

    cached_routes
        .merge(uncached_routes)
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}

async fn site_settings(State(state): State<PublicState>) -> ActionResult<BTreeMap<String, Value>> {
    let settings = state.settings.get_all_settings().await?;
    let map = settings
        .iter()
        .map(|setting| (setting.key.clone(), typed_json(setting.typed_value())))
        .collect();
    Ok(ActionResponse::ok(map))
}

fn typed_json(value: TypedSettingValue<'_>) -> Value {
    match value {
        TypedSettingValue::Text(text)
        | TypedSettingValue::Image(text)
        | TypedSettingValue::Malformed(text) => Value::String(text.to_string()),
        TypedSettingValue::Boolean(flag) => Value::Bool(flag),
        TypedSettingValue::Json(json) => json,
    }
}

async fn list_page_content(
    State(state): State<PublicState>,
) -> ActionResult<Vec<PageContentRecord>> {
    Ok(ActionResponse::ok(state.page_content.list_active().await?))
}

async fn page_content_detail(
    State(state): State<PublicState>,
    ActionPath(page_key): ActionPath<String>,
) -> ActionResult<PageContentRecord> {
    Ok(ActionResponse::ok(
        state.page_content.get_by_key(&page_key).await?,
    ))
}

async fn list_articles(State(state): State<PublicState>) -> ActionResult<Vec<ArticleRecord>> {
    Ok(ActionResponse::ok(state.articles.list(true).await?))
}

async fn article_detail(
    State(state): State<PublicState>,
    ActionPath(slug): ActionPath<String>,
) -> ActionResult<ArticleRecord> {
    Ok(ActionResponse::ok(state.articles.get_published(&slug).await?))
}

async fn list_faqs(State(state): State<PublicState>) -> ActionResult<Vec<FaqRecord>> {
    Ok(ActionResponse::ok(state.faqs.list(true).await?))
}

async fn list_hero_sections(
    State(state): State<PublicState>,
) -> ActionResult<Vec<HeroSectionRecord>> {
    Ok(ActionResponse::ok(state.hero.list(true).await?))
}

async fn gallery_overview(State(state): State<PublicState>) -> ActionResult<GalleryOverview> {
    Ok(ActionResponse::ok(state.gallery.overview().await?))
}

#[derive(Serialize)]
struct ScheduleEventView {
    #[serde(flatten)]
    event: ScheduleEventRecord,
    display: String,
}

async fn upcoming_events(
    State(state): State<PublicState>,
) -> ActionResult<Vec<ScheduleEventView>> {
    let events = state
        .schedule
        .list_upcoming(OffsetDateTime::now_utc())
        .await?
        .into_iter()
        .map(|event| ScheduleEventView {
            display: localized_display(event.starts_at, event.timezone),
            event,
        })
        .collect();
    Ok(ActionResponse::ok(events))
}

#[derive(Serialize)]
struct ContactReceipt {
    id: Uuid,
}

async fn submit_contact(
    State(state): State<PublicState>,
    ActionJson(request): ActionJson<ContactRequest>,
) -> ActionResult<ContactReceipt> {
    let submission = state.contact.submit(request.into()).await?;
    Ok(ActionResponse::created(ContactReceipt { id: submission.id })
        .with_message("Thank you for your message"))
}
