//! Admin JSON API, served on its own listener behind the bearer token.

mod articles;
mod cache;
mod contact;
mod faqs;
mod gallery;
mod health;
mod hero;
mod page_content;
mod schedule;
mod settings;
mod state;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};

pub use state::AdminState;

use super::{
    auth::{AdminToken, require_admin_token},
    middleware::{log_responses, set_request_context},
};

pub fn build_admin_router(state: AdminState, token: AdminToken) -> Router {
    Router::new()
        .route(
            "/settings",
            get(settings::list_settings).post(settings::upsert_setting),
        )
        .route("/settings/predefined", get(settings::predefined_settings))
        .route("/settings/initialize", post(settings::initialize_settings))
        .route("/settings/{key}", get(settings::get_setting))
        .route(
            "/page-content",
            get(page_content::list_page_content).post(page_content::upsert_page_content),
        )
        .route("/page-content/{page_key}", get(page_content::get_page_content))
        .route("/cache", get(cache::cache_overview).post(cache::cache_action))
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/articles/{id}/publish", post(articles::publish_article))
        .route("/faqs", get(faqs::list_faqs).post(faqs::create_faq))
        .route("/faqs/{id}", put(faqs::update_faq).delete(faqs::delete_faq))
        .route(
            "/hero",
            get(hero::list_hero_sections).post(hero::create_hero_section),
        )
        .route(
            "/hero/{id}",
            put(hero::update_hero_section).delete(hero::delete_hero_section),
        )
        .route("/gallery", get(gallery::gallery_overview))
        .route(
            "/gallery/categories",
            get(gallery::list_categories).post(gallery::create_category),
        )
        .route(
            "/gallery/categories/{id}",
            put(gallery::update_category).delete(gallery::delete_category),
        )
        .route(
            "/gallery/items",
            get(gallery::list_items).post(gallery::create_item),
        )
        .route(
            "/gallery/items/{id}",
            put(gallery::update_item).delete(gallery::delete_item),
        )
        .route(
            "/schedule",
            get(schedule::list_events).post(schedule::create_event),
        )
        .route(
            "/schedule/{id}",
            put(schedule::update_event).delete(schedule::delete_event),
        )
        .route("/contact", get(contact::list_submissions))
        .route("/contact/{id}", delete(contact::delete_submission))
        .route("/contact/{id}/read", post(contact::mark_submission_read))
        .route("/health", get(health::admin_health))
        .with_state(state)
        .layer(from_fn_with_state(token, require_admin_token))
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}
