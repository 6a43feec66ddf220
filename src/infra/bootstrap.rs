//! Wiring of services, cache and HTTP state shared by `main` and the router tests.

use std::sync::Arc;

use tracing::info;

use crate::application::admin::{
    articles::ArticleService, contact::ContactService, faqs::FaqService, gallery::GalleryService,
    hero::HeroSectionService, schedule::ScheduleService,
};
use crate::application::page_content::PageContentService;
use crate::application::settings::SettingsService;
use crate::cache::{
    CacheCatalog, CacheConfig, CacheInvalidator, CacheStatsState, FanoutRevalidator,
    LocalRevalidator, ResponseCache, ResponseCacheState, Revalidator, WebhookRevalidator,
};

use super::error::InfraError;
use super::http::{AdminState, AdminToken, PublicState};
use super::store::Datastore;

/// Everything the two listeners need.
#[derive(Clone)]
pub struct AppContext {
    pub public: PublicState,
    pub admin: AdminState,
    pub admin_token: AdminToken,
}

impl AppContext {
    pub fn build(
        store: Datastore,
        cache_config: &CacheConfig,
        admin_token: Option<&str>,
    ) -> Result<Self, InfraError> {
        let response_cache = ResponseCache::new(cache_config.response_limit);
        let invalidator = build_invalidator(cache_config, &response_cache)?;
        let repos = store.repositories();
        let cache = Some(invalidator.clone());

        let settings = Arc::new(SettingsService::new(repos.settings).with_cache_opt(cache.clone()));
        let page_content =
            Arc::new(PageContentService::new(repos.page_content).with_cache_opt(cache.clone()));
        let articles = Arc::new(ArticleService::new(repos.articles).with_cache_opt(cache.clone()));
        let faqs = Arc::new(FaqService::new(repos.faqs).with_cache_opt(cache.clone()));
        let hero =
            Arc::new(HeroSectionService::new(repos.hero_sections).with_cache_opt(cache.clone()));
        let gallery = Arc::new(GalleryService::new(repos.gallery).with_cache_opt(cache.clone()));
        let schedule = Arc::new(ScheduleService::new(repos.schedule).with_cache_opt(cache));
        let contact = Arc::new(ContactService::new(repos.contact));

        let public = PublicState {
            settings: settings.clone(),
            page_content: page_content.clone(),
            articles: articles.clone(),
            faqs: faqs.clone(),
            hero: hero.clone(),
            gallery: gallery.clone(),
            schedule: schedule.clone(),
            contact: contact.clone(),
            response_cache: ResponseCacheState {
                config: cache_config.clone(),
                cache: response_cache,
            },
        };

        let admin = AdminState {
            store,
            settings,
            page_content,
            articles,
            faqs,
            hero,
            gallery,
            schedule,
            contact,
            cache: invalidator,
        };

        Ok(Self {
            public,
            admin,
            admin_token: AdminToken::new(admin_token),
        })
    }
}

fn build_invalidator(
    config: &CacheConfig,
    response_cache: &ResponseCache,
) -> Result<CacheInvalidator, InfraError> {
    let mut fanout = FanoutRevalidator::default();
    if config.enable_response_cache {
        fanout.push(Arc::new(LocalRevalidator::new(response_cache.clone())));
    }
    if let Some(webhook) =
        WebhookRevalidator::from_config(config).map_err(|err| InfraError::Cache(err.to_string()))?
    {
        info!(
            endpoint = ?config.webhook_url.as_ref().map(|url| url.as_str()),
            "frontend revalidation webhook enabled"
        );
        fanout.push(Arc::new(webhook));
    }
    let revalidator: Arc<dyn Revalidator> = Arc::new(fanout);

    Ok(CacheInvalidator::new(
        Arc::new(CacheCatalog::site()),
        revalidator,
        Arc::new(CacheStatsState::new()),
    ))
}
