use std::sync::Arc;

use crate::application::admin::{
    articles::ArticleService, contact::ContactService, faqs::FaqService, gallery::GalleryService,
    hero::HeroSectionService, schedule::ScheduleService,
};
use crate::application::page_content::PageContentService;
use crate::application::settings::SettingsService;
use crate::cache::CacheInvalidator;
use crate::infra::store::Datastore;

#[derive(Clone)]
pub struct AdminState {
    pub store: Datastore,
    pub settings: Arc<SettingsService>,
    pub page_content: Arc<PageContentService>,
    pub articles: Arc<ArticleService>,
    pub faqs: Arc<FaqService>,
    pub hero: Arc<HeroSectionService>,
    pub gallery: Arc<GalleryService>,
    pub schedule: Arc<ScheduleService>,
    pub contact: Arc<ContactService>,
    pub cache: CacheInvalidator,
}
