//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use chrono_tz::Tz;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    ArticleRecord, ContactSubmissionRecord, FaqRecord, GalleryCategoryRecord, GalleryItemRecord,
    HeroSectionRecord, ScheduleEventRecord,
};
use crate::domain::page_content::{PageContentRecord, PageMetadata};
use crate::domain::settings::{SettingRecord, SettingType};
use crate::domain::types::MediaKind;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    /// Whether the backing store itself failed, as opposed to rejecting the request.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RepoError::Persistence(_) | RepoError::Timeout)
    }
}

// ----- settings -----

#[derive(Debug, Clone)]
pub struct UpsertSettingParams {
    pub key: String,
    pub value: String,
    pub setting_type: SettingType,
}

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn list_settings(&self) -> Result<Vec<SettingRecord>, RepoError>;

    async fn find_setting(&self, key: &str) -> Result<Option<SettingRecord>, RepoError>;

    async fn upsert_setting(&self, params: UpsertSettingParams) -> Result<SettingRecord, RepoError>;

    /// Insert the row unless the key already exists. Returns `true` when inserted.
    async fn insert_setting_if_absent(&self, params: UpsertSettingParams)
    -> Result<bool, RepoError>;
}

// ----- page content -----

#[derive(Debug, Clone)]
pub struct UpsertPageContentParams {
    pub page_key: String,
    pub title: String,
    pub content: String,
    pub metadata: Option<PageMetadata>,
    pub is_active: bool,
}

#[async_trait]
pub trait PageContentRepo: Send + Sync {
    async fn find_page_content(&self, page_key: &str)
    -> Result<Option<PageContentRecord>, RepoError>;

    /// Entries ordered by title, creation time, then key.
    async fn list_page_content(&self, active_only: bool)
    -> Result<Vec<PageContentRecord>, RepoError>;

    async fn upsert_page_content(
        &self,
        params: UpsertPageContentParams,
    ) -> Result<PageContentRecord, RepoError>;
}

// ----- articles -----

#[derive(Debug, Clone)]
pub struct CreateArticleParams {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub published_at: Option<OffsetDateTime>,
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    /// Newest first; `published_only` restricts to the public listing.
    async fn list_articles(&self, published_only: bool) -> Result<Vec<ArticleRecord>, RepoError>;

    async fn find_article(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError>;

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>, RepoError>;

    async fn create_article(&self, params: CreateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn update_article(&self, params: UpdateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- faqs -----

#[derive(Debug, Clone)]
pub struct FaqParams {
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[async_trait]
pub trait FaqsRepo: Send + Sync {
    async fn list_faqs(&self, active_only: bool) -> Result<Vec<FaqRecord>, RepoError>;

    async fn create_faq(&self, params: FaqParams) -> Result<FaqRecord, RepoError>;

    async fn update_faq(&self, id: Uuid, params: FaqParams) -> Result<FaqRecord, RepoError>;

    async fn delete_faq(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- hero sections -----

#[derive(Debug, Clone)]
pub struct HeroSectionParams {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[async_trait]
pub trait HeroSectionsRepo: Send + Sync {
    async fn list_hero_sections(&self, active_only: bool)
    -> Result<Vec<HeroSectionRecord>, RepoError>;

    async fn create_hero_section(
        &self,
        params: HeroSectionParams,
    ) -> Result<HeroSectionRecord, RepoError>;

    async fn update_hero_section(
        &self,
        id: Uuid,
        params: HeroSectionParams,
    ) -> Result<HeroSectionRecord, RepoError>;

    async fn delete_hero_section(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- gallery -----

#[derive(Debug, Clone)]
pub struct GalleryCategoryParams {
    pub slug: String,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct GalleryItemParams {
    pub category_id: Option<Uuid>,
    pub title: String,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub sort_order: i32,
}

#[async_trait]
pub trait GalleryRepo: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<GalleryCategoryRecord>, RepoError>;

    async fn find_category(&self, id: Uuid) -> Result<Option<GalleryCategoryRecord>, RepoError>;

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<GalleryCategoryRecord>, RepoError>;

    async fn create_category(
        &self,
        params: GalleryCategoryParams,
    ) -> Result<GalleryCategoryRecord, RepoError>;

    async fn update_category(
        &self,
        id: Uuid,
        params: GalleryCategoryParams,
    ) -> Result<GalleryCategoryRecord, RepoError>;

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_items_in_category(&self, category_id: Uuid) -> Result<u64, RepoError>;

    async fn list_items(&self, category_id: Option<Uuid>)
    -> Result<Vec<GalleryItemRecord>, RepoError>;

    async fn create_item(&self, params: GalleryItemParams)
    -> Result<GalleryItemRecord, RepoError>;

    async fn update_item(
        &self,
        id: Uuid,
        params: GalleryItemParams,
    ) -> Result<GalleryItemRecord, RepoError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- schedule -----

#[derive(Debug, Clone)]
pub struct ScheduleEventParams {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: OffsetDateTime,
    pub ends_at: Option<OffsetDateTime>,
    pub timezone: Tz,
}

#[async_trait]
pub trait ScheduleRepo: Send + Sync {
    /// Events ordered by start time; `from` drops events that ended (or started) earlier.
    async fn list_events(
        &self,
        from: Option<OffsetDateTime>,
    ) -> Result<Vec<ScheduleEventRecord>, RepoError>;

    async fn create_event(&self, params: ScheduleEventParams)
    -> Result<ScheduleEventRecord, RepoError>;

    async fn update_event(
        &self,
        id: Uuid,
        params: ScheduleEventParams,
    ) -> Result<ScheduleEventRecord, RepoError>;

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- contact submissions -----

#[derive(Debug, Clone)]
pub struct CreateContactSubmissionParams {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[async_trait]
pub trait ContactRepo: Send + Sync {
    async fn create_submission(
        &self,
        params: CreateContactSubmissionParams,
    ) -> Result<ContactSubmissionRecord, RepoError>;

    /// Newest first.
    async fn list_submissions(
        &self,
        unread_only: bool,
    ) -> Result<Vec<ContactSubmissionRecord>, RepoError>;

    async fn mark_read(&self, id: Uuid, is_read: bool)
    -> Result<ContactSubmissionRecord, RepoError>;

    async fn delete_submission(&self, id: Uuid) -> Result<(), RepoError>;
}
