//! Request bodies and query strings accepted by the HTTP surfaces.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::application::admin::{
    articles::{CreateArticleCommand, UpdateArticleCommand},
    contact::ContactSubmissionCommand,
    faqs::FaqCommand,
    gallery::{GalleryCategoryCommand, GalleryItemCommand},
    hero::HeroSectionCommand,
    schedule::ScheduleEventCommand,
};
use crate::application::page_content::UpsertPageContentCommand;
use crate::domain::types::MediaKind;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpsertSettingRequest {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPageContentRequest {
    pub page_key: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<UpsertPageContentRequest> for UpsertPageContentCommand {
    fn from(request: UpsertPageContentRequest) -> Self {
        Self {
            page_key: request.page_key,
            title: request.title,
            content: request.content,
            metadata: request.metadata,
            is_active: request.is_active,
        }
    }
}

/// Body of `POST /cache`. The action stays a string so unknown values get the
/// action envelope instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct CacheActionRequest {
    pub action: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl From<ArticleRequest> for CreateArticleCommand {
    fn from(request: ArticleRequest) -> Self {
        Self {
            title: request.title,
            slug: request.slug,
            excerpt: request.excerpt,
            content: request.content,
            cover_image: request.cover_image,
            published: request.published,
        }
    }
}

impl ArticleRequest {
    /// An update without a slug keeps the title-derived one.
    pub fn into_update(self, id: Uuid, current_slug: String) -> UpdateArticleCommand {
        UpdateArticleCommand {
            id,
            title: self.title,
            slug: self.slug.unwrap_or(current_slug),
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image,
            published: self.published,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<FaqRequest> for FaqCommand {
    fn from(request: FaqRequest) -> Self {
        Self {
            question: request.question,
            answer: request.answer,
            sort_order: request.sort_order,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSectionRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_href: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<HeroSectionRequest> for HeroSectionCommand {
    fn from(request: HeroSectionRequest) -> Self {
        Self {
            title: request.title,
            subtitle: request.subtitle,
            image_url: request.image_url,
            cta_label: request.cta_label,
            cta_href: request.cta_href,
            sort_order: request.sort_order,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<GalleryCategoryRequest> for GalleryCategoryCommand {
    fn from(request: GalleryCategoryRequest) -> Self {
        Self {
            name: request.name,
            slug: request.slug,
            sort_order: request.sort_order,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemRequest {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub title: String,
    pub media_url: String,
    #[serde(default = "default_media_kind")]
    pub media_kind: MediaKind,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_media_kind() -> MediaKind {
    MediaKind::Image
}

impl From<GalleryItemRequest> for GalleryItemCommand {
    fn from(request: GalleryItemRequest) -> Self {
        Self {
            category_id: request.category_id,
            title: request.title,
            media_url: request.media_url,
            media_kind: request.media_kind,
            sort_order: request.sort_order,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Wall-clock time in `timezone`, e.g. `2026-05-01T18:30`.
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: Option<String>,
    pub timezone: String,
}

impl From<ScheduleEventRequest> for ScheduleEventCommand {
    fn from(request: ScheduleEventRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            location: request.location,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            timezone: request.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl From<ContactRequest> for ContactSubmissionCommand {
    fn from(request: ContactRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            message: request.message,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub is_read: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveQuery {
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublishedQuery {
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnreadQuery {
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default)]
    pub upcoming: bool,
}
