use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{ContentError, optional_text};
use crate::application::invalidation::{GALLERY_ENTRIES, revalidate};
use crate::application::repos::{GalleryCategoryParams, GalleryItemParams, GalleryRepo};
use crate::cache::CacheInvalidator;
use crate::domain::entities::{GalleryCategoryRecord, GalleryItemRecord};
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::slug::{generate_unique_slug_async, is_canonical_slug};
use crate::domain::types::MediaKind;

#[derive(Debug, Clone)]
pub struct GalleryCategoryCommand {
    pub name: String,
    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct GalleryItemCommand {
    pub category_id: Option<Uuid>,
    pub title: String,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub sort_order: i32,
}

/// Everything the public gallery page shows.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryOverview {
    pub categories: Vec<GalleryCategoryRecord>,
    pub items: Vec<GalleryItemRecord>,
}

#[derive(Clone)]
pub struct GalleryService {
    repo: Arc<dyn GalleryRepo>,
    cache: Option<CacheInvalidator>,
}

impl GalleryService {
    pub fn new(repo: Arc<dyn GalleryRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    pub async fn overview(&self) -> Result<GalleryOverview, ContentError> {
        let categories = self.repo.list_categories().await?;
        let items = self.repo.list_items(None).await?;
        Ok(GalleryOverview { categories, items })
    }

    pub async fn list_categories(&self) -> Result<Vec<GalleryCategoryRecord>, ContentError> {
        Ok(self.repo.list_categories().await?)
    }

    pub async fn create_category(
        &self,
        command: GalleryCategoryCommand,
    ) -> Result<GalleryCategoryRecord, ContentError> {
        ensure_present(&command.name, "name")?;
        let slug = self.resolve_slug(None, &command).await?;

        let category = self
            .repo
            .create_category(GalleryCategoryParams {
                slug,
                name: command.name.trim().to_string(),
                sort_order: command.sort_order,
            })
            .await?;
        info!(id = %category.id, slug = %category.slug, "gallery category created");
        revalidate(self.cache.as_ref(), "gallery.category.create", GALLERY_ENTRIES).await;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        command: GalleryCategoryCommand,
    ) -> Result<GalleryCategoryRecord, ContentError> {
        ensure_present(&command.name, "name")?;
        if self.repo.find_category(id).await?.is_none() {
            return Err(ContentError::NotFound("gallery category"));
        }
        let slug = self.resolve_slug(Some(id), &command).await?;

        let category = self
            .repo
            .update_category(
                id,
                GalleryCategoryParams {
                    slug,
                    name: command.name.trim().to_string(),
                    sort_order: command.sort_order,
                },
            )
            .await
            .map_err(ContentError::missing("gallery category"))?;
        info!(id = %category.id, "gallery category updated");
        revalidate(self.cache.as_ref(), "gallery.category.update", GALLERY_ENTRIES).await;
        Ok(category)
    }

    /// Delete an empty category. Categories that still hold items are refused.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ContentError> {
        let in_use = self.repo.count_items_in_category(id).await?;
        if in_use > 0 {
            return Err(ContentError::Conflict(format!(
                "gallery category still holds {in_use} item(s)"
            )));
        }
        self.repo
            .delete_category(id)
            .await
            .map_err(ContentError::missing("gallery category"))?;
        info!(id = %id, "gallery category deleted");
        revalidate(self.cache.as_ref(), "gallery.category.delete", GALLERY_ENTRIES).await;
        Ok(())
    }

    pub async fn list_items(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<GalleryItemRecord>, ContentError> {
        Ok(self.repo.list_items(category_id).await?)
    }

    pub async fn create_item(
        &self,
        command: GalleryItemCommand,
    ) -> Result<GalleryItemRecord, ContentError> {
        let params = self.item_params(command).await?;
        let item = self.repo.create_item(params).await?;
        info!(id = %item.id, kind = item.media_kind.as_str(), "gallery item created");
        revalidate(self.cache.as_ref(), "gallery.item.create", GALLERY_ENTRIES).await;
        Ok(item)
    }

    pub async fn update_item(
        &self,
        id: Uuid,
        command: GalleryItemCommand,
    ) -> Result<GalleryItemRecord, ContentError> {
        let params = self.item_params(command).await?;
        let item = self
            .repo
            .update_item(id, params)
            .await
            .map_err(ContentError::missing("gallery item"))?;
        info!(id = %item.id, "gallery item updated");
        revalidate(self.cache.as_ref(), "gallery.item.update", GALLERY_ENTRIES).await;
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), ContentError> {
        self.repo
            .delete_item(id)
            .await
            .map_err(ContentError::missing("gallery item"))?;
        info!(id = %id, "gallery item deleted");
        revalidate(self.cache.as_ref(), "gallery.item.delete", GALLERY_ENTRIES).await;
        Ok(())
    }

    async fn resolve_slug(
        &self,
        current: Option<Uuid>,
        command: &GalleryCategoryCommand,
    ) -> Result<String, ContentError> {
        if let Some(slug) = optional_text(command.slug.clone()) {
            if !is_canonical_slug(&slug) {
                return Err(DomainError::validation(
                    "slug",
                    "must be lowercase words separated by `-`",
                )
                .into());
            }
            if let Some(existing) = self.repo.find_category_by_slug(&slug).await?
                && Some(existing.id) != current
            {
                return Err(ContentError::Conflict(format!(
                    "a gallery category with slug `{slug}` already exists"
                )));
            }
            return Ok(slug);
        }

        let repo = self.repo.clone();
        generate_unique_slug_async(&command.name, move |candidate| {
            let repo = repo.clone();
            async move {
                repo.find_category_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none_or(|category| Some(category.id) == current))
            }
        })
        .await
        .map_err(|err| ContentError::from_slug("name", err))
    }

    async fn item_params(
        &self,
        command: GalleryItemCommand,
    ) -> Result<GalleryItemParams, ContentError> {
        ensure_present(&command.title, "title")?;
        ensure_present(&command.media_url, "mediaUrl")?;
        if let Some(category_id) = command.category_id
            && self.repo.find_category(category_id).await?.is_none()
        {
            return Err(DomainError::validation("categoryId", "unknown gallery category").into());
        }

        Ok(GalleryItemParams {
            category_id: command.category_id,
            title: command.title.trim().to_string(),
            media_url: command.media_url.trim().to_string(),
            media_kind: command.media_kind,
            sort_order: command.sort_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn service() -> GalleryService {
        GalleryService::new(Arc::new(MemoryRepositories::new()))
    }

    fn category(name: &str) -> GalleryCategoryCommand {
        GalleryCategoryCommand {
            name: name.to_string(),
            slug: None,
            sort_order: 0,
        }
    }

    fn item(category_id: Option<Uuid>) -> GalleryItemCommand {
        GalleryItemCommand {
            category_id,
            title: "Team photo".into(),
            media_url: "/uploads/team.jpg".into(),
            media_kind: MediaKind::Image,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn category_with_items_cannot_be_deleted() {
        let service = service();
        let summer = service.create_category(category("Summer Camp")).await.unwrap();
        assert_eq!(summer.slug, "summer-camp");
        let photo = service.create_item(item(Some(summer.id))).await.unwrap();

        assert!(matches!(
            service.delete_category(summer.id).await,
            Err(ContentError::Conflict(_))
        ));

        service.delete_item(photo.id).await.unwrap();
        service.delete_category(summer.id).await.unwrap();
        assert!(service.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn items_need_an_existing_category() {
        let service = service();
        let err = service
            .create_item(item(Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));

        service.create_item(item(None)).await.unwrap();
        assert_eq!(service.overview().await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn renaming_keeps_own_slug_available() {
        let service = service();
        let created = service.create_category(category("Events")).await.unwrap();
        let updated = service
            .update_category(created.id, category("Events"))
            .await
            .unwrap();
        assert_eq!(updated.slug, "events");
    }

    #[tokio::test]
    async fn items_filter_by_category() {
        let service = service();
        let a = service.create_category(category("A")).await.unwrap();
        let b = service.create_category(category("B")).await.unwrap();
        service.create_item(item(Some(a.id))).await.unwrap();
        service.create_item(item(Some(b.id))).await.unwrap();

        let only_a = service.list_items(Some(a.id)).await.unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].category_id, Some(a.id));
    }
}
