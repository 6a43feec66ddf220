use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{ContentError, optional_text};
use crate::application::invalidation::{HERO_ENTRIES, revalidate};
use crate::application::repos::{HeroSectionParams, HeroSectionsRepo};
use crate::cache::CacheInvalidator;
use crate::domain::entities::HeroSectionRecord;
use crate::domain::error::{DomainError, ensure_present};

#[derive(Debug, Clone)]
pub struct HeroSectionCommand {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl HeroSectionCommand {
    fn into_params(self) -> Result<HeroSectionParams, ContentError> {
        ensure_present(&self.title, "title")?;
        ensure_present(&self.image_url, "imageUrl")?;

        let cta_label = optional_text(self.cta_label);
        let cta_href = optional_text(self.cta_href);
        if cta_label.is_some() != cta_href.is_some() {
            return Err(DomainError::validation(
                "cta",
                "button label and link must be given together",
            )
            .into());
        }

        Ok(HeroSectionParams {
            title: self.title.trim().to_string(),
            subtitle: optional_text(self.subtitle),
            image_url: self.image_url.trim().to_string(),
            cta_label,
            cta_href,
            sort_order: self.sort_order,
            is_active: self.is_active,
        })
    }
}

#[derive(Clone)]
pub struct HeroSectionService {
    repo: Arc<dyn HeroSectionsRepo>,
    cache: Option<CacheInvalidator>,
}

impl HeroSectionService {
    pub fn new(repo: Arc<dyn HeroSectionsRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<HeroSectionRecord>, ContentError> {
        Ok(self.repo.list_hero_sections(active_only).await?)
    }

    pub async fn create(
        &self,
        command: HeroSectionCommand,
    ) -> Result<HeroSectionRecord, ContentError> {
        let hero = self.repo.create_hero_section(command.into_params()?).await?;
        info!(id = %hero.id, "hero section created");
        revalidate(self.cache.as_ref(), "hero.create", HERO_ENTRIES).await;
        Ok(hero)
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: HeroSectionCommand,
    ) -> Result<HeroSectionRecord, ContentError> {
        let hero = self
            .repo
            .update_hero_section(id, command.into_params()?)
            .await
            .map_err(ContentError::missing("hero section"))?;
        info!(id = %hero.id, "hero section updated");
        revalidate(self.cache.as_ref(), "hero.update", HERO_ENTRIES).await;
        Ok(hero)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ContentError> {
        self.repo
            .delete_hero_section(id)
            .await
            .map_err(ContentError::missing("hero section"))?;
        info!(id = %id, "hero section deleted");
        revalidate(self.cache.as_ref(), "hero.delete", HERO_ENTRIES).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn banner() -> HeroSectionCommand {
        HeroSectionCommand {
            title: "Welcome".into(),
            subtitle: Some("  ".into()),
            image_url: "/uploads/banner.jpg".into(),
            cta_label: Some("Join".into()),
            cta_href: Some("/contact".into()),
            sort_order: 0,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn blank_subtitle_is_stored_as_absent() {
        let service = HeroSectionService::new(Arc::new(MemoryRepositories::new()));
        let hero = service.create(banner()).await.unwrap();
        assert_eq!(hero.subtitle, None);
        assert_eq!(hero.cta_href.as_deref(), Some("/contact"));
    }

    #[tokio::test]
    async fn half_configured_cta_is_rejected() {
        let service = HeroSectionService::new(Arc::new(MemoryRepositories::new()));
        let err = service
            .create(HeroSectionCommand {
                cta_href: None,
                ..banner()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }
}
