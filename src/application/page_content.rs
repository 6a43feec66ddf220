use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::application::invalidation::{PAGE_CONTENT_ENTRIES, revalidate};
use crate::application::repos::{PageContentRepo, RepoError, UpsertPageContentParams};
use crate::cache::CacheInvalidator;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::page_content::{PageContentRecord, PageMetadata, normalize_page_key};

#[derive(Debug, Error)]
pub enum PageContentError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("page content `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct UpsertPageContentCommand {
    pub page_key: String,
    pub title: String,
    pub content: String,
    /// `None` and JSON `null` both clear the metadata.
    pub metadata: Option<Value>,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct PageContentService {
    repo: Arc<dyn PageContentRepo>,
    cache: Option<CacheInvalidator>,
}

impl PageContentService {
    pub fn new(repo: Arc<dyn PageContentRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    /// Active content for a key. Inactive blocks are reported as missing.
    pub async fn get_by_key(&self, page_key: &str) -> Result<PageContentRecord, PageContentError> {
        self.find(page_key)
            .await?
            .filter(|record| record.is_active)
            .ok_or_else(|| PageContentError::NotFound(page_key.trim().to_string()))
    }

    /// Content for a key regardless of its active flag.
    pub async fn get_for_admin(
        &self,
        page_key: &str,
    ) -> Result<PageContentRecord, PageContentError> {
        self.find(page_key)
            .await?
            .ok_or_else(|| PageContentError::NotFound(page_key.trim().to_string()))
    }

    pub async fn list_active(&self) -> Result<Vec<PageContentRecord>, PageContentError> {
        Ok(self.repo.list_page_content(true).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<PageContentRecord>, PageContentError> {
        Ok(self.repo.list_page_content(false).await?)
    }

    pub async fn upsert(
        &self,
        command: UpsertPageContentCommand,
    ) -> Result<PageContentRecord, PageContentError> {
        let page_key = normalize_page_key(&command.page_key)?;
        ensure_present(&command.title, "title")?;
        let metadata = match command.metadata {
            None | Some(Value::Null) => None,
            Some(value) => Some(PageMetadata::from_input(value)?),
        };

        let record = self
            .repo
            .upsert_page_content(UpsertPageContentParams {
                page_key,
                title: command.title.trim().to_string(),
                content: command.content,
                metadata,
                is_active: command.is_active,
            })
            .await?;
        info!(
            page_key = %record.page_key,
            is_active = record.is_active,
            "page content saved"
        );

        revalidate(self.cache.as_ref(), "page_content.upsert", PAGE_CONTENT_ENTRIES).await;
        Ok(record)
    }

    async fn find(&self, page_key: &str) -> Result<Option<PageContentRecord>, PageContentError> {
        let key = page_key.trim();
        if key.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.find_page_content(key).await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn service() -> (PageContentService, MemoryRepositories) {
        let repos = MemoryRepositories::new();
        (PageContentService::new(Arc::new(repos.clone())), repos)
    }

    fn command(page_key: &str, title: &str) -> UpsertPageContentCommand {
        UpsertPageContentCommand {
            page_key: page_key.to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
            metadata: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn second_upsert_replaces_fields_of_single_row() {
        let (service, _) = service();
        service.upsert(command("about", "About us")).await.unwrap();
        let second = service
            .upsert(UpsertPageContentCommand {
                content: "Founded in 1952".into(),
                ..command("about", "Our story")
            })
            .await
            .unwrap();

        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[0].title, "Our story");
        assert_eq!(all[0].content, "Founded in 1952");
    }

    #[tokio::test]
    async fn metadata_mapping_round_trips() {
        let (service, _) = service();
        service
            .upsert(UpsertPageContentCommand {
                metadata: Some(json!({"address": "X", "phone": "Y"})),
                ..command("contact", "Contact")
            })
            .await
            .unwrap();

        let record = service.get_by_key("contact").await.unwrap();
        let metadata = record.metadata.expect("metadata");
        assert_eq!(metadata.str_field("address"), Some("X"));
        assert_eq!(metadata.str_field("phone"), Some("Y"));
    }

    #[tokio::test]
    async fn malformed_stored_metadata_still_reads() {
        let (service, repos) = service();
        repos
            .put_raw_page_content("contact", "Contact", "{broken", true)
            .await;

        let record = service.get_by_key("contact").await.unwrap();
        assert_eq!(record.metadata, Some(PageMetadata::Raw("{broken".into())));
    }

    #[tokio::test]
    async fn non_mapping_metadata_is_rejected() {
        let (service, _) = service();
        let err = service
            .upsert(UpsertPageContentCommand {
                metadata: Some(json!(["a", "b"])),
                ..command("about", "About")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PageContentError::Validation(_)));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_content_is_hidden_from_public_reads() {
        let (service, _) = service();
        service
            .upsert(UpsertPageContentCommand {
                is_active: false,
                ..command("draft", "Draft")
            })
            .await
            .unwrap();

        assert!(matches!(
            service.get_by_key("draft").await,
            Err(PageContentError::NotFound(_))
        ));
        assert!(service.get_for_admin("draft").await.is_ok());
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_is_ordered_and_stable() {
        let (service, _) = service();
        service.upsert(command("b-key", "Same")).await.unwrap();
        service.upsert(command("a-key", "Same")).await.unwrap();
        service.upsert(command("first", "Alpha")).await.unwrap();

        let first: Vec<String> = service
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.page_key)
            .collect();
        let second: Vec<String> = service
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.page_key)
            .collect();

        assert_eq!(first[0], "first");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalid_key_and_blank_title_are_rejected() {
        let (service, _) = service();
        assert!(matches!(
            service.upsert(command("About Us", "About")).await,
            Err(PageContentError::Validation(_))
        ));
        assert!(matches!(
            service.upsert(command("about", " ")).await,
            Err(PageContentError::Validation(_))
        ));
    }
}
