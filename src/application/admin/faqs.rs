use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ContentError;
use crate::application::invalidation::{FAQ_ENTRIES, revalidate};
use crate::application::repos::{FaqParams, FaqsRepo};
use crate::cache::CacheInvalidator;
use crate::domain::entities::FaqRecord;
use crate::domain::error::ensure_present;

#[derive(Debug, Clone)]
pub struct FaqCommand {
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    pub is_active: bool,
}

impl FaqCommand {
    fn into_params(self) -> Result<FaqParams, ContentError> {
        ensure_present(&self.question, "question")?;
        ensure_present(&self.answer, "answer")?;
        Ok(FaqParams {
            question: self.question.trim().to_string(),
            answer: self.answer.trim().to_string(),
            sort_order: self.sort_order,
            is_active: self.is_active,
        })
    }
}

#[derive(Clone)]
pub struct FaqService {
    repo: Arc<dyn FaqsRepo>,
    cache: Option<CacheInvalidator>,
}

impl FaqService {
    pub fn new(repo: Arc<dyn FaqsRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<FaqRecord>, ContentError> {
        Ok(self.repo.list_faqs(active_only).await?)
    }

    pub async fn create(&self, command: FaqCommand) -> Result<FaqRecord, ContentError> {
        let faq = self.repo.create_faq(command.into_params()?).await?;
        info!(id = %faq.id, "faq created");
        revalidate(self.cache.as_ref(), "faqs.create", FAQ_ENTRIES).await;
        Ok(faq)
    }

    pub async fn update(&self, id: Uuid, command: FaqCommand) -> Result<FaqRecord, ContentError> {
        let faq = self
            .repo
            .update_faq(id, command.into_params()?)
            .await
            .map_err(ContentError::missing("faq"))?;
        info!(id = %faq.id, "faq updated");
        revalidate(self.cache.as_ref(), "faqs.update", FAQ_ENTRIES).await;
        Ok(faq)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ContentError> {
        self.repo
            .delete_faq(id)
            .await
            .map_err(ContentError::missing("faq"))?;
        info!(id = %id, "faq deleted");
        revalidate(self.cache.as_ref(), "faqs.delete", FAQ_ENTRIES).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn faq(question: &str, sort_order: i32, is_active: bool) -> FaqCommand {
        FaqCommand {
            question: question.to_string(),
            answer: "Yes.".to_string(),
            sort_order,
            is_active,
        }
    }

    #[tokio::test]
    async fn public_listing_is_sorted_and_active_only() {
        let service = FaqService::new(Arc::new(MemoryRepositories::new()));
        service.create(faq("Second?", 2, true)).await.unwrap();
        service.create(faq("First?", 1, true)).await.unwrap();
        service.create(faq("Hidden?", 0, false)).await.unwrap();

        let public: Vec<String> = service
            .list(true)
            .await
            .unwrap()
            .into_iter()
            .map(|faq| faq.question)
            .collect();
        assert_eq!(public, vec!["First?", "Second?"]);
        assert_eq!(service.list(false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn blank_answer_is_rejected() {
        let service = FaqService::new(Arc::new(MemoryRepositories::new()));
        let err = service
            .create(FaqCommand {
                answer: "   ".into(),
                ..faq("Why?", 0, true)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn updating_missing_faq_is_not_found() {
        let service = FaqService::new(Arc::new(MemoryRepositories::new()));
        assert!(matches!(
            service.update(Uuid::new_v4(), faq("Q?", 0, true)).await,
            Err(ContentError::NotFound("faq"))
        ));
    }
}
