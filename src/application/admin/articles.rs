use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{ContentError, optional_text};
use crate::application::invalidation::{ARTICLE_ENTRIES, revalidate};
use crate::application::repos::{ArticlesRepo, CreateArticleParams, UpdateArticleParams};
use crate::cache::CacheInvalidator;
use crate::domain::entities::ArticleRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::slug::{generate_unique_slug_async, is_canonical_slug};

#[derive(Debug, Clone)]
pub struct CreateArticleCommand {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleCommand {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
}

#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticlesRepo>,
    cache: Option<CacheInvalidator>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticlesRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    pub async fn list(&self, published_only: bool) -> Result<Vec<ArticleRecord>, ContentError> {
        Ok(self.repo.list_articles(published_only).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<ArticleRecord, ContentError> {
        self.repo
            .find_article(id)
            .await?
            .ok_or(ContentError::NotFound("article"))
    }

    /// A published article for the public site.
    pub async fn get_published(&self, slug: &str) -> Result<ArticleRecord, ContentError> {
        self.repo
            .find_article_by_slug(slug)
            .await?
            .filter(|article| article.published)
            .ok_or(ContentError::NotFound("article"))
    }

    pub async fn create(
        &self,
        command: CreateArticleCommand,
    ) -> Result<ArticleRecord, ContentError> {
        ensure_present(&command.title, "title")?;
        ensure_present(&command.content, "content")?;

        let slug = match optional_text(command.slug) {
            Some(slug) => {
                ensure_canonical(&slug)?;
                if self.repo.find_article_by_slug(&slug).await?.is_some() {
                    return Err(ContentError::Conflict(format!(
                        "an article with slug `{slug}` already exists"
                    )));
                }
                slug
            }
            None => {
                let repo = self.repo.clone();
                generate_unique_slug_async(&command.title, move |candidate| {
                    let repo = repo.clone();
                    async move {
                        repo.find_article_by_slug(&candidate)
                            .await
                            .map(|existing| existing.is_none())
                    }
                })
                .await
                .map_err(|err| ContentError::from_slug("title", err))?
            }
        };

        let article = self
            .repo
            .create_article(CreateArticleParams {
                slug,
                title: command.title.trim().to_string(),
                excerpt: command.excerpt.trim().to_string(),
                content: command.content,
                cover_image: optional_text(command.cover_image),
                published: command.published,
                published_at: command.published.then(OffsetDateTime::now_utc),
            })
            .await?;
        info!(
            id = %article.id,
            slug = %article.slug,
            published = article.published,
            "article created"
        );

        revalidate(self.cache.as_ref(), "articles.create", ARTICLE_ENTRIES).await;
        Ok(article)
    }

    pub async fn update(
        &self,
        command: UpdateArticleCommand,
    ) -> Result<ArticleRecord, ContentError> {
        ensure_present(&command.title, "title")?;
        ensure_present(&command.content, "content")?;
        let slug = command.slug.trim().to_string();
        ensure_canonical(&slug)?;

        let existing = self.get(command.id).await?;
        if let Some(other) = self.repo.find_article_by_slug(&slug).await?
            && other.id != existing.id
        {
            return Err(ContentError::Conflict(format!(
                "an article with slug `{slug}` already exists"
            )));
        }

        let article = self
            .repo
            .update_article(UpdateArticleParams {
                id: existing.id,
                slug,
                title: command.title.trim().to_string(),
                excerpt: command.excerpt.trim().to_string(),
                content: command.content,
                cover_image: optional_text(command.cover_image),
                published: command.published,
                published_at: first_publication(&existing, command.published),
            })
            .await
            .map_err(ContentError::missing("article"))?;
        info!(id = %article.id, slug = %article.slug, "article updated");

        revalidate(self.cache.as_ref(), "articles.update", ARTICLE_ENTRIES).await;
        Ok(article)
    }

    pub async fn set_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<ArticleRecord, ContentError> {
        let existing = self.get(id).await?;
        let article = self
            .repo
            .update_article(UpdateArticleParams {
                id: existing.id,
                slug: existing.slug.clone(),
                title: existing.title.clone(),
                excerpt: existing.excerpt.clone(),
                content: existing.content.clone(),
                cover_image: existing.cover_image.clone(),
                published,
                published_at: first_publication(&existing, published),
            })
            .await
            .map_err(ContentError::missing("article"))?;
        info!(id = %article.id, published, "article publication changed");

        revalidate(self.cache.as_ref(), "articles.publish", ARTICLE_ENTRIES).await;
        Ok(article)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ContentError> {
        self.repo
            .delete_article(id)
            .await
            .map_err(ContentError::missing("article"))?;
        info!(id = %id, "article deleted");

        revalidate(self.cache.as_ref(), "articles.delete", ARTICLE_ENTRIES).await;
        Ok(())
    }
}

fn ensure_canonical(slug: &str) -> Result<(), DomainError> {
    if is_canonical_slug(slug) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "slug",
            "must be lowercase words separated by `-`",
        ))
    }
}

/// Keep the original publication date; stamp one on first publish.
fn first_publication(existing: &ArticleRecord, published: bool) -> Option<OffsetDateTime> {
    match (existing.published_at, published) {
        (Some(at), _) => Some(at),
        (None, true) => Some(OffsetDateTime::now_utc()),
        (None, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn service() -> ArticleService {
        ArticleService::new(Arc::new(MemoryRepositories::new()))
    }

    fn create(title: &str, published: bool) -> CreateArticleCommand {
        CreateArticleCommand {
            title: title.to_string(),
            slug: None,
            excerpt: String::new(),
            content: "Body".to_string(),
            cover_image: None,
            published,
        }
    }

    #[tokio::test]
    async fn derived_slugs_stay_unique() {
        let service = service();
        let first = service.create(create("Open Day", false)).await.unwrap();
        let second = service.create(create("Open Day", false)).await.unwrap();

        assert_eq!(first.slug, "open-day");
        assert_eq!(second.slug, "open-day-2");
    }

    #[tokio::test]
    async fn explicit_slug_must_be_canonical_and_free() {
        let service = service();
        let err = service
            .create(CreateArticleCommand {
                slug: Some("Not A Slug".into()),
                ..create("Hello", false)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));

        service
            .create(CreateArticleCommand {
                slug: Some("hello".into()),
                ..create("Hello", false)
            })
            .await
            .unwrap();
        let err = service
            .create(CreateArticleCommand {
                slug: Some("hello".into()),
                ..create("Hello again", false)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Conflict(_)));
    }

    #[tokio::test]
    async fn publication_date_is_set_once() {
        let service = service();
        let draft = service.create(create("Spring fair", false)).await.unwrap();
        assert_eq!(draft.published_at, None);

        let published = service.set_published(draft.id, true).await.unwrap();
        let stamped = published.published_at.expect("published_at");

        service.set_published(draft.id, false).await.unwrap();
        let republished = service.set_published(draft.id, true).await.unwrap();
        assert_eq!(republished.published_at, Some(stamped));
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_public_lookups() {
        let service = service();
        let draft = service.create(create("Hidden", false)).await.unwrap();
        service.create(create("Visible", true)).await.unwrap();

        assert!(matches!(
            service.get_published(&draft.slug).await,
            Err(ContentError::NotFound("article"))
        ));
        let public = service.list(true).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].title, "Visible");
    }

    #[tokio::test]
    async fn update_rejects_slug_taken_by_another_article() {
        let service = service();
        let first = service.create(create("First", false)).await.unwrap();
        service.create(create("Second", false)).await.unwrap();

        let err = service
            .update(UpdateArticleCommand {
                id: first.id,
                title: "First".into(),
                slug: "second".into(),
                excerpt: String::new(),
                content: "Body".into(),
                cover_image: None,
                published: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_unknown_article_is_not_found() {
        let service = service();
        assert!(matches!(
            service.delete(Uuid::new_v4()).await,
            Err(ContentError::NotFound("article"))
        ));
    }
}
