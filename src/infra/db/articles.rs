use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{ArticlesRepo, CreateArticleParams, RepoError, UpdateArticleParams},
    domain::entities::ArticleRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const ARTICLE_COLUMNS: &str = "id, slug, title, excerpt, content, cover_image, published, \
     published_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    slug: String,
    title: String,
    excerpt: String,
    content: String,
    cover_image: Option<String>,
    published: bool,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            cover_image: row.cover_image,
            published: row.published,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ArticlesRepo for PostgresRepositories {
    async fn list_articles(&self, published_only: bool) -> Result<Vec<ArticleRecord>, RepoError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             WHERE ($1 = FALSE OR published) \
             ORDER BY published_at DESC NULLS LAST, created_at DESC, id"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(published_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(ArticleRecord::from))
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>, RepoError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(ArticleRecord::from))
    }

    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let sql = format!(
            "INSERT INTO articles \
                 (id, slug, title, excerpt, content, cover_image, published, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.slug)
            .bind(&params.title)
            .bind(&params.excerpt)
            .bind(&params.content)
            .bind(params.cover_image.as_deref())
            .bind(params.published)
            .bind(params.published_at)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(ArticleRecord::from(row))
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let sql = format!(
            "UPDATE articles SET \
                 slug = $2, title = $3, excerpt = $4, content = $5, cover_image = $6, \
                 published = $7, published_at = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(params.id)
            .bind(&params.slug)
            .bind(&params.title)
            .bind(&params.excerpt)
            .bind(&params.content)
            .bind(params.cover_image.as_deref())
            .bind(params.published)
            .bind(params.published_at)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(ArticleRecord::from(row))
    }

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_by_id("articles", id).await
    }
}
