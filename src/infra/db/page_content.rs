use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{PageContentRepo, RepoError, UpsertPageContentParams},
    domain::page_content::{PageContentRecord, PageMetadata},
};

use super::{PostgresRepositories, map_sqlx_error};

const PAGE_CONTENT_COLUMNS: &str =
    "id, page_key, title, content, metadata, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PageContentRow {
    id: Uuid,
    page_key: String,
    title: String,
    content: String,
    metadata: Option<String>,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PageContentRow> for PageContentRecord {
    fn from(row: PageContentRow) -> Self {
        Self {
            id: row.id,
            page_key: row.page_key,
            title: row.title,
            content: row.content,
            metadata: row.metadata.as_deref().map(PageMetadata::decode),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PageContentRepo for PostgresRepositories {
    async fn find_page_content(
        &self,
        page_key: &str,
    ) -> Result<Option<PageContentRecord>, RepoError> {
        let sql = format!("SELECT {PAGE_CONTENT_COLUMNS} FROM page_content WHERE page_key = $1");
        let row = sqlx::query_as::<_, PageContentRow>(&sql)
            .bind(page_key)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(PageContentRecord::from))
    }

    async fn list_page_content(
        &self,
        active_only: bool,
    ) -> Result<Vec<PageContentRecord>, RepoError> {
        let sql = format!(
            "SELECT {PAGE_CONTENT_COLUMNS} FROM page_content \
             WHERE ($1 = FALSE OR is_active) \
             ORDER BY title, created_at, page_key"
        );
        let rows = sqlx::query_as::<_, PageContentRow>(&sql)
            .bind(active_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(PageContentRecord::from).collect())
    }

    async fn upsert_page_content(
        &self,
        params: UpsertPageContentParams,
    ) -> Result<PageContentRecord, RepoError> {
        let sql = format!(
            "INSERT INTO page_content (id, page_key, title, content, metadata, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (page_key) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 content = EXCLUDED.content, \
                 metadata = EXCLUDED.metadata, \
                 is_active = EXCLUDED.is_active, \
                 updated_at = now() \
             RETURNING {PAGE_CONTENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageContentRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.page_key)
            .bind(&params.title)
            .bind(&params.content)
            .bind(params.metadata.as_ref().map(PageMetadata::encode))
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(PageContentRecord::from(row))
    }
}
