use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{GalleryCategoryParams, GalleryItemParams, GalleryRepo, RepoError},
    domain::{
        entities::{GalleryCategoryRecord, GalleryItemRecord},
        types::MediaKind,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const CATEGORY_COLUMNS: &str = "id, slug, name, sort_order, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, category_id, title, media_url, media_kind, sort_order, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct GalleryCategoryRow {
    id: Uuid,
    slug: String,
    name: String,
    sort_order: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<GalleryCategoryRow> for GalleryCategoryRecord {
    fn from(row: GalleryCategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GalleryItemRow {
    id: Uuid,
    category_id: Option<Uuid>,
    title: String,
    media_url: String,
    media_kind: MediaKind,
    sort_order: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<GalleryItemRow> for GalleryItemRecord {
    fn from(row: GalleryItemRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            title: row.title,
            media_url: row.media_url,
            media_kind: row.media_kind,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl GalleryRepo for PostgresRepositories {
    async fn list_categories(&self) -> Result<Vec<GalleryCategoryRecord>, RepoError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM gallery_categories ORDER BY sort_order, name, id"
        );
        let rows = sqlx::query_as::<_, GalleryCategoryRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(GalleryCategoryRecord::from).collect())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<GalleryCategoryRecord>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM gallery_categories WHERE id = $1");
        let row = sqlx::query_as::<_, GalleryCategoryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(GalleryCategoryRecord::from))
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<GalleryCategoryRecord>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM gallery_categories WHERE slug = $1");
        let row = sqlx::query_as::<_, GalleryCategoryRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(GalleryCategoryRecord::from))
    }

    async fn create_category(
        &self,
        params: GalleryCategoryParams,
    ) -> Result<GalleryCategoryRecord, RepoError> {
        let sql = format!(
            "INSERT INTO gallery_categories (id, slug, name, sort_order) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryCategoryRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.slug)
            .bind(&params.name)
            .bind(params.sort_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(GalleryCategoryRecord::from(row))
    }

    async fn update_category(
        &self,
        id: Uuid,
        params: GalleryCategoryParams,
    ) -> Result<GalleryCategoryRecord, RepoError> {
        let sql = format!(
            "UPDATE gallery_categories SET \
                 slug = $2, name = $3, sort_order = $4, updated_at = now() \
             WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryCategoryRow>(&sql)
            .bind(id)
            .bind(&params.slug)
            .bind(&params.name)
            .bind(params.sort_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(GalleryCategoryRecord::from(row))
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        // Items reference categories with ON DELETE RESTRICT.
        self.delete_by_id("gallery_categories", id).await
    }

    async fn count_items_in_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM gallery_items WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Self::convert_count(count)
    }

    async fn list_items(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<GalleryItemRecord>, RepoError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM gallery_items \
             WHERE ($1::uuid IS NULL OR category_id = $1) \
             ORDER BY sort_order, created_at, id"
        );
        let rows = sqlx::query_as::<_, GalleryItemRow>(&sql)
            .bind(category_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(GalleryItemRecord::from).collect())
    }

    async fn create_item(
        &self,
        params: GalleryItemParams,
    ) -> Result<GalleryItemRecord, RepoError> {
        let sql = format!(
            "INSERT INTO gallery_items (id, category_id, title, media_url, media_kind, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryItemRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(params.category_id)
            .bind(&params.title)
            .bind(&params.media_url)
            .bind(params.media_kind)
            .bind(params.sort_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(GalleryItemRecord::from(row))
    }

    async fn update_item(
        &self,
        id: Uuid,
        params: GalleryItemParams,
    ) -> Result<GalleryItemRecord, RepoError> {
        let sql = format!(
            "UPDATE gallery_items SET \
                 category_id = $2, title = $3, media_url = $4, media_kind = $5, \
                 sort_order = $6, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryItemRow>(&sql)
            .bind(id)
            .bind(params.category_id)
            .bind(&params.title)
            .bind(&params.media_url)
            .bind(params.media_kind)
            .bind(params.sort_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(GalleryItemRecord::from(row))
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_by_id("gallery_items", id).await
    }
}
