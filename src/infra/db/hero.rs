use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{HeroSectionParams, HeroSectionsRepo, RepoError},
    domain::entities::HeroSectionRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const HERO_COLUMNS: &str = "id, title, subtitle, image_url, cta_label, cta_href, sort_order, \
     is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct HeroSectionRow {
    id: Uuid,
    title: String,
    subtitle: Option<String>,
    image_url: String,
    cta_label: Option<String>,
    cta_href: Option<String>,
    sort_order: i32,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<HeroSectionRow> for HeroSectionRecord {
    fn from(row: HeroSectionRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            subtitle: row.subtitle,
            image_url: row.image_url,
            cta_label: row.cta_label,
            cta_href: row.cta_href,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl HeroSectionsRepo for PostgresRepositories {
    async fn list_hero_sections(
        &self,
        active_only: bool,
    ) -> Result<Vec<HeroSectionRecord>, RepoError> {
        let sql = format!(
            "SELECT {HERO_COLUMNS} FROM hero_sections \
             WHERE ($1 = FALSE OR is_active) \
             ORDER BY sort_order, created_at, id"
        );
        let rows = sqlx::query_as::<_, HeroSectionRow>(&sql)
            .bind(active_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(HeroSectionRecord::from).collect())
    }

    async fn create_hero_section(
        &self,
        params: HeroSectionParams,
    ) -> Result<HeroSectionRecord, RepoError> {
        let sql = format!(
            "INSERT INTO hero_sections \
                 (id, title, subtitle, image_url, cta_label, cta_href, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {HERO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, HeroSectionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.title)
            .bind(params.subtitle.as_deref())
            .bind(&params.image_url)
            .bind(params.cta_label.as_deref())
            .bind(params.cta_href.as_deref())
            .bind(params.sort_order)
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(HeroSectionRecord::from(row))
    }

    async fn update_hero_section(
        &self,
        id: Uuid,
        params: HeroSectionParams,
    ) -> Result<HeroSectionRecord, RepoError> {
        let sql = format!(
            "UPDATE hero_sections SET \
                 title = $2, subtitle = $3, image_url = $4, cta_label = $5, cta_href = $6, \
                 sort_order = $7, is_active = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {HERO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, HeroSectionRow>(&sql)
            .bind(id)
            .bind(&params.title)
            .bind(params.subtitle.as_deref())
            .bind(&params.image_url)
            .bind(params.cta_label.as_deref())
            .bind(params.cta_href.as_deref())
            .bind(params.sort_order)
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(HeroSectionRecord::from(row))
    }

    async fn delete_hero_section(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_by_id("hero_sections", id).await
    }
}
