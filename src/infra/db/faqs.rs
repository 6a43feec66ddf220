use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{FaqParams, FaqsRepo, RepoError},
    domain::entities::FaqRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const FAQ_COLUMNS: &str = "id, question, answer, sort_order, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct FaqRow {
    id: Uuid,
    question: String,
    answer: String,
    sort_order: i32,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FaqRow> for FaqRecord {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            question: row.question,
            answer: row.answer,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FaqsRepo for PostgresRepositories {
    async fn list_faqs(&self, active_only: bool) -> Result<Vec<FaqRecord>, RepoError> {
        let sql = format!(
            "SELECT {FAQ_COLUMNS} FROM faqs \
             WHERE ($1 = FALSE OR is_active) \
             ORDER BY sort_order, created_at, id"
        );
        let rows = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(active_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(FaqRecord::from).collect())
    }

    async fn create_faq(&self, params: FaqParams) -> Result<FaqRecord, RepoError> {
        let sql = format!(
            "INSERT INTO faqs (id, question, answer, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {FAQ_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.question)
            .bind(&params.answer)
            .bind(params.sort_order)
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(FaqRecord::from(row))
    }

    async fn update_faq(&self, id: Uuid, params: FaqParams) -> Result<FaqRecord, RepoError> {
        let sql = format!(
            "UPDATE faqs SET \
                 question = $2, answer = $3, sort_order = $4, is_active = $5, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {FAQ_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(id)
            .bind(&params.question)
            .bind(&params.answer)
            .bind(params.sort_order)
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(FaqRecord::from(row))
    }

    async fn delete_faq(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_by_id("faqs", id).await
    }
}
