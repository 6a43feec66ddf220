use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{ContactRepo, CreateContactSubmissionParams, RepoError},
    domain::entities::ContactSubmissionRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SUBMISSION_COLUMNS: &str = "id, name, email, message, is_read, created_at";

#[derive(sqlx::FromRow)]
struct ContactSubmissionRow {
    id: Uuid,
    name: String,
    email: String,
    message: String,
    is_read: bool,
    created_at: OffsetDateTime,
}

impl From<ContactSubmissionRow> for ContactSubmissionRecord {
    fn from(row: ContactSubmissionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ContactRepo for PostgresRepositories {
    async fn create_submission(
        &self,
        params: CreateContactSubmissionParams,
    ) -> Result<ContactSubmissionRecord, RepoError> {
        let sql = format!(
            "INSERT INTO contact_submissions (id, name, email, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SUBMISSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ContactSubmissionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.name)
            .bind(&params.email)
            .bind(&params.message)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(ContactSubmissionRecord::from(row))
    }

    async fn list_submissions(
        &self,
        unread_only: bool,
    ) -> Result<Vec<ContactSubmissionRecord>, RepoError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM contact_submissions \
             WHERE ($1 = FALSE OR NOT is_read) \
             ORDER BY created_at DESC, id"
        );
        let rows = sqlx::query_as::<_, ContactSubmissionRow>(&sql)
            .bind(unread_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(ContactSubmissionRecord::from).collect())
    }

    async fn mark_read(
        &self,
        id: Uuid,
        is_read: bool,
    ) -> Result<ContactSubmissionRecord, RepoError> {
        let sql = format!(
            "UPDATE contact_submissions SET is_read = $2 WHERE id = $1 \
             RETURNING {SUBMISSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ContactSubmissionRow>(&sql)
            .bind(id)
            .bind(is_read)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(ContactSubmissionRecord::from(row))
    }

    async fn delete_submission(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_by_id("contact_submissions", id).await
    }
}
