use async_trait::async_trait;
use chrono_tz::Tz;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{RepoError, ScheduleEventParams, ScheduleRepo},
    domain::entities::ScheduleEventRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const EVENT_COLUMNS: &str = "id, title, description, location, starts_at, ends_at, timezone, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ScheduleEventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: OffsetDateTime,
    ends_at: Option<OffsetDateTime>,
    timezone: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<ScheduleEventRow> for ScheduleEventRecord {
    type Error = RepoError;

    fn try_from(row: ScheduleEventRow) -> Result<Self, Self::Error> {
        // Zones are validated on write, so a bad name means the row was edited by hand.
        let timezone = row
            .timezone
            .parse::<Tz>()
            .map_err(|err| RepoError::Integrity {
                message: format!("event {} has invalid timezone `{}`: {err}", row.id, row.timezone),
            })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            timezone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ScheduleRepo for PostgresRepositories {
    async fn list_events(
        &self,
        from: Option<OffsetDateTime>,
    ) -> Result<Vec<ScheduleEventRecord>, RepoError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM schedule_events \
             WHERE ($1::timestamptz IS NULL OR COALESCE(ends_at, starts_at) >= $1) \
             ORDER BY starts_at, id"
        );
        sqlx::query_as::<_, ScheduleEventRow>(&sql)
            .bind(from)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(ScheduleEventRecord::try_from)
            .collect()
    }

    async fn create_event(
        &self,
        params: ScheduleEventParams,
    ) -> Result<ScheduleEventRecord, RepoError> {
        let sql = format!(
            "INSERT INTO schedule_events \
                 (id, title, description, location, starts_at, ends_at, timezone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScheduleEventRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.title)
            .bind(params.description.as_deref())
            .bind(params.location.as_deref())
            .bind(params.starts_at)
            .bind(params.ends_at)
            .bind(params.timezone.name())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        ScheduleEventRecord::try_from(row)
    }

    async fn update_event(
        &self,
        id: Uuid,
        params: ScheduleEventParams,
    ) -> Result<ScheduleEventRecord, RepoError> {
        let sql = format!(
            "UPDATE schedule_events SET \
                 title = $2, description = $3, location = $4, starts_at = $5, ends_at = $6, \
                 timezone = $7, updated_at = now() \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScheduleEventRow>(&sql)
            .bind(id)
            .bind(&params.title)
            .bind(params.description.as_deref())
            .bind(params.location.as_deref())
            .bind(params.starts_at)
            .bind(params.ends_at)
            .bind(params.timezone.name())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        ScheduleEventRecord::try_from(row)
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_by_id("schedule_events", id).await
    }
}
