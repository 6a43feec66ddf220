use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{ContentError, optional_text};
use crate::application::invalidation::{SCHEDULE_ENTRIES, revalidate};
use crate::application::repos::{ScheduleEventParams, ScheduleRepo};
use crate::cache::CacheInvalidator;
use crate::domain::entities::ScheduleEventRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::util::timezone::{normalize_local, parse_zone};

/// An event as entered in the admin form: wall-clock times in `timezone`.
#[derive(Debug, Clone)]
pub struct ScheduleEventCommand {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub timezone: String,
}

impl ScheduleEventCommand {
    fn into_params(self) -> Result<ScheduleEventParams, ContentError> {
        ensure_present(&self.title, "title")?;
        let timezone = parse_zone(&self.timezone)
            .map_err(|err| DomainError::validation("timezone", err.to_string()))?;
        let starts_at = normalize_local(&self.starts_at, timezone)
            .map_err(|err| DomainError::validation("startsAt", err.to_string()))?;
        let ends_at = optional_text(self.ends_at)
            .map(|local| normalize_local(&local, timezone))
            .transpose()
            .map_err(|err| DomainError::validation("endsAt", err.to_string()))?;

        if let Some(ends_at) = ends_at
            && ends_at < starts_at
        {
            return Err(DomainError::validation("endsAt", "must not be before the start").into());
        }

        Ok(ScheduleEventParams {
            title: self.title.trim().to_string(),
            description: optional_text(self.description),
            location: optional_text(self.location),
            starts_at,
            ends_at,
            timezone,
        })
    }
}

#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepo>,
    cache: Option<CacheInvalidator>,
}

impl ScheduleService {
    pub fn new(repo: Arc<dyn ScheduleRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    /// Events that have not finished by `now`, soonest first.
    pub async fn list_upcoming(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<ScheduleEventRecord>, ContentError> {
        Ok(self.repo.list_events(Some(now)).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<ScheduleEventRecord>, ContentError> {
        Ok(self.repo.list_events(None).await?)
    }

    pub async fn create(
        &self,
        command: ScheduleEventCommand,
    ) -> Result<ScheduleEventRecord, ContentError> {
        let event = self.repo.create_event(command.into_params()?).await?;
        info!(id = %event.id, starts_at = %event.starts_at, "schedule event created");
        revalidate(self.cache.as_ref(), "schedule.create", SCHEDULE_ENTRIES).await;
        Ok(event)
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: ScheduleEventCommand,
    ) -> Result<ScheduleEventRecord, ContentError> {
        let event = self
            .repo
            .update_event(id, command.into_params()?)
            .await
            .map_err(ContentError::missing("schedule event"))?;
        info!(id = %event.id, "schedule event updated");
        revalidate(self.cache.as_ref(), "schedule.update", SCHEDULE_ENTRIES).await;
        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ContentError> {
        self.repo
            .delete_event(id)
            .await
            .map_err(ContentError::missing("schedule event"))?;
        info!(id = %id, "schedule event deleted");
        revalidate(self.cache.as_ref(), "schedule.delete", SCHEDULE_ENTRIES).await;
        Ok(())
    }
}
