use axum::extract::State;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::ScheduleEventRecord;
use crate::infra::http::{
    models::{ScheduleEventRequest, UpcomingQuery},
    response::{ActionJson, ActionPath, ActionQuery, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn list_events(
    State(state): State<AdminState>,
    ActionQuery(query): ActionQuery<UpcomingQuery>,
) -> ActionResult<Vec<ScheduleEventRecord>> {
    let events = if query.upcoming {
        state.schedule.list_upcoming(OffsetDateTime::now_utc()).await?
    } else {
        state.schedule.list_all().await?
    };
    Ok(ActionResponse::ok(events))
}

pub(super) async fn create_event(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<ScheduleEventRequest>,
) -> ActionResult<ScheduleEventRecord> {
    let event = state.schedule.create(request.into()).await?;
    Ok(ActionResponse::created(event).with_message("Event created"))
}

pub(super) async fn update_event(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<ScheduleEventRequest>,
) -> ActionResult<ScheduleEventRecord> {
    let event = state.schedule.update(id, request.into()).await?;
    Ok(ActionResponse::ok(event).with_message("Event updated"))
}

pub(super) async fn delete_event(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.schedule.delete(id).await?;
    Ok(ActionResponse::done("Event deleted"))
}
