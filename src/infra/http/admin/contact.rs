use axum::extract::State;
use uuid::Uuid;

use crate::domain::entities::ContactSubmissionRecord;
use crate::infra::http::{
    models::{MarkReadRequest, UnreadQuery},
    response::{ActionJson, ActionPath, ActionQuery, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn list_submissions(
    State(state): State<AdminState>,
    ActionQuery(query): ActionQuery<UnreadQuery>,
) -> ActionResult<Vec<ContactSubmissionRecord>> {
    Ok(ActionResponse::ok(state.contact.list(query.unread).await?))
}

pub(super) async fn mark_submission_read(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<MarkReadRequest>,
) -> ActionResult<ContactSubmissionRecord> {
    let submission = state.contact.mark_read(id, request.is_read).await?;
    Ok(ActionResponse::ok(submission))
}

pub(super) async fn delete_submission(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.contact.delete(id).await?;
    Ok(ActionResponse::done("Submission deleted"))
}
