use axum::extract::State;
use uuid::Uuid;

use crate::domain::entities::FaqRecord;
use crate::infra::http::{
    models::{ActiveQuery, FaqRequest},
    response::{ActionJson, ActionPath, ActionQuery, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn list_faqs(
    State(state): State<AdminState>,
    ActionQuery(query): ActionQuery<ActiveQuery>,
) -> ActionResult<Vec<FaqRecord>> {
    Ok(ActionResponse::ok(state.faqs.list(query.active).await?))
}

pub(super) async fn create_faq(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<FaqRequest>,
) -> ActionResult<FaqRecord> {
    let faq = state.faqs.create(request.into()).await?;
    Ok(ActionResponse::created(faq).with_message("FAQ created"))
}

pub(super) async fn update_faq(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<FaqRequest>,
) -> ActionResult<FaqRecord> {
    let faq = state.faqs.update(id, request.into()).await?;
    Ok(ActionResponse::ok(faq).with_message("FAQ updated"))
}

pub(super) async fn delete_faq(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.faqs.delete(id).await?;
    Ok(ActionResponse::done("FAQ deleted"))
}
