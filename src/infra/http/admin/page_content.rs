use axum::extract::State;

use crate::domain::page_content::PageContentRecord;
use crate::infra::http::{
    models::UpsertPageContentRequest,
    response::{ActionJson, ActionPath, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn list_page_content(
    State(state): State<AdminState>,
) -> ActionResult<Vec<PageContentRecord>> {
    let entries = state.page_content.list_all().await?;
    Ok(ActionResponse::ok(entries))
}

pub(super) async fn get_page_content(
    State(state): State<AdminState>,
    ActionPath(page_key): ActionPath<String>,
) -> ActionResult<PageContentRecord> {
    let entry = state.page_content.get_for_admin(&page_key).await?;
    Ok(ActionResponse::ok(entry))
}

pub(super) async fn upsert_page_content(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<UpsertPageContentRequest>,
) -> ActionResult<PageContentRecord> {
    let entry = state.page_content.upsert(request.into()).await?;
    Ok(ActionResponse::ok(entry).with_message("Page content saved"))
}
