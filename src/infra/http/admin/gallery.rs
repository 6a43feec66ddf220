use axum::extract::State;
use uuid::Uuid;

use crate::application::admin::gallery::GalleryOverview;
use crate::domain::entities::{GalleryCategoryRecord, GalleryItemRecord};
use crate::infra::http::{
    models::{CategoryQuery, GalleryCategoryRequest, GalleryItemRequest},
    response::{ActionJson, ActionPath, ActionQuery, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn gallery_overview(
    State(state): State<AdminState>,
) -> ActionResult<GalleryOverview> {
    Ok(ActionResponse::ok(state.gallery.overview().await?))
}

pub(super) async fn list_categories(
    State(state): State<AdminState>,
) -> ActionResult<Vec<GalleryCategoryRecord>> {
    Ok(ActionResponse::ok(state.gallery.list_categories().await?))
}

pub(super) async fn create_category(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<GalleryCategoryRequest>,
) -> ActionResult<GalleryCategoryRecord> {
    let category = state.gallery.create_category(request.into()).await?;
    Ok(ActionResponse::created(category).with_message("Category created"))
}

pub(super) async fn update_category(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<GalleryCategoryRequest>,
) -> ActionResult<GalleryCategoryRecord> {
    let category = state.gallery.update_category(id, request.into()).await?;
    Ok(ActionResponse::ok(category).with_message("Category updated"))
}

pub(super) async fn delete_category(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.gallery.delete_category(id).await?;
    Ok(ActionResponse::done("Category deleted"))
}

pub(super) async fn list_items(
    State(state): State<AdminState>,
    ActionQuery(query): ActionQuery<CategoryQuery>,
) -> ActionResult<Vec<GalleryItemRecord>> {
    Ok(ActionResponse::ok(state.gallery.list_items(query.category).await?))
}

pub(super) async fn create_item(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<GalleryItemRequest>,
) -> ActionResult<GalleryItemRecord> {
    let item = state.gallery.create_item(request.into()).await?;
    Ok(ActionResponse::created(item).with_message("Gallery item created"))
}

pub(super) async fn update_item(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<GalleryItemRequest>,
) -> ActionResult<GalleryItemRecord> {
    let item = state.gallery.update_item(id, request.into()).await?;
    Ok(ActionResponse::ok(item).with_message("Gallery item updated"))
}

pub(super) async fn delete_item(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.gallery.delete_item(id).await?;
    Ok(ActionResponse::done("Gallery item deleted"))
}
