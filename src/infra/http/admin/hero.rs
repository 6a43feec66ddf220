use axum::extract::State;
use uuid::Uuid;

use crate::domain::entities::HeroSectionRecord;
use crate::infra::http::{
    models::{ActiveQuery, HeroSectionRequest},
    response::{ActionJson, ActionPath, ActionQuery, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn list_hero_sections(
    State(state): State<AdminState>,
    ActionQuery(query): ActionQuery<ActiveQuery>,
) -> ActionResult<Vec<HeroSectionRecord>> {
    Ok(ActionResponse::ok(state.hero.list(query.active).await?))
}

pub(super) async fn create_hero_section(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<HeroSectionRequest>,
) -> ActionResult<HeroSectionRecord> {
    let hero = state.hero.create(request.into()).await?;
    Ok(ActionResponse::created(hero).with_message("Hero section created"))
}

pub(super) async fn update_hero_section(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<HeroSectionRequest>,
) -> ActionResult<HeroSectionRecord> {
    let hero = state.hero.update(id, request.into()).await?;
    Ok(ActionResponse::ok(hero).with_message("Hero section updated"))
}

pub(super) async fn delete_hero_section(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.hero.delete(id).await?;
    Ok(ActionResponse::done("Hero section deleted"))
}
