use axum::extract::State;
use serde::Serialize;

use crate::domain::settings::{PredefinedSetting, SettingRecord};
use crate::infra::http::{
    models::UpsertSettingRequest,
    response::{ActionJson, ActionPath, ActionResponse, ActionResult},
};

use super::AdminState;

#[derive(Serialize)]
pub(super) struct InitializeOutcome {
    inserted: usize,
}

pub(super) async fn list_settings(
    State(state): State<AdminState>,
) -> ActionResult<Vec<SettingRecord>> {
    let settings = state.settings.get_all_settings().await?;
    Ok(ActionResponse::ok(settings))
}

pub(super) async fn get_setting(
    State(state): State<AdminState>,
    ActionPath(key): ActionPath<String>,
) -> ActionResult<SettingRecord> {
    let setting = state.settings.get_setting(&key).await?;
    Ok(ActionResponse::ok(setting))
}

pub(super) async fn upsert_setting(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<UpsertSettingRequest>,
) -> ActionResult<SettingRecord> {
    let setting = state
        .settings
        .upsert_setting(&request.key, &request.value, &request.setting_type)
        .await?;
    Ok(ActionResponse::ok(setting).with_message("Setting saved"))
}

pub(super) async fn predefined_settings(
    State(state): State<AdminState>,
) -> ActionResult<&'static [PredefinedSetting]> {
    Ok(ActionResponse::ok(state.settings.predefined()))
}

pub(super) async fn initialize_settings(
    State(state): State<AdminState>,
) -> ActionResult<InitializeOutcome> {
    let inserted = state.settings.initialize_predefined_settings().await?;
    Ok(ActionResponse::ok(InitializeOutcome { inserted }))
}
