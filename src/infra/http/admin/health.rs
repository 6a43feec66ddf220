use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infra::http::response::{ActionError, ActionResponse};

use super::AdminState;

#[derive(Serialize)]
struct HealthReport {
    store: &'static str,
}

pub(super) async fn admin_health(State(state): State<AdminState>) -> Response {
    match state.store.health_check().await {
        Ok(()) => ActionResponse::ok(HealthReport {
            store: state.store.backend(),
        })
        .into_response(),
        Err(err) => ActionError::from_repo("infra::http::admin::health", err).into_response(),
    }
}
