use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats, ClearReport, FailedPath};
use crate::infra::http::{
    models::CacheActionRequest,
    response::{ActionError, ActionJson, ActionResponse},
};

use super::AdminState;

const SOURCE: &str = "infra::http::admin::cache";

#[derive(Serialize)]
struct CacheOverview<'a> {
    entries: &'a [CacheEntry],
    stats: CacheStats,
}

#[derive(Serialize)]
struct ClearOutcome {
    succeeded: Vec<String>,
    failed: Vec<FailedPath>,
    stats: CacheStats,
}

enum CacheAction {
    ClearPath(String),
    ClearType(String),
    ClearAll,
}

impl CacheAction {
    fn parse(request: CacheActionRequest) -> Result<Self, ActionError> {
        match request.action.as_str() {
            "clear-path" => request
                .target
                .filter(|target| !target.trim().is_empty())
                .map(CacheAction::ClearPath)
                .ok_or_else(|| {
                    ActionError::bad_request(SOURCE, "`target` is required for clear-path")
                }),
            "clear-type" => request
                .kind
                .filter(|kind| !kind.trim().is_empty())
                .map(CacheAction::ClearType)
                .ok_or_else(|| {
                    ActionError::bad_request(SOURCE, "`type` is required for clear-type")
                }),
            "clear-all" => Ok(CacheAction::ClearAll),
            other => Err(ActionError::bad_request(
                SOURCE,
                format!("Unknown cache action `{other}`"),
            )),
        }
    }
}

pub(super) async fn cache_overview(State(state): State<AdminState>) -> Response {
    let stats = state.cache.stats().await;
    let overview = CacheOverview {
        entries: state.cache.catalog().entries(),
        stats,
    };
    ActionResponse::ok(overview).into_response()
}

pub(super) async fn cache_action(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<CacheActionRequest>,
) -> Result<Response, ActionError> {
    let action = CacheAction::parse(request)?;
    let report = match action {
        CacheAction::ClearPath(target) => state.cache.clear_path(target.trim()).await?,
        CacheAction::ClearType(kind) => state.cache.clear_by_type(kind.trim()).await?,
        CacheAction::ClearAll => state.cache.clear_all().await,
    };
    let stats = state.cache.stats().await;
    Ok(clear_response(report, stats))
}

/// 200 when every path revalidated, 207 on partial failure, 502 when nothing did.
fn clear_response(report: ClearReport, stats: CacheStats) -> Response {
    if report.is_complete() {
        return ActionResponse::ok(ClearOutcome {
            succeeded: report.succeeded,
            failed: report.failed,
            stats,
        })
        .with_message("Cache cleared")
        .into_response();
    }

    let status = if report.is_partial() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::BAD_GATEWAY
    };
    let message = format!(
        "{} of {} paths failed to revalidate",
        report.failed.len(),
        report.total()
    );
    let detail = report
        .failed
        .iter()
        .map(|failed| format!("{}: {}", failed.path, failed.error))
        .collect::<Vec<_>>()
        .join("; ");
    let outcome = ClearOutcome {
        succeeded: report.succeeded,
        failed: report.failed,
        stats,
    };
    let data = serde_json::to_value(&outcome).unwrap_or_default();
    ActionError::new(SOURCE, status, message)
        .with_detail(detail)
        .with_data(data)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(action: &str, target: Option<&str>, kind: Option<&str>) -> CacheActionRequest {
        CacheActionRequest {
            action: action.to_string(),
            target: target.map(str::to_string),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn parses_known_actions() {
        assert!(matches!(
            CacheAction::parse(request("clear-path", Some("/faq"), None)),
            Ok(CacheAction::ClearPath(path)) if path == "/faq"
        ));
        assert!(matches!(
            CacheAction::parse(request("clear-type", None, Some("api"))),
            Ok(CacheAction::ClearType(kind)) if kind == "api"
        ));
        assert!(matches!(
            CacheAction::parse(request("clear-all", None, None)),
            Ok(CacheAction::ClearAll)
        ));
    }

    #[test]
    fn rejects_unknown_or_incomplete_actions() {
        for req in [
            request("purge", None, None),
            request("clear-path", None, None),
            request("clear-path", Some("  "), None),
            request("clear-type", None, None),
        ] {
            let err = CacheAction::parse(req).err().expect("rejected");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }
}
