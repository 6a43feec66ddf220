//! Uniform `{success, ...}` envelopes and the error boundary for both listeners.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::application::admin::ContentError;
use crate::application::error::ErrorReport;
use crate::application::page_content::PageContentError;
use crate::application::repos::RepoError;
use crate::application::settings::SettingsError;
use crate::cache::CacheError;
use crate::domain::error::DomainError;

const UNAVAILABLE_MESSAGE: &str = "The content store is temporarily unavailable";

#[derive(Serialize)]
struct SuccessBody<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

/// Successful action result rendered as `{success: true, data?, message?}`.
#[derive(Debug)]
pub struct ActionResponse<T> {
    status: StatusCode,
    data: Option<T>,
    message: Option<&'static str>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
            message: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl ActionResponse<()> {
    pub fn done(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
            message: Some(message),
        }
    }
}

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            success: true,
            data: self.data,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failed action rendered as `{success: false, error, data?}` with an [`ErrorReport`] attached.
#[derive(Debug)]
pub struct ActionError {
    source: &'static str,
    status: StatusCode,
    message: String,
    detail: Option<String>,
    data: Option<Value>,
}

impl ActionError {
    pub fn new(source: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            source,
            status,
            message: message.into(),
            detail: None,
            data: None,
        }
    }

    pub fn bad_request(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(source: &'static str) -> Self {
        Self::new(source, StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Logged detail that is kept out of the response body.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn from_repo(source: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found(source, "Resource not found"),
            RepoError::Duplicate { constraint } => {
                Self::new(source, StatusCode::CONFLICT, "Duplicate record")
                    .with_detail(format!("unique constraint `{constraint}`"))
            }
            RepoError::Integrity { message } => Self::new(source, StatusCode::CONFLICT, message),
            RepoError::InvalidInput { message } => Self::bad_request(source, message),
            err @ (RepoError::Persistence(_) | RepoError::Timeout) => {
                Self::new(source, StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_MESSAGE)
                    .with_detail(err.to_string())
            }
        }
    }

    fn from_domain(source: &'static str, err: DomainError) -> Self {
        Self::bad_request(source, err.to_string())
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: &self.message,
            data: self.data.as_ref(),
        };
        let mut response = (self.status, Json(body)).into_response();
        let logged = match self.detail {
            Some(detail) => format!("{}: {detail}", self.message),
            None => self.message,
        };
        ErrorReport::from_message(self.source, self.status, logged).attach(&mut response);
        response
    }
}

impl From<SettingsError> for ActionError {
    fn from(err: SettingsError) -> Self {
        const SOURCE: &str = "application::settings";
        match err {
            SettingsError::Validation(err) => Self::from_domain(SOURCE, err),
            SettingsError::NotFound(key) => {
                Self::not_found(SOURCE, format!("Setting `{key}` not found"))
            }
            SettingsError::Repo(err) => Self::from_repo(SOURCE, err),
        }
    }
}

impl From<PageContentError> for ActionError {
    fn from(err: PageContentError) -> Self {
        const SOURCE: &str = "application::page_content";
        match err {
            PageContentError::Validation(err) => Self::from_domain(SOURCE, err),
            PageContentError::NotFound(key) => {
                Self::not_found(SOURCE, format!("Page content `{key}` not found"))
            }
            PageContentError::Repo(err) => Self::from_repo(SOURCE, err),
        }
    }
}

impl From<ContentError> for ActionError {
    fn from(err: ContentError) -> Self {
        const SOURCE: &str = "application::admin";
        match err {
            ContentError::Validation(err) => Self::from_domain(SOURCE, err),
            ContentError::NotFound(resource) => {
                let mut message = format!("{resource} not found");
                if let Some(first) = message.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                Self::not_found(SOURCE, message)
            }
            ContentError::Conflict(message) => Self::new(SOURCE, StatusCode::CONFLICT, message),
            ContentError::Repo(err) => Self::from_repo(SOURCE, err),
        }
    }
}

impl From<CacheError> for ActionError {
    fn from(err: CacheError) -> Self {
        Self::bad_request("cache", err.to_string())
    }
}

impl From<JsonRejection> for ActionError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            "infra::http::json",
            rejection.status(),
            format!("Invalid request body: {}", rejection.body_text()),
        )
    }
}

impl From<PathRejection> for ActionError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(
            "infra::http::path",
            rejection.status(),
            format!("Invalid path parameter: {}", rejection.body_text()),
        )
    }
}

impl From<QueryRejection> for ActionError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(
            "infra::http::query",
            rejection.status(),
            format!("Invalid query string: {}", rejection.body_text()),
        )
    }
}

/// JSON body extractor whose rejections use the action envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ActionError))]
pub struct ActionJson<T>(pub T);

/// Path extractor whose rejections use the action envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ActionError))]
pub struct ActionPath<T>(pub T);

/// Query extractor whose rejections use the action envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ActionError))]
pub struct ActionQuery<T>(pub T);

pub type ActionResult<T> = Result<ActionResponse<T>, ActionError>;
