use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::response::ActionError;

const SOURCE: &str = "infra::http::auth";

/// Digest of the configured admin bearer token.
#[derive(Clone)]
pub struct AdminToken {
    digest: Option<Arc<[u8]>>,
}

impl AdminToken {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            digest: token.map(|token| Arc::from(hash_token(token).as_slice())),
        }
    }

    /// Whether any token is configured. Without one every request is refused.
    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    pub fn verify(&self, presented: &str) -> bool {
        match self.digest.as_ref() {
            Some(expected) => {
                let presented = hash_token(presented);
                expected.as_ref().ct_eq(presented.as_slice()).unwrap_u8() == 1
            }
            None => false,
        }
    }
}

fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    let raw = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    raw.strip_prefix("Bearer ").map(str::trim)
}

/// Reject requests without the admin bearer token before any handler runs.
pub async fn require_admin_token(
    State(token): State<AdminToken>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = bearer_token(&request).is_some_and(|presented| token.verify(presented));
    if !authorized {
        let detail = if token.is_configured() {
            "missing or invalid bearer token"
        } else {
            "admin token is not configured"
        };
        return ActionError::unauthorized(SOURCE)
            .with_detail(detail)
            .into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_configured_token() {
        let token = AdminToken::new(Some("correct-horse-battery"));
        assert!(token.verify("correct-horse-battery"));
        assert!(!token.verify("correct-horse"));
        assert!(!token.verify(""));
    }

    #[test]
    fn unconfigured_token_refuses_everything() {
        let token = AdminToken::new(None);
        assert!(!token.is_configured());
        assert!(!token.verify(""));
        assert!(!token.verify("anything"));
    }
}
