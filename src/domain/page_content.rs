//! Named content blocks consumed by public pages.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

const MAX_PAGE_KEY_LEN: usize = 64;

/// Structured metadata attached to a page content block.
///
/// Metadata is persisted as serialized JSON text. Reads never fail because of
/// it: text that does not decode to a mapping is surfaced as [`Raw`].
///
/// [`Raw`]: PageMetadata::Raw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageMetadata {
    Structured(Map<String, Value>),
    Raw(String),
}

impl PageMetadata {
    /// Decode persisted metadata text.
    pub fn decode(stored: &str) -> Self {
        match serde_json::from_str::<Value>(stored) {
            Ok(Value::Object(map)) => PageMetadata::Structured(map),
            _ => PageMetadata::Raw(stored.to_string()),
        }
    }

    /// Accept a value submitted by the admin UI; only mappings are allowed.
    pub fn from_input(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(map) => Ok(PageMetadata::Structured(map)),
            other => Err(DomainError::validation(
                "metadata",
                format!("expected a mapping, got {}", json_kind(&other)),
            )),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            PageMetadata::Structured(map) => Value::Object(map.clone()).to_string(),
            PageMetadata::Raw(raw) => raw.clone(),
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            PageMetadata::Structured(map) => Some(map),
            PageMetadata::Raw(_) => None,
        }
    }

    /// Look up a string field, as the contact and about pages do for address lines.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.as_map()?.get(name)?.as_str()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContentRecord {
    pub id: Uuid,
    pub page_key: String,
    pub title: String,
    pub content: String,
    pub metadata: Option<PageMetadata>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validate a page key: lowercase ASCII, digits, `-` and `_`.
pub fn normalize_page_key(raw: &str) -> Result<String, DomainError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(DomainError::required("pageKey"));
    }
    if key.len() > MAX_PAGE_KEY_LEN {
        return Err(DomainError::validation(
            "pageKey",
            format!("must be at most {MAX_PAGE_KEY_LEN} characters"),
        ));
    }
    if !key
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '_'))
    {
        return Err(DomainError::validation(
            "pageKey",
            "may only contain lowercase letters, digits, `-` and `_`",
        ));
    }
    Ok(key.to_string())
}
