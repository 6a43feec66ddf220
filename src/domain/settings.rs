//! Typed key/value site settings and the table of settings every site expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::DomainError;

/// How a setting's text value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SettingType {
    Text,
    Textarea,
    Image,
    Boolean,
    Json,
}

impl SettingType {
    pub const ALL: [SettingType; 5] = [
        SettingType::Text,
        SettingType::Textarea,
        SettingType::Image,
        SettingType::Boolean,
        SettingType::Json,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingType::Text => "TEXT",
            SettingType::Textarea => "TEXTAREA",
            SettingType::Image => "IMAGE",
            SettingType::Boolean => "BOOLEAN",
            SettingType::Json => "JSON",
        }
    }

    /// Check that `value` can be read back as this type.
    pub fn validate_value(self, value: &str) -> Result<(), DomainError> {
        match self {
            SettingType::Text | SettingType::Textarea | SettingType::Image => Ok(()),
            SettingType::Boolean => parse_bool(value).map(|_| ()).ok_or_else(|| {
                DomainError::validation("value", "BOOLEAN settings accept `true` or `false`")
            }),
            SettingType::Json => serde_json::from_str::<serde_json::Value>(value)
                .map(|_| ())
                .map_err(|err| DomainError::validation("value", format!("invalid JSON: {err}"))),
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SettingType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| {
                DomainError::validation(
                    "type",
                    format!("`{value}` is not one of TEXT, TEXTAREA, IMAGE, BOOLEAN, JSON"),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRecord {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A setting value decoded according to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedSettingValue<'a> {
    Text(&'a str),
    Image(&'a str),
    Boolean(bool),
    Json(serde_json::Value),
    /// Stored value no longer matches its type; surfaced verbatim.
    Malformed(&'a str),
}

impl SettingRecord {
    pub fn typed_value(&self) -> TypedSettingValue<'_> {
        match self.setting_type {
            SettingType::Text | SettingType::Textarea => TypedSettingValue::Text(&self.value),
            SettingType::Image => TypedSettingValue::Image(&self.value),
            SettingType::Boolean => match parse_bool(&self.value) {
                Some(flag) => TypedSettingValue::Boolean(flag),
                None => TypedSettingValue::Malformed(&self.value),
            },
            SettingType::Json => match serde_json::from_str(&self.value) {
                Ok(json) => TypedSettingValue::Json(json),
                Err(_) => TypedSettingValue::Malformed(&self.value),
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Normalise and check a setting key.
pub fn normalize_setting_key(raw: &str) -> Result<String, DomainError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(DomainError::required("key"));
    }
    if key.len() > 128 {
        return Err(DomainError::validation("key", "must be at most 128 characters"));
    }
    if !key
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
    {
        return Err(DomainError::validation(
            "key",
            "may only contain ASCII letters, digits, `_`, `-` and `.`",
        ));
    }
    Ok(key.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedSetting {
    pub key: &'static str,
    pub label: &'static str,
    pub default_value: &'static str,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
}

const fn predefined(
    key: &'static str,
    label: &'static str,
    default_value: &'static str,
    setting_type: SettingType,
) -> PredefinedSetting {
    PredefinedSetting {
        key,
        label,
        default_value,
        setting_type,
    }
}

/// Settings the public site reads. Seeding inserts the missing ones and the
/// admin UI takes its labels from here.
pub const PREDEFINED_SETTINGS: &[PredefinedSetting] = &[
    predefined("site_name", "Site name", "My Organisation", SettingType::Text),
    predefined(
        "site_description",
        "Site description",
        "",
        SettingType::Textarea,
    ),
    predefined("site_logo", "Logo", "", SettingType::Image),
    predefined("site_favicon", "Favicon", "", SettingType::Image),
    predefined("contact_email", "Contact e-mail", "", SettingType::Text),
    predefined("contact_phone", "Contact phone", "", SettingType::Text),
    predefined("contact_address", "Postal address", "", SettingType::Textarea),
    predefined(
        "social_links",
        "Social links",
        "{\"facebook\":\"\",\"instagram\":\"\",\"youtube\":\"\"}",
        SettingType::Json,
    ),
    predefined("footer_text", "Footer text", "", SettingType::Textarea),
    predefined(
        "maintenance_mode",
        "Maintenance mode",
        "false",
        SettingType::Boolean,
    ),
    predefined(
        "show_schedule_on_home",
        "Show schedule on home page",
        "true",
        SettingType::Boolean,
    ),
    predefined(
        "default_timezone",
        "Default timezone",
        "UTC",
        SettingType::Text,
    ),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn parses_known_types_and_rejects_others() {
        assert_eq!("JSON".parse::<SettingType>(), Ok(SettingType::Json));
        assert_eq!("TEXTAREA".parse::<SettingType>(), Ok(SettingType::Textarea));
        let err = "NOT_A_TYPE".parse::<SettingType>().unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "type", .. }));
        assert!("text".parse::<SettingType>().is_err());
    }

    #[test]
    fn boolean_and_json_values_are_checked() {
        assert!(SettingType::Boolean.validate_value("true").is_ok());
        assert!(SettingType::Boolean.validate_value("yes").is_err());
        assert!(SettingType::Json.validate_value("{\"a\":1}").is_ok());
        assert!(SettingType::Json.validate_value("{a:1}").is_err());
        assert!(SettingType::Image.validate_value("").is_ok());
    }

    #[test]
    fn predefined_table_is_consistent() {
        let mut keys = HashSet::new();
        for setting in PREDEFINED_SETTINGS {
            assert!(keys.insert(setting.key), "duplicate key {}", setting.key);
            assert_eq!(normalize_setting_key(setting.key).as_deref(), Ok(setting.key));
            setting
                .setting_type
                .validate_value(setting.default_value)
                .expect("default matches type");
        }
    }

    #[test]
    fn typed_value_degrades_to_malformed() {
        let now = OffsetDateTime::now_utc();
        let record = SettingRecord {
            key: "maintenance_mode".into(),
            value: "maybe".into(),
            setting_type: SettingType::Boolean,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(record.typed_value(), TypedSettingValue::Malformed("maybe"));
    }

    #[test]
    fn setting_keys_are_trimmed_and_checked() {
        assert_eq!(normalize_setting_key("  site_name "), Ok("site_name".to_string()));
        assert!(normalize_setting_key("   ").is_err());
        assert!(normalize_setting_key("bad key").is_err());
    }
}
