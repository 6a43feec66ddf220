use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SettingsRepo, UpsertSettingParams},
    domain::settings::{SettingRecord, SettingType},
};

use super::{PostgresRepositories, map_sqlx_error};

const SETTING_COLUMNS: &str = "key, value, setting_type, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SettingRow {
    key: String,
    value: String,
    setting_type: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<SettingRow> for SettingRecord {
    type Error = RepoError;

    fn try_from(row: SettingRow) -> Result<Self, Self::Error> {
        let setting_type = row
            .setting_type
            .parse::<SettingType>()
            .map_err(|err| RepoError::Integrity {
                message: format!("setting `{}`: {err}", row.key),
            })?;
        Ok(Self {
            key: row.key,
            value: row.value,
            setting_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl SettingsRepo for PostgresRepositories {
    async fn list_settings(&self) -> Result<Vec<SettingRecord>, RepoError> {
        let sql = format!("SELECT {SETTING_COLUMNS} FROM site_settings ORDER BY key");
        sqlx::query_as::<_, SettingRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(SettingRecord::try_from)
            .collect()
    }

    async fn find_setting(&self, key: &str) -> Result<Option<SettingRecord>, RepoError> {
        let sql = format!("SELECT {SETTING_COLUMNS} FROM site_settings WHERE key = $1");
        sqlx::query_as::<_, SettingRow>(&sql)
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .map(SettingRecord::try_from)
            .transpose()
    }

    async fn upsert_setting(
        &self,
        params: UpsertSettingParams,
    ) -> Result<SettingRecord, RepoError> {
        let sql = format!(
            "INSERT INTO site_settings (key, value, setting_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET \
                 value = EXCLUDED.value, \
                 setting_type = EXCLUDED.setting_type, \
                 updated_at = now() \
             RETURNING {SETTING_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SettingRow>(&sql)
            .bind(&params.key)
            .bind(&params.value)
            .bind(params.setting_type.as_str())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        SettingRecord::try_from(row)
    }

    async fn insert_setting_if_absent(
        &self,
        params: UpsertSettingParams,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "INSERT INTO site_settings (key, value, setting_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(&params.key)
        .bind(&params.value)
        .bind(params.setting_type.as_str())
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() == 1)
    }
}
