use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::invalidation::{SETTINGS_ENTRIES, revalidate};
use crate::application::repos::{RepoError, SettingsRepo, UpsertSettingParams};
use crate::cache::CacheInvalidator;
use crate::domain::error::DomainError;
use crate::domain::settings::{
    PREDEFINED_SETTINGS, PredefinedSetting, SettingRecord, SettingType, normalize_setting_key,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("setting `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepo>,
    cache: Option<CacheInvalidator>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache_opt(mut self, cache: Option<CacheInvalidator>) -> Self {
        self.cache = cache;
        self
    }

    /// Create or overwrite a setting. Nothing is written when validation fails.
    pub async fn upsert_setting(
        &self,
        key: &str,
        value: &str,
        setting_type: &str,
    ) -> Result<SettingRecord, SettingsError> {
        let key = normalize_setting_key(key)?;
        let setting_type: SettingType = setting_type.trim().parse()?;
        setting_type.validate_value(value)?;

        let record = self
            .repo
            .upsert_setting(UpsertSettingParams {
                key,
                value: value.to_string(),
                setting_type,
            })
            .await?;
        info!(key = %record.key, setting_type = %record.setting_type, "setting saved");

        revalidate(self.cache.as_ref(), "settings.upsert", SETTINGS_ENTRIES).await;
        Ok(record)
    }

    /// Every stored setting, ordered by key.
    pub async fn get_all_settings(&self) -> Result<Vec<SettingRecord>, SettingsError> {
        Ok(self.repo.list_settings().await?)
    }

    pub async fn get_setting(&self, key: &str) -> Result<SettingRecord, SettingsError> {
        self.repo
            .find_setting(key.trim())
            .await?
            .ok_or_else(|| SettingsError::NotFound(key.trim().to_string()))
    }

    /// Insert every predefined setting that is still missing; existing values
    /// are never touched. Returns the number of rows inserted.
    pub async fn initialize_predefined_settings(&self) -> Result<usize, SettingsError> {
        let mut inserted = 0;
        for predefined in PREDEFINED_SETTINGS {
            let created = self
                .repo
                .insert_setting_if_absent(UpsertSettingParams {
                    key: predefined.key.to_string(),
                    value: predefined.default_value.to_string(),
                    setting_type: predefined.setting_type,
                })
                .await?;
            if created {
                inserted += 1;
            }
        }

        info!(
            inserted,
            total = PREDEFINED_SETTINGS.len(),
            "predefined settings initialized"
        );
        if inserted > 0 {
            revalidate(self.cache.as_ref(), "settings.initialize", SETTINGS_ENTRIES).await;
        }
        Ok(inserted)
    }

    pub fn predefined(&self) -> &'static [PredefinedSetting] {
        PREDEFINED_SETTINGS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn service() -> (SettingsService, MemoryRepositories) {
        let repos = MemoryRepositories::new();
        (SettingsService::new(Arc::new(repos.clone())), repos)
    }

    #[tokio::test]
    async fn upsert_creates_then_overwrites() {
        let (service, _) = service();
        service
            .upsert_setting("site_name", "Old", "TEXT")
            .await
            .unwrap();
        let updated = service
            .upsert_setting("site_name", "New", "TEXTAREA")
            .await
            .unwrap();

        assert_eq!(updated.value, "New");
        assert_eq!(updated.setting_type, SettingType::Textarea);
        assert_eq!(service.get_all_settings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_type_is_rejected_without_writing() {
        let (service, _) = service();
        let err = service
            .upsert_setting("k", "v", "NOT_A_TYPE")
            .await
            .unwrap_err();

        assert!(matches!(err, SettingsError::Validation(_)));
        assert!(service.get_all_settings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn values_must_match_their_type() {
        let (service, _) = service();
        assert!(matches!(
            service.upsert_setting("maintenance_mode", "yes", "BOOLEAN").await,
            Err(SettingsError::Validation(_))
        ));
        assert!(matches!(
            service.upsert_setting("social_links", "{", "JSON").await,
            Err(SettingsError::Validation(_))
        ));
        assert!(matches!(
            service.upsert_setting("  ", "x", "TEXT").await,
            Err(SettingsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn seeding_is_idempotent_and_preserves_edits() {
        let (service, _) = service();
        service
            .upsert_setting("site_name", "Riverside Club", "TEXT")
            .await
            .unwrap();

        let first = service.initialize_predefined_settings().await.unwrap();
        let after_first = service.get_all_settings().await.unwrap();
        let second = service.initialize_predefined_settings().await.unwrap();
        let after_second = service.get_all_settings().await.unwrap();

        assert_eq!(first, PREDEFINED_SETTINGS.len() - 1);
        assert_eq!(second, 0);
        assert_eq!(after_first, after_second);
        assert_eq!(
            service.get_setting("site_name").await.unwrap().value,
            "Riverside Club"
        );
    }

    #[tokio::test]
    async fn missing_setting_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.get_setting("nope").await,
            Err(SettingsError::NotFound(key)) if key == "nope"
        ));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_repo_error() {
        let (service, repos) = service();
        repos.set_offline(true);
        match service.get_all_settings().await {
            Err(SettingsError::Repo(err)) => assert!(err.is_unavailable()),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
