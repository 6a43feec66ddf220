//! In-memory implementation of every repository trait.
//!
//! Used when no database is configured and by tests. Ordering and uniqueness
//! rules mirror the Postgres adapters; metadata is stored as encoded text
//! and decoded on read, the way the `page_content.metadata` column is.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::repos::{
    ArticlesRepo, ContactRepo, CreateArticleParams, CreateContactSubmissionParams, FaqParams,
    FaqsRepo, GalleryCategoryParams, GalleryItemParams, GalleryRepo, HeroSectionParams,
    HeroSectionsRepo, PageContentRepo, RepoError, ScheduleEventParams, ScheduleRepo,
    SettingsRepo, UpdateArticleParams, UpsertPageContentParams, UpsertSettingParams,
};
use crate::domain::entities::{
    ArticleRecord, ContactSubmissionRecord, FaqRecord, GalleryCategoryRecord, GalleryItemRecord,
    HeroSectionRecord, ScheduleEventRecord,
};
use crate::domain::page_content::{PageContentRecord, PageMetadata};
use crate::domain::settings::SettingRecord;

#[derive(Default)]
struct StoredPageContent {
    id: Uuid,
    page_key: String,
    title: String,
    content: String,
    metadata: Option<String>,
    is_active: bool,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl StoredPageContent {
    fn to_record(&self) -> PageContentRecord {
        let now = OffsetDateTime::now_utc();
        PageContentRecord {
            id: self.id,
            page_key: self.page_key.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            metadata: self.metadata.as_deref().map(PageMetadata::decode),
            is_active: self.is_active,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

#[derive(Default)]
struct State {
    settings: BTreeMap<String, SettingRecord>,
    page_content: HashMap<String, StoredPageContent>,
    articles: HashMap<Uuid, ArticleRecord>,
    faqs: HashMap<Uuid, FaqRecord>,
    hero_sections: HashMap<Uuid, HeroSectionRecord>,
    categories: HashMap<Uuid, GalleryCategoryRecord>,
    items: HashMap<Uuid, GalleryItemRecord>,
    events: HashMap<Uuid, ScheduleEventRecord>,
    submissions: HashMap<Uuid, ContactSubmissionRecord>,
}

#[derive(Clone, Default)]
pub struct MemoryRepositories {
    state: Arc<Mutex<State>>,
    offline: Arc<AtomicBool>,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as an unreachable store would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Store page content metadata text verbatim, bypassing validation.
    pub async fn put_raw_page_content(
        &self,
        page_key: &str,
        title: &str,
        raw_metadata: &str,
        is_active: bool,
    ) {
        let now = OffsetDateTime::now_utc();
        let mut state = self.state.lock().await;
        state.page_content.insert(
            page_key.to_string(),
            StoredPageContent {
                id: Uuid::new_v4(),
                page_key: page_key.to_string(),
                title: title.to_string(),
                content: String::new(),
                metadata: Some(raw_metadata.to_string()),
                is_active,
                created_at: Some(now),
                updated_at: Some(now),
            },
        );
    }

    pub fn health_check(&self) -> Result<(), RepoError> {
        self.ensure_online()
    }

    fn ensure_online(&self) -> Result<(), RepoError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("in-memory store is offline"));
        }
        Ok(())
    }
}

fn duplicate(constraint: &str) -> RepoError {
    RepoError::Duplicate {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl SettingsRepo for MemoryRepositories {
    async fn list_settings(&self) -> Result<Vec<SettingRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state.settings.values().cloned().collect())
    }

    async fn find_setting(&self, key: &str) -> Result<Option<SettingRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state.settings.get(key).cloned())
    }

    async fn upsert_setting(
        &self,
        params: UpsertSettingParams,
    ) -> Result<SettingRecord, RepoError> {
        self.ensure_online()?;
        let now = OffsetDateTime::now_utc();
        let mut state = self.state.lock().await;
        let record = state
            .settings
            .entry(params.key.clone())
            .and_modify(|existing| {
                existing.value = params.value.clone();
                existing.setting_type = params.setting_type;
                existing.updated_at = now;
            })
            .or_insert_with(|| SettingRecord {
                key: params.key.clone(),
                value: params.value.clone(),
                setting_type: params.setting_type,
                created_at: now,
                updated_at: now,
            });
        Ok(record.clone())
    }

    async fn insert_setting_if_absent(
        &self,
        params: UpsertSettingParams,
    ) -> Result<bool, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if state.settings.contains_key(&params.key) {
            return Ok(false);
        }
        let now = OffsetDateTime::now_utc();
        state.settings.insert(
            params.key.clone(),
            SettingRecord {
                key: params.key,
                value: params.value,
                setting_type: params.setting_type,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(true)
    }
}

#[async_trait]
impl PageContentRepo for MemoryRepositories {
    async fn find_page_content(
        &self,
        page_key: &str,
    ) -> Result<Option<PageContentRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state.page_content.get(page_key).map(StoredPageContent::to_record))
    }

    async fn list_page_content(
        &self,
        active_only: bool,
    ) -> Result<Vec<PageContentRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<PageContentRecord> = state
            .page_content
            .values()
            .filter(|stored| !active_only || stored.is_active)
            .map(StoredPageContent::to_record)
            .collect();
        records.sort_by(|a, b| {
            a.title
                .cmp(&b.title)
                .then(a.created_at.cmp(&b.created_at))
                .then_with(|| a.page_key.cmp(&b.page_key))
        });
        Ok(records)
    }

    async fn upsert_page_content(
        &self,
        params: UpsertPageContentParams,
    ) -> Result<PageContentRecord, RepoError> {
        self.ensure_online()?;
        let now = OffsetDateTime::now_utc();
        let mut state = self.state.lock().await;
        let stored = state
            .page_content
            .entry(params.page_key.clone())
            .or_insert_with(|| StoredPageContent {
                id: Uuid::new_v4(),
                page_key: params.page_key.clone(),
                created_at: Some(now),
                ..Default::default()
            });
        stored.title = params.title;
        stored.content = params.content;
        stored.metadata = params.metadata.as_ref().map(PageMetadata::encode);
        stored.is_active = params.is_active;
        stored.updated_at = Some(now);
        Ok(stored.to_record())
    }
}

fn article_order(a: &ArticleRecord, b: &ArticleRecord) -> std::cmp::Ordering {
    // Newest publication first, drafts (no date) last.
    b.published_at
        .is_some()
        .cmp(&a.published_at.is_some())
        .then(b.published_at.cmp(&a.published_at))
        .then(b.created_at.cmp(&a.created_at))
        .then(a.id.cmp(&b.id))
}

#[async_trait]
impl ArticlesRepo for MemoryRepositories {
    async fn list_articles(&self, published_only: bool) -> Result<Vec<ArticleRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<ArticleRecord> = state
            .articles
            .values()
            .filter(|article| !published_only || article.published)
            .cloned()
            .collect();
        records.sort_by(article_order);
        Ok(records)
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state.articles.get(&id).cloned())
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state
            .articles
            .values()
            .find(|article| article.slug == slug)
            .cloned())
    }

    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if state.articles.values().any(|article| article.slug == params.slug) {
            return Err(duplicate("articles_slug_key"));
        }
        let now = OffsetDateTime::now_utc();
        let record = ArticleRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            excerpt: params.excerpt,
            content: params.content,
            cover_image: params.cover_image,
            published: params.published,
            published_at: params.published_at,
            created_at: now,
            updated_at: now,
        };
        state.articles.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if state
            .articles
            .values()
            .any(|article| article.slug == params.slug && article.id != params.id)
        {
            return Err(duplicate("articles_slug_key"));
        }
        let record = state.articles.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        record.slug = params.slug;
        record.title = params.title;
        record.excerpt = params.excerpt;
        record.content = params.content;
        record.cover_image = params.cover_image;
        record.published = params.published;
        record.published_at = params.published_at;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        state.articles.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl FaqsRepo for MemoryRepositories {
    async fn list_faqs(&self, active_only: bool) -> Result<Vec<FaqRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<FaqRecord> = state
            .faqs
            .values()
            .filter(|faq| !active_only || faq.is_active)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn create_faq(&self, params: FaqParams) -> Result<FaqRecord, RepoError> {
        self.ensure_online()?;
        let now = OffsetDateTime::now_utc();
        let record = FaqRecord {
            id: Uuid::new_v4(),
            question: params.question,
            answer: params.answer,
            sort_order: params.sort_order,
            is_active: params.is_active,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.faqs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_faq(&self, id: Uuid, params: FaqParams) -> Result<FaqRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let record = state.faqs.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.question = params.question;
        record.answer = params.answer;
        record.sort_order = params.sort_order;
        record.is_active = params.is_active;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_faq(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        state.faqs.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl HeroSectionsRepo for MemoryRepositories {
    async fn list_hero_sections(
        &self,
        active_only: bool,
    ) -> Result<Vec<HeroSectionRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<HeroSectionRecord> = state
            .hero_sections
            .values()
            .filter(|hero| !active_only || hero.is_active)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn create_hero_section(
        &self,
        params: HeroSectionParams,
    ) -> Result<HeroSectionRecord, RepoError> {
        self.ensure_online()?;
        let now = OffsetDateTime::now_utc();
        let record = HeroSectionRecord {
            id: Uuid::new_v4(),
            title: params.title,
            subtitle: params.subtitle,
            image_url: params.image_url,
            cta_label: params.cta_label,
            cta_href: params.cta_href,
            sort_order: params.sort_order,
            is_active: params.is_active,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .hero_sections
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_hero_section(
        &self,
        id: Uuid,
        params: HeroSectionParams,
    ) -> Result<HeroSectionRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let record = state.hero_sections.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.title = params.title;
        record.subtitle = params.subtitle;
        record.image_url = params.image_url;
        record.cta_label = params.cta_label;
        record.cta_href = params.cta_href;
        record.sort_order = params.sort_order;
        record.is_active = params.is_active;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_hero_section(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        state
            .hero_sections
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl GalleryRepo for MemoryRepositories {
    async fn list_categories(&self) -> Result<Vec<GalleryCategoryRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<GalleryCategoryRecord> = state.categories.values().cloned().collect();
        records.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<GalleryCategoryRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<GalleryCategoryRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state
            .categories
            .values()
            .find(|category| category.slug == slug)
            .cloned())
    }

    async fn create_category(
        &self,
        params: GalleryCategoryParams,
    ) -> Result<GalleryCategoryRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if state.categories.values().any(|category| category.slug == params.slug) {
            return Err(duplicate("gallery_categories_slug_key"));
        }
        let now = OffsetDateTime::now_utc();
        let record = GalleryCategoryRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            name: params.name,
            sort_order: params.sort_order,
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_category(
        &self,
        id: Uuid,
        params: GalleryCategoryParams,
    ) -> Result<GalleryCategoryRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if state
            .categories
            .values()
            .any(|category| category.slug == params.slug && category.id != id)
        {
            return Err(duplicate("gallery_categories_slug_key"));
        }
        let record = state.categories.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.slug = params.slug;
        record.name = params.name;
        record.sort_order = params.sort_order;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if state.items.values().any(|item| item.category_id == Some(id)) {
            return Err(RepoError::Integrity {
                message: "gallery category still has items".to_string(),
            });
        }
        state.categories.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }

    async fn count_items_in_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.category_id == Some(category_id))
            .count() as u64)
    }

    async fn list_items(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<GalleryItemRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<GalleryItemRecord> = state
            .items
            .values()
            .filter(|item| category_id.is_none() || item.category_id == category_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn create_item(
        &self,
        params: GalleryItemParams,
    ) -> Result<GalleryItemRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if let Some(category_id) = params.category_id
            && !state.categories.contains_key(&category_id)
        {
            return Err(RepoError::Integrity {
                message: "gallery category does not exist".to_string(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let record = GalleryItemRecord {
            id: Uuid::new_v4(),
            category_id: params.category_id,
            title: params.title,
            media_url: params.media_url,
            media_kind: params.media_kind,
            sort_order: params.sort_order,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_item(
        &self,
        id: Uuid,
        params: GalleryItemParams,
    ) -> Result<GalleryItemRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        if let Some(category_id) = params.category_id
            && !state.categories.contains_key(&category_id)
        {
            return Err(RepoError::Integrity {
                message: "gallery category does not exist".to_string(),
            });
        }
        let record = state.items.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.category_id = params.category_id;
        record.title = params.title;
        record.media_url = params.media_url;
        record.media_kind = params.media_kind;
        record.sort_order = params.sort_order;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        state.items.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ScheduleRepo for MemoryRepositories {
    async fn list_events(
        &self,
        from: Option<OffsetDateTime>,
    ) -> Result<Vec<ScheduleEventRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<ScheduleEventRecord> = state
            .events
            .values()
            .filter(|event| match from {
                Some(from) => event.ends_at.unwrap_or(event.starts_at) >= from,
                None => true,
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn create_event(
        &self,
        params: ScheduleEventParams,
    ) -> Result<ScheduleEventRecord, RepoError> {
        self.ensure_online()?;
        let now = OffsetDateTime::now_utc();
        let record = ScheduleEventRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            location: params.location,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
            timezone: params.timezone,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.events.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_event(
        &self,
        id: Uuid,
        params: ScheduleEventParams,
    ) -> Result<ScheduleEventRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let record = state.events.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.title = params.title;
        record.description = params.description;
        record.location = params.location;
        record.starts_at = params.starts_at;
        record.ends_at = params.ends_at;
        record.timezone = params.timezone;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        state.events.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ContactRepo for MemoryRepositories {
    async fn create_submission(
        &self,
        params: CreateContactSubmissionParams,
    ) -> Result<ContactSubmissionRecord, RepoError> {
        self.ensure_online()?;
        let record = ContactSubmissionRecord {
            id: Uuid::new_v4(),
            name: params.name,
            email: params.email,
            message: params.message,
            is_read: false,
            created_at: OffsetDateTime::now_utc(),
        };
        self.state
            .lock()
            .await
            .submissions
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_submissions(
        &self,
        unread_only: bool,
    ) -> Result<Vec<ContactSubmissionRecord>, RepoError> {
        self.ensure_online()?;
        let state = self.state.lock().await;
        let mut records: Vec<ContactSubmissionRecord> = state
            .submissions
            .values()
            .filter(|submission| !unread_only || !submission.is_read)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        is_read: bool,
    ) -> Result<ContactSubmissionRecord, RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let record = state.submissions.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.is_read = is_read;
        Ok(record.clone())
    }

    async fn delete_submission(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        state
            .submissions
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::SettingType;

    #[tokio::test]
    async fn metadata_text_round_trips_through_decode() {
        let repos = MemoryRepositories::new();
        repos.put_raw_page_content("about", "About", "not json", true).await;

        let record = repos.find_page_content("about").await.unwrap().unwrap();
        assert_eq!(record.metadata, Some(PageMetadata::Raw("not json".into())));
    }

    #[tokio::test]
    async fn offline_store_fails_every_call() {
        let repos = MemoryRepositories::new();
        repos.set_offline(true);
        let err = repos
            .upsert_setting(UpsertSettingParams {
                key: "site_name".into(),
                value: "x".into(),
                setting_type: SettingType::Text,
            })
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }
}
