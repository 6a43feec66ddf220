//! Selection of the persistence backend and the repository handles built from it.

use std::sync::Arc;

use crate::application::repos::{
    ArticlesRepo, ContactRepo, FaqsRepo, GalleryRepo, HeroSectionsRepo, PageContentRepo,
    RepoError, ScheduleRepo, SettingsRepo,
};

use super::{
    db::{PostgresRepositories, map_sqlx_error},
    memory::MemoryRepositories,
};

/// The store every repository handle points at.
#[derive(Clone)]
pub enum Datastore {
    Postgres(PostgresRepositories),
    Memory(MemoryRepositories),
}

impl Datastore {
    pub fn backend(&self) -> &'static str {
        match self {
            Datastore::Postgres(_) => "postgres",
            Datastore::Memory(_) => "memory",
        }
    }

    pub async fn health_check(&self) -> Result<(), RepoError> {
        match self {
            Datastore::Postgres(db) => db.health_check().await.map_err(map_sqlx_error),
            Datastore::Memory(memory) => memory.health_check(),
        }
    }

    pub fn repositories(&self) -> Repositories {
        match self {
            Datastore::Postgres(db) => Repositories::from_store(Arc::new(db.clone())),
            Datastore::Memory(memory) => Repositories::from_store(Arc::new(memory.clone())),
        }
    }
}

/// One trait-object handle per repository, all backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub settings: Arc<dyn SettingsRepo>,
    pub page_content: Arc<dyn PageContentRepo>,
    pub articles: Arc<dyn ArticlesRepo>,
    pub faqs: Arc<dyn FaqsRepo>,
    pub hero_sections: Arc<dyn HeroSectionsRepo>,
    pub gallery: Arc<dyn GalleryRepo>,
    pub schedule: Arc<dyn ScheduleRepo>,
    pub contact: Arc<dyn ContactRepo>,
}

impl Repositories {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: SettingsRepo
            + PageContentRepo
            + ArticlesRepo
            + FaqsRepo
            + HeroSectionsRepo
            + GalleryRepo
            + ScheduleRepo
            + ContactRepo
            + 'static,
    {
        Self {
            settings: store.clone(),
            page_content: store.clone(),
            articles: store.clone(),
            faqs: store.clone(),
            hero_sections: store.clone(),
            gallery: store.clone(),
            schedule: store.clone(),
            contact: store,
        }
    }
}
