//! Admin services for the site's content collections.

pub mod articles;
pub mod contact;
pub mod faqs;
pub mod gallery;
pub mod hero;
pub mod schedule;

use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::domain::slug::{SlugAsyncError, SlugError};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ContentError {
    pub(crate) fn from_slug(field: &'static str, err: SlugAsyncError<RepoError>) -> Self {
        match err {
            SlugAsyncError::Slug(err @ SlugError::Exhausted { .. }) => {
                ContentError::Conflict(err.to_string())
            }
            SlugAsyncError::Slug(err) => DomainError::validation(field, err.to_string()).into(),
            SlugAsyncError::Predicate(err) => ContentError::Repo(err),
        }
    }

    /// Map a repository `NotFound` to the named resource.
    pub(crate) fn missing(resource: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |err| match err {
            RepoError::NotFound => ContentError::NotFound(resource),
            other => ContentError::Repo(other),
        }
    }
}

/// Trim an optional text field, treating blank input as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
