use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ContentError;
use crate::application::repos::{ContactRepo, CreateContactSubmissionParams};
use crate::domain::entities::ContactSubmissionRecord;
use crate::domain::error::{DomainError, ensure_present};

const MAX_MESSAGE_CHARS: usize = 5000;
const MAX_NAME_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ContactSubmissionCommand {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact form submissions. They never appear on public pages, so writes
/// revalidate nothing.
#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn ContactRepo>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepo>) -> Self {
        Self { repo }
    }

    pub async fn submit(
        &self,
        command: ContactSubmissionCommand,
    ) -> Result<ContactSubmissionRecord, ContentError> {
        ensure_present(&command.name, "name")?;
        ensure_present(&command.message, "message")?;
        let email = command.email.trim();
        if !is_plausible_email(email) {
            return Err(DomainError::validation("email", "must be an e-mail address").into());
        }
        if command.name.trim().chars().count() > MAX_NAME_CHARS {
            return Err(DomainError::validation(
                "name",
                format!("must be at most {MAX_NAME_CHARS} characters"),
            )
            .into());
        }
        if command.message.trim().chars().count() > MAX_MESSAGE_CHARS {
            return Err(DomainError::validation(
                "message",
                format!("must be at most {MAX_MESSAGE_CHARS} characters"),
            )
            .into());
        }

        let submission = self
            .repo
            .create_submission(CreateContactSubmissionParams {
                name: command.name.trim().to_string(),
                email: email.to_string(),
                message: command.message.trim().to_string(),
            })
            .await?;
        info!(id = %submission.id, "contact submission received");
        Ok(submission)
    }

    pub async fn list(
        &self,
        unread_only: bool,
    ) -> Result<Vec<ContactSubmissionRecord>, ContentError> {
        Ok(self.repo.list_submissions(unread_only).await?)
    }

    pub async fn mark_read(
        &self,
        id: Uuid,
        is_read: bool,
    ) -> Result<ContactSubmissionRecord, ContentError> {
        self.repo
            .mark_read(id, is_read)
            .await
            .map_err(ContentError::missing("contact submission"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ContentError> {
        self.repo
            .delete_submission(id)
            .await
            .map_err(ContentError::missing("contact submission"))?;
        info!(id = %id, "contact submission deleted");
        Ok(())
    }
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepositories;

    fn message(email: &str) -> ContactSubmissionCommand {
        ContactSubmissionCommand {
            name: "Ada".into(),
            email: email.into(),
            message: "When is the next open day?".into(),
        }
    }

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("ada@example.org"));
        assert!(!is_plausible_email("ada.example.org"));
        assert!(!is_plausible_email("@example.org"));
        assert!(!is_plausible_email("ada@"));
        assert!(!is_plausible_email("a da@example.org"));
    }

    #[tokio::test]
    async fn submissions_start_unread() {
        let service = ContactService::new(Arc::new(MemoryRepositories::new()));
        let created = service.submit(message(" ada@example.org ")).await.unwrap();
        assert!(!created.is_read);
        assert_eq!(created.email, "ada@example.org");

        service.mark_read(created.id, true).await.unwrap();
        assert!(service.list(true).await.unwrap().is_empty());
        assert_eq!(service.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let service = ContactService::new(Arc::new(MemoryRepositories::new()));
        assert!(matches!(
            service.submit(message("nope")).await,
            Err(ContentError::Validation(_))
        ));
    }
}
