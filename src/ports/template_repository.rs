//! TemplateRepository port - persistence for activity templates.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, TemplateId};
use crate::domain::scheduling::ActivityTemplate;

/// Errors that can occur in repository operations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The addressed record does not exist.
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    /// Backing store failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Creates a not-found error for an entity kind and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        let code = match &err {
            RepositoryError::NotFound { entity, .. } => match *entity {
                "template" => ErrorCode::TemplateNotFound,
                "event" => ErrorCode::EventNotFound,
                _ => ErrorCode::StorageError,
            },
            RepositoryError::Storage(_) => ErrorCode::StorageError,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Repository port for activity template persistence.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Saves a new template.
    async fn save(&self, template: &ActivityTemplate) -> Result<(), RepositoryError>;

    /// Updates an existing template.
    ///
    /// # Errors
    ///
    /// `NotFound` if the template does not exist.
    async fn update(&self, template: &ActivityTemplate) -> Result<(), RepositoryError>;

    /// Finds a template by id. Returns `None` if not found.
    async fn find_by_id(
        &self,
        id: &TemplateId,
    ) -> Result<Option<ActivityTemplate>, RepositoryError>;

    /// Finds a template by its exact name. Returns `None` if not found.
    async fn find_by_name(&self, name: &str)
        -> Result<Option<ActivityTemplate>, RepositoryError>;

    /// Lists templates that may still spawn events, sorted by name.
    async fn list_active(&self) -> Result<Vec<ActivityTemplate>, RepositoryError>;
}
