//! In-memory template repository.
//!
//! Process-local storage; all records are lost on restart. This mirrors the
//! core's accepted limitation that no state survives a process restart.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::TemplateId;
use crate::domain::scheduling::ActivityTemplate;
use crate::ports::{RepositoryError, TemplateRepository};

/// In-memory implementation of [`TemplateRepository`].
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<TemplateId, ActivityTemplate>>,
}

impl InMemoryTemplateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateStore {
    async fn save(&self, template: &ActivityTemplate) -> Result<(), RepositoryError> {
        let mut templates = self.templates.write().await;
        templates.insert(*template.id(), template.clone());
        Ok(())
    }

    async fn update(&self, template: &ActivityTemplate) -> Result<(), RepositoryError> {
        let mut templates = self.templates.write().await;
        if !templates.contains_key(template.id()) {
            return Err(RepositoryError::not_found("template", template.id()));
        }
        templates.insert(*template.id(), template.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &TemplateId,
    ) -> Result<Option<ActivityTemplate>, RepositoryError> {
        let templates = self.templates.read().await;
        Ok(templates.get(id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ActivityTemplate>, RepositoryError> {
        let templates = self.templates.read().await;
        Ok(templates.values().find(|t| t.name() == name).cloned())
    }

    async fn list_active(&self) -> Result<Vec<ActivityTemplate>, RepositoryError> {
        let templates = self.templates.read().await;
        let mut active: Vec<ActivityTemplate> = templates
            .values()
            .filter(|t| t.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(active)
    }
}
