//! In-memory template store and submission sink

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::application::dto::{Submission, TemplateFilter, TemplatePatch};
use crate::domain::aggregates::FormTemplate;
use crate::domain::value_objects::{TemplateId, TemplateStatus};
use crate::error::{FormsError, Result};
use crate::ports::{SubmissionSink, TemplateStore};

fn poisoned<E>(_: E) -> FormsError {
    FormsError::Store("lock poisoned".into())
}

/// In-memory template store
#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<TemplateId, FormTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list(&self, filter: &TemplateFilter) -> Result<Vec<FormTemplate>> {
        let templates = self.templates.read().map_err(poisoned)?;
        let mut found: Vec<FormTemplate> = templates.values().filter(|t| filter.matches(t)).cloned().collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn get(&self, id: &TemplateId) -> Result<Option<FormTemplate>> {
        let templates = self.templates.read().map_err(poisoned)?;
        Ok(templates.get(id).cloned())
    }

    async fn create(&self, mut template: FormTemplate) -> Result<FormTemplate> {
        let now = Utc::now();
        let id = TemplateId::generate();
        template.id = Some(id.clone());
        template.created_at = Some(now);
        template.updated_at = Some(now);

        let mut templates = self.templates.write().map_err(poisoned)?;
        templates.insert(id, template.clone());
        Ok(template)
    }

    async fn update(&self, id: &TemplateId, patch: TemplatePatch) -> Result<FormTemplate> {
        let mut templates = self.templates.write().map_err(poisoned)?;
        let template = templates
            .get_mut(id)
            .ok_or_else(|| FormsError::TemplateNotFound(id.to_string()))?;
        patch.apply(template);
        template.updated_at = Some(Utc::now());
        Ok(template.clone())
    }

    async fn duplicate(&self, id: &TemplateId, new_name: &str) -> Result<FormTemplate> {
        let source = self
            .get(id)
            .await?
            .ok_or_else(|| FormsError::TemplateNotFound(id.to_string()))?;

        let mut copy = source;
        copy.id = None;
        copy.name = new_name.to_string();
        copy.status = TemplateStatus::Draft;
        self.create(copy).await
    }

    async fn delete(&self, id: &TemplateId) -> Result<()> {
        let mut templates = self.templates.write().map_err(poisoned)?;
        templates
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| FormsError::TemplateNotFound(id.to_string()))
    }
}

/// Sink that keeps every delivered submission (for testing)
#[derive(Default)]
pub struct CollectingSink {
    submissions: RwLock<Vec<Submission>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.read().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionSink for CollectingSink {
    async fn deliver(&self, submission: Submission) -> Result<()> {
        self.submissions.write().map_err(poisoned)?.push(submission);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TemplateCategory;

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = InMemoryTemplateStore::new();
        let created = store.create(FormTemplate::new("Lost & Found")).await.unwrap();
        assert!(created.id.is_some());
        assert!(created.created_at.is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_filter() {
        let store = InMemoryTemplateStore::new();
        let created = store.create(FormTemplate::new("Lost & Found")).await.unwrap();
        let id = created.id.unwrap();

        let patch = TemplatePatch { category: Some(TemplateCategory::Incident), ..Default::default() };
        store.update(&id, patch).await.unwrap();

        let filter = TemplateFilter { category: Some(TemplateCategory::Incident), ..Default::default() };
        assert_eq!(store.list(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_is_new_draft() {
        let store = InMemoryTemplateStore::new();
        let mut template = FormTemplate::new("Minibar");
        template.status = TemplateStatus::Active;
        let created = store.create(template).await.unwrap();

        let copy = store.duplicate(created.id.as_ref().unwrap(), "Minibar v2").await.unwrap();
        assert_ne!(copy.id, created.id);
        assert_eq!(copy.name, "Minibar v2");
        assert_eq!(copy.status, TemplateStatus::Draft);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = InMemoryTemplateStore::new();
        let result = store.delete(&TemplateId::from_string("tpl_missing")).await;
        assert!(matches!(result, Err(FormsError::TemplateNotFound(_))));
    }
}
