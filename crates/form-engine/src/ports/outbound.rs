//! Outbound ports
//!
//! Hexagonal architecture: infrastructure implements these traits.

use async_trait::async_trait;

use crate::application::dto::{Submission, TemplateFilter, TemplatePatch};
use crate::domain::aggregates::FormTemplate;
use crate::domain::value_objects::TemplateId;
use crate::error::Result;

/// Template store port
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// List templates matching the filter
    async fn list(&self, filter: &TemplateFilter) -> Result<Vec<FormTemplate>>;

    /// Find template by ID
    async fn get(&self, id: &TemplateId) -> Result<Option<FormTemplate>>;

    /// Persist a new template; the store assigns its identifier
    async fn create(&self, template: FormTemplate) -> Result<FormTemplate>;

    /// Apply a patch to a stored template
    async fn update(&self, id: &TemplateId, patch: TemplatePatch) -> Result<FormTemplate>;

    /// Copy a stored template under a new name, as a draft
    async fn duplicate(&self, id: &TemplateId, new_name: &str) -> Result<FormTemplate>;

    /// Delete template
    async fn delete(&self, id: &TemplateId) -> Result<()>;
}

/// Receives accepted submissions. The engine never performs the delivery
/// itself.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, submission: Submission) -> Result<()>;
}
