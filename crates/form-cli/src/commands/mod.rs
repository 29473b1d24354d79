//! CLI Commands

pub mod config;
pub mod fields;
pub mod lint;
pub mod preview;
pub mod submit;
pub mod templates;

use anyhow::{anyhow, Context as _, Result};
use form_engine::{EngineConfig, FormField, FormTemplate, TemplateId, TemplateStore, ValueMap};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::Tabled;

use crate::output::OutputFormat;
use crate::store::DirTemplateStore;

/// Everything a command handler needs
pub struct Context {
    pub store: DirTemplateStore,
    pub engine: EngineConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: &crate::config::Config, store_dir: Option<PathBuf>, format: OutputFormat) -> Result<Self> {
        let dir = match store_dir {
            Some(dir) => dir,
            None => config.store_dir()?,
        };
        Ok(Self {
            store: DirTemplateStore::new(dir),
            engine: config.engine.clone(),
            format,
        })
    }

    /// Fetch a stored template by id
    pub async fn stored(&self, id: &str) -> Result<FormTemplate> {
        self.store
            .get(&TemplateId::from_string(id))
            .await?
            .ok_or_else(|| anyhow!("template not found: {}", id))
    }

    /// Resolve a template reference: a JSON file path if one exists, else a store id
    pub async fn resolve(&self, reference: &str) -> Result<FormTemplate> {
        let path = Path::new(reference);
        if path.is_file() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(FormTemplate::from_json(&content)?);
        }
        self.stored(reference).await
    }
}

/// Read a JSON object of field id to value
pub async fn read_values(path: &Path) -> Result<ValueMap> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not a JSON object of field values", path.display()))
}

#[derive(Debug, Serialize, Tabled)]
pub struct TemplateRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub status: String,
    pub fields: usize,
    pub updated: String,
}

impl From<&FormTemplate> for TemplateRow {
    fn from(t: &FormTemplate) -> Self {
        Self {
            id: t.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            name: t.name.clone(),
            category: t.category.to_string(),
            status: t.status.to_string(),
            fields: t.fields.len(),
            updated: t.updated_at.map(|at| at.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct FieldRow {
    pub order: u32,
    pub id: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    pub required: bool,
    pub width: u8,
    #[tabled(rename = "shown when")]
    pub shown_when: String,
}

impl From<&FormField> for FieldRow {
    fn from(f: &FormField) -> Self {
        Self {
            order: f.order,
            id: f.id.to_string(),
            field_type: f.field_type.to_string(),
            label: f.label.clone(),
            required: f.required,
            width: f.width.percent(),
            shown_when: f
                .conditional
                .as_ref()
                .map(|c| format!("{} {} {}", c.field_id, c.operator, c.value))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct IssueRow {
    pub field: String,
    pub problem: String,
}

impl IssueRow {
    pub fn new(field: impl Into<String>, problem: impl ToString) -> Self {
        Self { field: field.into(), problem: problem.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{ConditionalRule, FieldType};

    #[test]
    fn test_field_row_describes_condition() {
        let field = FormField::new("reason", FieldType::Textarea, "Why?")
            .with_conditional(ConditionalRule::equals("satisfied", "no"));
        let row = FieldRow::from(&field);
        assert_eq!(row.shown_when, "satisfied equals \"no\"");
        assert_eq!(row.width, 100);
    }

    #[tokio::test]
    async fn test_resolve_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        let template = FormTemplate::new("From Disk");
        std::fs::write(&path, template.to_json().unwrap()).unwrap();

        let ctx = Context {
            store: DirTemplateStore::new(dir.path().join("store")),
            engine: EngineConfig::default(),
            format: OutputFormat::Json,
        };
        assert_eq!(ctx.resolve(path.to_str().unwrap()).await.unwrap().name, "From Disk");
        assert!(ctx.resolve("tpl_missing").await.is_err());
    }
}
