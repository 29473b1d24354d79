//! Builder Session
//!
//! Authoring workflow over one template: structural edits go through the
//! field order manager, property edits are keyed by field id, and a single
//! selected-field pointer follows what the authoring UI has focused.

use chrono::Utc;
use tracing::{debug, info};

use crate::application::dto::{FieldPatch, TemplatePatch};
use crate::config::EngineConfig;
use crate::domain::aggregates::{FormField, FormTemplate, Settings, Styling};
use crate::domain::events::BuilderEvent;
use crate::domain::services::OrderManager;
use crate::domain::value_objects::{
    ConditionalRule, FieldId, FieldOption, FieldType, TemplateCategory, TemplateStatus, ValidationRule,
};
use crate::error::{FormsError, Result, SaveRejection};
use crate::ports::TemplateStore;

pub struct BuilderSession {
    template: FormTemplate,
    order: OrderManager,
    selected: Option<FieldId>,
    events: Vec<BuilderEvent>,
    dirty: bool,
}

impl BuilderSession {
    /// Start authoring an empty template
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, EngineConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            template: FormTemplate::new(name),
            order: OrderManager::new(config),
            selected: None,
            events: vec![],
            dirty: false,
        }
    }

    /// Resume authoring a stored template
    pub fn from_template(mut template: FormTemplate, config: EngineConfig) -> Result<Self> {
        template.normalize_order();
        template
            .check_invariants()
            .map_err(|e| FormsError::SchemaInvariantViolation(e.to_string()))?;
        Ok(Self {
            template,
            order: OrderManager::new(config),
            selected: None,
            events: vec![],
            dirty: false,
        })
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn template(&self) -> &FormTemplate { &self.template }
    pub fn fields(&self) -> &[FormField] { &self.template.fields }
    pub fn field(&self, id: &str) -> Option<&FormField> { self.template.field(id) }
    pub fn selected(&self) -> Option<&FieldId> { self.selected.as_ref() }
    pub fn is_dirty(&self) -> bool { self.dirty }

    pub fn selected_field(&self) -> Option<&FormField> {
        self.selected.as_ref().and_then(|id| self.template.field(id.as_str()))
    }

    // =========================================================================
    // Template properties
    // =========================================================================

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.template.description = description.into();
        self.touch();
    }

    pub fn set_category(&mut self, category: TemplateCategory) {
        self.template.category = category;
        self.touch();
    }

    pub fn set_styling(&mut self, styling: Styling) {
        self.template.styling = styling;
        self.touch();
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.template.settings = settings;
        self.touch();
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Append a new field and select it
    pub fn add_field(&mut self, field_type: FieldType) -> Result<FieldId> {
        let at = self.template.fields.len();
        self.insert_field(field_type, at)
    }

    /// Insert a new field at `at` and select it
    pub fn insert_field(&mut self, field_type: FieldType, at: usize) -> Result<FieldId> {
        let id = self.order.insert(&mut self.template.fields, field_type, at)?;
        self.events.push(BuilderEvent::FieldAdded { field_id: id.clone(), field_type, index: at });
        self.selected = Some(id.clone());
        self.touch();
        Ok(id)
    }

    /// Insert a prepared field, e.g. one pasted from another template
    pub fn insert_prepared(&mut self, field: FormField, at: usize) -> Result<FieldId> {
        let field_type = field.field_type;
        let id = self.order.insert_field(&mut self.template.fields, field, at)?;
        self.events.push(BuilderEvent::FieldAdded { field_id: id.clone(), field_type, index: at });
        self.touch();
        Ok(id)
    }

    /// Reorder target of drag gestures
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<()> {
        self.order.move_field(&mut self.template.fields, from, to)?;
        if from != to {
            let field_id = self.template.fields[to].id.clone();
            self.events.push(BuilderEvent::FieldMoved { field_id, from, to });
            self.touch();
        }
        Ok(())
    }

    /// Reorder by identifiers: `id` ends up at the index `target` held, so
    /// a forward move lands after the target and a backward move before it
    pub fn move_field_to(&mut self, id: &FieldId, target: &FieldId) -> Result<()> {
        let from = self.index_of(id)?;
        let to = self.index_of(target)?;
        self.move_field(from, to)
    }

    /// Copy a field to the end of the form and select the copy
    pub fn duplicate_field(&mut self, id: &FieldId) -> Result<FieldId> {
        let copy_id = self.order.duplicate(&mut self.template.fields, id)?;
        self.events.push(BuilderEvent::FieldDuplicated { source_id: id.clone(), copy_id: copy_id.clone() });
        self.selected = Some(copy_id.clone());
        self.touch();
        Ok(copy_id)
    }

    /// Remove a field. Conditions that referenced it are cleared.
    pub fn delete_field(&mut self, id: &FieldId) -> Result<FormField> {
        let removed = self.order.remove(&mut self.template.fields, id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.events.push(BuilderEvent::FieldRemoved {
            field_id: id.clone(),
            cleared_conditions: removed.cleared_conditions,
        });
        self.touch();
        Ok(removed.field)
    }

    // =========================================================================
    // Property edits
    // =========================================================================

    pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let seed_options = match patch.field_type {
            Some(t) if t.is_choice() && patch.options.is_none() => Some(self.order.new_field(t).options),
            _ => None,
        };

        let field = self.field_mut(id)?;
        patch.apply(field);
        if let Some(options) = seed_options {
            if field.options.is_empty() {
                field.options = options;
            }
        }

        debug!(field = %id, "field updated");
        self.events.push(BuilderEvent::FieldUpdated { field_id: id.clone() });
        self.touch();
        Ok(())
    }

    pub fn set_options(&mut self, id: &FieldId, options: Vec<FieldOption>) -> Result<()> {
        self.update_field(id, FieldPatch { options: Some(options), ..FieldPatch::default() })
    }

    pub fn set_conditional(&mut self, id: &FieldId, conditional: Option<ConditionalRule>) -> Result<()> {
        self.update_field(id, FieldPatch { conditional: Some(conditional), ..FieldPatch::default() })
    }

    pub fn add_rule(&mut self, id: &FieldId, rule: ValidationRule) -> Result<()> {
        self.field_mut(id)?.validation.push(rule);
        self.events.push(BuilderEvent::FieldUpdated { field_id: id.clone() });
        self.touch();
        Ok(())
    }

    pub fn remove_rule(&mut self, id: &FieldId, index: usize) -> Result<ValidationRule> {
        let field = self.field_mut(id)?;
        let len = field.validation.len();
        if index >= len {
            return Err(FormsError::IndexOutOfRange { index, len });
        }
        let rule = field.validation.remove(index);
        self.events.push(BuilderEvent::FieldUpdated { field_id: id.clone() });
        self.touch();
        Ok(rule)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select(&mut self, id: &FieldId) -> Result<()> {
        self.index_of(id)?;
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // =========================================================================
    // Save & lifecycle
    // =========================================================================

    /// Pre-save checks; returns the template ready for persistence
    pub fn assemble(&self) -> std::result::Result<FormTemplate, SaveRejection> {
        if self.template.name.trim().is_empty() {
            return Err(SaveRejection::EmptyName);
        }
        if self.template.fields.is_empty() {
            return Err(SaveRejection::NoFields);
        }
        // unreachable through this API; kept as a guard for hand-built sessions
        self.template.check_invariants()?;
        Ok(self.template.clone())
    }

    /// Mark the template active once it passes save and publish checks
    pub fn publish(&mut self) -> Result<()> {
        self.assemble()?;
        if let Some(issue) = self.template.publish_issues().into_iter().next() {
            return Err(issue.into());
        }
        self.template.status = TemplateStatus::Active;
        self.events.push(BuilderEvent::Published {
            template_id: self.template.id.clone(),
            published_at: Utc::now(),
        });
        self.touch();
        Ok(())
    }

    pub fn archive(&mut self) {
        self.template.status = TemplateStatus::Archived;
        self.touch();
    }

    /// Persist through the template store: create on first save, update after
    pub async fn save(&mut self, store: &dyn TemplateStore) -> Result<FormTemplate> {
        let template = self.assemble()?;

        let saved = match self.template.id.clone() {
            Some(id) => store.update(&id, TemplatePatch::from_template(&template)).await?,
            None => store.create(template).await?,
        };
        let template_id = saved
            .id
            .clone()
            .ok_or_else(|| FormsError::Store("store returned a template without an id".into()))?;

        self.template.id = Some(template_id.clone());
        self.template.created_at = saved.created_at;
        self.template.updated_at = saved.updated_at;
        self.dirty = false;

        info!(template = %template_id, fields = saved.fields.len(), "template saved");
        self.events.push(BuilderEvent::Saved { template_id, saved_at: Utc::now() });
        Ok(saved)
    }

    /// Drain recorded events
    pub fn take_events(&mut self) -> Vec<BuilderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand the template over, e.g. to a runtime preview
    pub fn into_template(self) -> FormTemplate {
        self.template
    }

    // =========================================================================
    // Private
    // =========================================================================

    fn index_of(&self, id: &FieldId) -> Result<usize> {
        self.template
            .position(id.as_str())
            .ok_or_else(|| FormsError::FieldNotFound(id.clone()))
    }

    fn field_mut(&mut self, id: &FieldId) -> Result<&mut FormField> {
        self.template
            .fields
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| FormsError::FieldNotFound(id.clone()))
    }

    fn touch(&mut self) {
        self.dirty = true;
    }
}
