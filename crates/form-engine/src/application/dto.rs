//! Data Transfer Objects
//!
//! Patches and filters exchanged with the template store, field edits
//! applied by the builder, and the submission handed to the sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{FormField, FormTemplate, Settings, Styling};
use crate::domain::services::ValueMap;
use crate::domain::value_objects::{
    ConditionalRule, FieldOption, FieldType, FieldWidth, TemplateCategory, TemplateId, TemplateStatus,
    ValidationRule,
};

/// Filter for listing templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateFilter {
    pub category: Option<TemplateCategory>,
    pub status: Option<TemplateStatus>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &FormTemplate) -> bool {
        if self.category.is_some_and(|c| c != template.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != template.status) {
            return false;
        }
        match &self.search {
            Some(query) => template.name.to_lowercase().contains(&query.to_lowercase()),
            None => true,
        }
    }
}

/// Partial update of a stored template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TemplateCategory>,
    pub fields: Option<Vec<FormField>>,
    pub styling: Option<Styling>,
    pub settings: Option<Settings>,
    pub status: Option<TemplateStatus>,
}

impl TemplatePatch {
    /// Patch replacing everything with the content of `template`
    pub fn from_template(template: &FormTemplate) -> Self {
        Self {
            name: Some(template.name.clone()),
            description: Some(template.description.clone()),
            category: Some(template.category),
            fields: Some(template.fields.clone()),
            styling: Some(template.styling.clone()),
            settings: Some(template.settings.clone()),
            status: Some(template.status),
        }
    }

    pub fn status(status: TemplateStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn apply(self, template: &mut FormTemplate) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(category) = self.category {
            template.category = category;
        }
        if let Some(fields) = self.fields {
            template.fields = fields;
        }
        if let Some(styling) = self.styling {
            template.styling = styling;
        }
        if let Some(settings) = self.settings {
            template.settings = settings;
        }
        if let Some(status) = self.status {
            template.status = status;
        }
    }
}

/// Property edit of a single field.
///
/// `conditional: Some(None)` removes the field's conditional rule.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub required: Option<bool>,
    pub width: Option<FieldWidth>,
    pub options: Option<Vec<FieldOption>>,
    pub validation: Option<Vec<ValidationRule>>,
    pub conditional: Option<Option<ConditionalRule>>,
    pub content: Option<String>,
}

impl FieldPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.field_type.is_none()
            && self.label.is_none()
            && self.placeholder.is_none()
            && self.help_text.is_none()
            && self.required.is_none()
            && self.width.is_none()
            && self.options.is_none()
            && self.validation.is_none()
            && self.conditional.is_none()
            && self.content.is_none()
    }

    pub fn apply(self, field: &mut FormField) {
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(help_text) = self.help_text {
            field.help_text = help_text;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(width) = self.width {
            field.width = width;
        }
        if let Some(options) = self.options {
            field.options = options;
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(conditional) = self.conditional {
            field.conditional = conditional;
        }
        if let Some(content) = self.content {
            field.content = Some(content);
        }
    }
}

/// Accepted values on their way to the submission sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub template_id: Option<TemplateId>,
    pub values: ValueMap,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches() {
        let mut template = FormTemplate::new("Pool Incident Report");
        template.category = TemplateCategory::Incident;

        assert!(TemplateFilter::default().matches(&template));
        assert!(TemplateFilter { search: Some("pool".into()), ..Default::default() }.matches(&template));
        assert!(!TemplateFilter { category: Some(TemplateCategory::Staff), ..Default::default() }.matches(&template));
        assert!(!TemplateFilter { status: Some(TemplateStatus::Active), ..Default::default() }.matches(&template));
    }

    #[test]
    fn test_field_patch_clears_conditional() {
        let mut field = FormField::new("a", FieldType::Text, "A")
            .with_conditional(ConditionalRule::equals("b", "x"));
        let patch = FieldPatch { conditional: Some(None), required: Some(true), ..Default::default() };
        patch.apply(&mut field);
        assert!(field.conditional.is_none());
        assert!(field.required);
    }
}
