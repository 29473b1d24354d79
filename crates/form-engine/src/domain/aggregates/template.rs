//! Form Template Aggregate
//!
//! The complete, ordered definition of a form. Mutated only through the
//! builder session; the runtime renderer reads it and never writes to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::domain::services::{compile_pattern, cyclic_field_ids};
use crate::domain::value_objects::{
    ConditionalRule, FieldId, FieldOption, FieldType, FieldWidth, RuleType, TemplateCategory,
    TemplateId, TemplateStatus, ValidationRule,
};
use crate::error::{FormsError, SaveRejection};

/// A single element of a form template
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub width: FieldWidth,
    /// 1-based position, carried redundantly for transport
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalRule>,
    /// Markup of an html field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FormField {
    pub fn new(id: impl Into<FieldId>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            placeholder: String::new(),
            help_text: String::new(),
            required: false,
            width: FieldWidth::default(),
            order: 0,
            options: vec![],
            validation: vec![],
            conditional: None,
            content: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_width(mut self, width: FieldWidth) -> Self {
        self.width = width;
        self
    }

    pub fn with_options<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = labels.into_iter().map(FieldOption::from_label).collect();
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    pub fn with_conditional(mut self, conditional: ConditionalRule) -> Self {
        self.conditional = Some(conditional);
        self
    }

    /// Label used in messages, falling back to the id for unlabeled fields
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }

    pub fn is_input(&self) -> bool {
        self.field_type.is_input()
    }
}

/// Presentation parameters consumed by the renderer's presentation layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styling {
    pub primary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub border_radius: u8,
    pub spacing: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            primary_color: "#2563eb".into(),
            background_color: "#ffffff".into(),
            text_color: "#111827".into(),
            font_family: "Inter, sans-serif".into(),
            border_radius: 8,
            spacing: "normal".into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Messages and feature toggles.
///
/// Only `enable_progress_bar` changes engine behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub submit_button_text: String,
    pub success_message: String,
    pub error_message: String,
    pub redirect_url: Option<String>,
    pub enable_progress_bar: bool,
    pub allow_file_uploads: bool,
    pub enable_captcha: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            submit_button_text: "Submit".into(),
            success_message: "Thank you! Your response has been recorded.".into(),
            error_message: "Please correct the highlighted fields.".into(),
            redirect_url: None,
            enable_progress_bar: false,
            allow_file_uploads: false,
            enable_captcha: false,
            extra: BTreeMap::new(),
        }
    }
}

/// Form template aggregate root
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: TemplateCategory,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub styling: Styling,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FormTemplate {
    /// Create an empty draft template
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            category: TemplateCategory::default(),
            fields: vec![],
            styling: Styling::default(),
            settings: Settings::default(),
            status: TemplateStatus::Draft,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id.as_str() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id.as_str() == id)
    }

    /// Fields that collect a value, in render order
    pub fn input_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.is_input())
    }

    /// Check that identifiers are unique and `order` equals position + 1
    pub fn check_invariants(&self) -> Result<(), SaveRejection> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for (position, field) in self.fields.iter().enumerate() {
            if !seen.insert(field.id.as_str()) {
                return Err(SaveRejection::DuplicateFieldId(field.id.clone()));
            }
            if field.order as usize != position + 1 {
                return Err(SaveRejection::NonDenseOrder { position, order: field.order });
            }
        }
        Ok(())
    }

    /// Restamp `order` from array position. Returns true if anything changed.
    pub fn normalize_order(&mut self) -> bool {
        let mut changed = false;
        for (position, field) in self.fields.iter_mut().enumerate() {
            let order = position as u32 + 1;
            if field.order != order {
                field.order = order;
                changed = true;
            }
        }
        changed
    }

    /// Everything that blocks publishing, in field order
    pub fn publish_issues(&self) -> Vec<SaveRejection> {
        let mut issues = Vec::new();
        let cyclic = cyclic_field_ids(&self.fields);

        for field in &self.fields {
            if field.field_type.requires_options() && field.options.is_empty() {
                issues.push(SaveRejection::MissingOptions {
                    field_id: field.id.clone(),
                    label: field.label.clone(),
                });
            }

            if let Some(conditional) = &field.conditional {
                if conditional.field_id == field.id {
                    issues.push(SaveRejection::SelfCondition { field_id: field.id.clone() });
                } else if cyclic.contains(field.id.as_str()) {
                    issues.push(SaveRejection::CycleCondition { field_id: field.id.clone() });
                } else if self.field(conditional.field_id.as_str()).is_none() {
                    issues.push(SaveRejection::DanglingCondition {
                        field_id: field.id.clone(),
                        target: conditional.field_id.clone(),
                    });
                }
            }

            for rule in field.validation.iter().filter(|r| r.rule_type == RuleType::Regex) {
                let pattern = rule.pattern().unwrap_or_default();
                if compile_pattern(pattern).is_err() {
                    issues.push(SaveRejection::InvalidPattern {
                        field_id: field.id.clone(),
                        pattern: pattern.to_string(),
                    });
                }
            }
        }

        issues
    }

    /// Serialize to the JSON transport shape
    pub fn to_json(&self) -> Result<String, FormsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the JSON transport shape.
    ///
    /// Array order is authoritative: stale `order` stamps are rewritten.
    /// Duplicate field identifiers are rejected.
    pub fn from_json(json: &str) -> Result<Self, FormsError> {
        let mut template: FormTemplate = serde_json::from_str(json)?;
        if template.normalize_order() {
            tracing::warn!(template = %template.name, "field order stamps rewritten from array position");
        }
        template
            .check_invariants()
            .map_err(|e| FormsError::SchemaInvariantViolation(e.to_string()))?;
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ConditionOperator;
    use serde_json::json;

    fn sample() -> FormTemplate {
        let mut template = FormTemplate::new("Guest Feedback");
        template.fields = vec![
            FormField::new("stay", FieldType::Radio, "Did you enjoy your stay?").with_options(["Yes", "No"]),
            FormField::new("why", FieldType::Textarea, "What went wrong?")
                .with_conditional(ConditionalRule::equals("stay", "no")),
        ];
        template.normalize_order();
        template
    }

    #[test]
    fn test_invariants_hold_after_normalize() {
        assert!(sample().check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_id_detected() {
        let mut template = sample();
        template.fields[1].id = FieldId::from("stay");
        assert!(matches!(template.check_invariants(), Err(SaveRejection::DuplicateFieldId(_))));
    }

    #[test]
    fn test_gap_in_order_detected() {
        let mut template = sample();
        template.fields[1].order = 3;
        assert_eq!(
            template.check_invariants(),
            Err(SaveRejection::NonDenseOrder { position: 1, order: 3 })
        );
    }

    #[test]
    fn test_publish_issues() {
        let mut template = sample();
        template.fields[0].options.clear();
        template.fields.push(
            FormField::new("code", FieldType::Text, "Code")
                .with_rule(ValidationRule::regex("([a-z", "bad"))
                .with_conditional(ConditionalRule::new("ghost", ConditionOperator::Equals, "x")),
        );
        template.normalize_order();

        let issues = template.publish_issues();
        assert_eq!(issues.len(), 3);
        assert!(matches!(issues[0], SaveRejection::MissingOptions { .. }));
        assert!(matches!(issues[1], SaveRejection::DanglingCondition { .. }));
        assert!(matches!(issues[2], SaveRejection::InvalidPattern { .. }));
    }

    #[test]
    fn test_conditional_cycle_blocks_publish() {
        let mut template = sample();
        template.fields[0].conditional = Some(ConditionalRule::equals("why", "x"));
        let issues = template.publish_issues();
        assert_eq!(
            issues,
            vec![
                SaveRejection::CycleCondition { field_id: "stay".into() },
                SaveRejection::CycleCondition { field_id: "why".into() },
            ]
        );
    }

    #[test]
    fn test_pattern_over_size_limit_blocks_publish() {
        let mut template = sample();
        template.fields[1].validation.push(ValidationRule::regex(r"^\w{200}$", "too big"));
        assert!(matches!(
            template.publish_issues().as_slice(),
            [SaveRejection::InvalidPattern { pattern, .. }] if pattern == r"^\w{200}$"
        ));
    }

    #[test]
    fn test_from_json_rewrites_stale_order() {
        let json = json!({
            "name": "Maintenance Request",
            "fields": [
                { "id": "b", "type": "text", "label": "Room", "order": 7 },
                { "id": "a", "type": "textarea", "label": "Issue", "order": 2 }
            ]
        });
        let template = FormTemplate::from_json(&json.to_string()).unwrap();
        assert_eq!(template.fields[0].id.as_str(), "b");
        assert_eq!(template.fields[0].order, 1);
        assert_eq!(template.fields[1].order, 2);
    }

    #[test]
    fn test_unknown_settings_keys_survive() {
        let json = json!({ "name": "x", "settings": { "enable_progress_bar": true, "theme_variant": "dark" } });
        let template: FormTemplate = serde_json::from_value(json).unwrap();
        assert!(template.settings.enable_progress_bar);
        assert_eq!(template.settings.extra.get("theme_variant"), Some(&json!("dark")));
        let back = serde_json::to_value(&template).unwrap();
        assert_eq!(back["settings"]["theme_variant"], json!("dark"));
    }
}
