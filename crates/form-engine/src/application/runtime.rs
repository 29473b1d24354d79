//! Runtime Renderer
//!
//! One fill-in session over an immutable template. Holds the live values,
//! the visible field set (recomputed after every change) and the error map.
//!
//! Values of fields that become hidden are kept, so showing the field again
//! restores what the user typed; they are left out of accepted submissions.

use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::dto::Submission;
use crate::domain::aggregates::{FormField, FormTemplate};
use crate::domain::services::{self, ValueMap};
use crate::domain::value_objects::FieldId;
use crate::error::{FormsError, Result};
use crate::ports::{SubmissionSink, WidgetContext, WidgetRegistry};

/// Field id to error message
pub type ErrorMap = HashMap<FieldId, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeState {
    Editing,
    Validating,
    Accepted,
    Rejected,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Values of visible input fields
    Accepted(ValueMap),
    /// One message per failing field
    Rejected(ErrorMap),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Output of one widget, in render order
#[derive(Clone, Debug)]
pub struct RenderedField<O> {
    pub field_id: FieldId,
    /// `None` when no widget is registered for the field's type
    pub output: Option<O>,
}

pub struct FormRuntime {
    template: Arc<FormTemplate>,
    values: ValueMap,
    visible: HashSet<FieldId>,
    errors: ErrorMap,
    state: RuntimeState,
}

impl FormRuntime {
    pub fn new(template: impl Into<Arc<FormTemplate>>) -> Self {
        Self::with_values(template, ValueMap::new())
    }

    /// Start with prefilled values, e.g. a guest's known details
    pub fn with_values(template: impl Into<Arc<FormTemplate>>, values: ValueMap) -> Self {
        let mut runtime = Self {
            template: template.into(),
            values,
            visible: HashSet::new(),
            errors: ErrorMap::new(),
            state: RuntimeState::Editing,
        };
        runtime.recompute_visibility();
        runtime
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn template(&self) -> &FormTemplate { &self.template }
    pub fn values(&self) -> &ValueMap { &self.values }
    pub fn value(&self, id: &str) -> Option<&Value> { self.values.get(id) }
    pub fn errors(&self) -> &ErrorMap { &self.errors }
    pub fn error(&self, id: &str) -> Option<&str> { self.errors.get(id).map(String::as_str) }
    pub fn state(&self) -> RuntimeState { self.state }
    pub fn visible_field_ids(&self) -> &HashSet<FieldId> { &self.visible }
    pub fn is_visible(&self, id: &str) -> bool { self.visible.contains(id) }

    /// Visible fields in render order
    pub fn visible_fields(&self) -> impl Iterator<Item = &FormField> {
        self.template.fields.iter().filter(move |f| self.visible.contains(f.id.as_str()))
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Record a value, clear that field's error and recompute visibility
    pub fn set_value(&mut self, id: &str, value: Value) -> Result<()> {
        let field_id = self.known_field(id)?;
        self.values.insert(field_id.clone(), value);
        self.errors.remove(id);
        self.state = RuntimeState::Editing;
        self.recompute_visibility();
        debug!(field = %field_id, visible = self.visible.len(), "value set");
        Ok(())
    }

    pub fn clear_value(&mut self, id: &str) -> Result<()> {
        self.known_field(id)?;
        self.values.remove(id);
        self.errors.remove(id);
        self.state = RuntimeState::Editing;
        self.recompute_visibility();
        Ok(())
    }

    /// Validate a single field now (e.g. on blur) and record the outcome
    pub fn validate_field(&mut self, id: &str) -> Result<Option<String>> {
        let field_id = self.known_field(id)?;
        let field = self
            .template
            .field(id)
            .ok_or_else(|| FormsError::FieldNotFound(field_id.clone()))?;

        if !self.visible.contains(id) {
            return Ok(None);
        }
        match services::validate(field, self.values.get(id)) {
            Ok(()) => {
                self.errors.remove(id);
                Ok(None)
            }
            Err(failure) => {
                self.errors.insert(field_id, failure.message.clone());
                Ok(Some(failure.message))
            }
        }
    }

    /// Drop all values and errors
    pub fn reset(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.state = RuntimeState::Editing;
        self.recompute_visibility();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate every visible field. Hidden fields are never checked, even
    /// when required.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.state = RuntimeState::Validating;

        let failures = services::validate_fields(self.visible_fields(), &self.values);
        if !failures.is_empty() {
            self.errors = failures.into_iter().map(|f| (f.field_id, f.message)).collect();
            self.state = RuntimeState::Rejected;
            debug!(errors = self.errors.len(), "submission rejected");
            return SubmitOutcome::Rejected(self.errors.clone());
        }

        self.errors.clear();
        self.state = RuntimeState::Accepted;
        SubmitOutcome::Accepted(self.accepted_values())
    }

    /// Submit and hand accepted values to the sink
    pub async fn submit_to(&mut self, sink: &dyn SubmissionSink) -> Result<SubmitOutcome> {
        let outcome = self.submit();
        if let SubmitOutcome::Accepted(values) = &outcome {
            let submission = Submission {
                template_id: self.template.id.clone(),
                values: values.clone(),
                submitted_at: Utc::now(),
            };
            sink.deliver(submission).await?;
            info!(template = %self.template.name, fields = values.len(), "submission delivered");
        }
        Ok(outcome)
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Percentage of visible input fields holding a value, when the
    /// template enables the progress bar
    pub fn progress(&self) -> Option<u8> {
        if !self.template.settings.enable_progress_bar {
            return None;
        }
        let (filled, total) = self
            .visible_fields()
            .filter(|f| f.is_input())
            .fold((0usize, 0usize), |(filled, total), f| {
                let has_value = !services::values::is_empty(self.values.get(f.id.as_str()));
                (filled + usize::from(has_value), total + 1)
            });
        if total == 0 {
            return Some(100);
        }
        Some((filled * 100 / total) as u8)
    }

    /// Render visible fields in order through the widget registry
    pub fn render_with<O>(&self, registry: &WidgetRegistry<O>) -> Vec<RenderedField<O>> {
        self.visible_fields()
            .map(|field| {
                let ctx = WidgetContext {
                    field,
                    value: self.values.get(field.id.as_str()),
                    error: self.error(field.id.as_str()),
                    styling: &self.template.styling,
                };
                let output = registry.render(&ctx);
                if output.is_none() {
                    debug!(field = %field.id, field_type = %field.field_type, "no widget registered");
                }
                RenderedField { field_id: field.id.clone(), output }
            })
            .collect()
    }

    // =========================================================================
    // Private
    // =========================================================================

    fn known_field(&self, id: &str) -> Result<FieldId> {
        self.template
            .field(id)
            .map(|f| f.id.clone())
            .ok_or_else(|| FormsError::FieldNotFound(FieldId::from(id)))
    }

    fn accepted_values(&self) -> ValueMap {
        self.visible_fields()
            .filter(|f| f.is_input())
            .filter_map(|f| self.values.get(f.id.as_str()).map(|v| (f.id.clone(), v.clone())))
            .collect()
    }

    fn recompute_visibility(&mut self) {
        self.visible = services::visible_field_ids(&self.template, &self.values);
        // errors of hidden fields can no longer be acted on
        let visible = &self.visible;
        self.errors.retain(|id, _| visible.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ConditionalRule, FieldType, ValidationRule};
    use serde_json::json;

    fn stay_survey() -> FormTemplate {
        let mut template = FormTemplate::new("Stay Survey");
        template.fields = vec![
            FormField::new("enjoyed", FieldType::Select, "Enjoyed your stay?").with_options(["Yes", "No"]).required(),
            FormField::new("highlight", FieldType::Text, "Best part").with_conditional(ConditionalRule::equals("enjoyed", "yes")),
            FormField::new("complaint", FieldType::Textarea, "What went wrong?")
                .required()
                .with_conditional(ConditionalRule::equals("enjoyed", "no")),
            FormField::new("rule", FieldType::Divider, ""),
            FormField::new("email", FieldType::Email, "Email").with_rule(ValidationRule::email("Invalid email")),
        ];
        template.normalize_order();
        template
    }

    #[test]
    fn test_initial_visibility() {
        let runtime = FormRuntime::new(stay_survey());
        assert!(runtime.is_visible("enjoyed"));
        assert!(!runtime.is_visible("highlight"));
        assert!(!runtime.is_visible("complaint"));
        assert_eq!(runtime.state(), RuntimeState::Editing);
    }

    #[test]
    fn test_sticky_value_survives_hide_and_show() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("yes")).unwrap();
        runtime.set_value("highlight", json!("The rooftop bar")).unwrap();

        runtime.set_value("enjoyed", json!("no")).unwrap();
        assert!(!runtime.is_visible("highlight"));
        assert_eq!(runtime.value("highlight"), Some(&json!("The rooftop bar")));

        runtime.set_value("enjoyed", json!("yes")).unwrap();
        assert!(runtime.is_visible("highlight"));
        assert_eq!(runtime.value("highlight"), Some(&json!("The rooftop bar")));
    }

    #[test]
    fn test_hidden_required_field_does_not_block_submit() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("yes")).unwrap();
        assert!(runtime.submit().is_accepted());
        assert_eq!(runtime.state(), RuntimeState::Accepted);
    }

    #[test]
    fn test_rejected_submit_populates_errors() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("no")).unwrap();
        runtime.set_value("email", json!("not-an-email")).unwrap();

        let SubmitOutcome::Rejected(errors) = runtime.submit() else {
            panic!("expected rejection");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("complaint").map(String::as_str), Some("What went wrong? is required"));
        assert_eq!(errors.get("email").map(String::as_str), Some("Invalid email"));
        assert_eq!(runtime.state(), RuntimeState::Rejected);

        runtime.set_value("email", json!("guest@example.com")).unwrap();
        assert!(runtime.error("email").is_none());
        assert!(runtime.error("complaint").is_some());
        assert_eq!(runtime.state(), RuntimeState::Editing);
    }

    #[test]
    fn test_accepted_values_exclude_hidden_fields() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("no")).unwrap();
        runtime.set_value("complaint", json!("Noisy corridor")).unwrap();
        runtime.set_value("enjoyed", json!("yes")).unwrap();
        runtime.set_value("highlight", json!("Breakfast")).unwrap();

        let SubmitOutcome::Accepted(values) = runtime.submit() else {
            panic!("expected acceptance");
        };
        assert!(values.contains_key("highlight"));
        assert!(!values.contains_key("complaint"));
        // sticky value is still held by the session
        assert!(runtime.value("complaint").is_some());
    }

    #[test]
    fn test_hiding_a_field_drops_its_error() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("no")).unwrap();
        runtime.submit();
        assert!(runtime.error("complaint").is_some());

        runtime.set_value("enjoyed", json!("yes")).unwrap();
        assert!(runtime.error("complaint").is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut runtime = FormRuntime::new(stay_survey());
        assert!(matches!(runtime.set_value("ghost", json!(1)), Err(FormsError::FieldNotFound(_))));
    }

    #[test]
    fn test_validate_field_on_blur() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("email", json!("nope")).unwrap();
        assert_eq!(runtime.validate_field("email").unwrap().as_deref(), Some("Invalid email"));
        assert_eq!(runtime.error("email"), Some("Invalid email"));
        // hidden fields are not validated
        assert_eq!(runtime.validate_field("complaint").unwrap(), None);
    }

    #[test]
    fn test_clear_value_hides_dependents() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("no")).unwrap();
        runtime.submit();
        assert!(runtime.is_visible("complaint"));

        runtime.clear_value("enjoyed").unwrap();
        assert_eq!(runtime.value("enjoyed"), None);
        assert!(!runtime.is_visible("complaint"));
        assert!(runtime.error("complaint").is_none());
        assert_eq!(runtime.state(), RuntimeState::Editing);
        assert!(matches!(runtime.clear_value("ghost"), Err(FormsError::FieldNotFound(_))));
    }

    #[test]
    fn test_reset_drops_values_and_errors() {
        let mut runtime = FormRuntime::new(stay_survey());
        runtime.set_value("enjoyed", json!("yes")).unwrap();
        runtime.set_value("email", json!("bad")).unwrap();
        runtime.submit();
        assert_eq!(runtime.state(), RuntimeState::Rejected);

        runtime.reset();
        assert!(runtime.values().is_empty());
        assert!(runtime.errors().is_empty());
        assert!(!runtime.is_visible("highlight"));
        assert_eq!(runtime.state(), RuntimeState::Editing);
    }

    #[test]
    fn test_conditional_cycle_fields_are_validated() {
        let mut template = FormTemplate::new("Cycle");
        template.fields = vec![
            FormField::new("x", FieldType::Text, "X").required().with_conditional(ConditionalRule::equals("y", "1")),
            FormField::new("y", FieldType::Text, "Y").required().with_conditional(ConditionalRule::equals("x", "1")),
        ];
        template.normalize_order();

        let mut runtime = FormRuntime::new(template);
        let SubmitOutcome::Rejected(errors) = runtime.submit() else {
            panic!("expected rejection");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_progress_only_when_enabled() {
        let mut template = stay_survey();
        assert_eq!(FormRuntime::new(template.clone()).progress(), None);

        template.settings.enable_progress_bar = true;
        let mut runtime = FormRuntime::new(template);
        // enjoyed + email visible, divider not counted
        assert_eq!(runtime.progress(), Some(0));
        runtime.set_value("enjoyed", json!("no")).unwrap();
        // enjoyed, complaint, email
        assert_eq!(runtime.progress(), Some(33));
    }
}
