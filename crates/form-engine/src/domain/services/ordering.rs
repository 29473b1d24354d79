//! Field Order / Index Manager
//!
//! Owns every structural change to a template's field sequence. Each
//! operation checks its arguments before touching the sequence and restamps
//! `order` before returning, so callers never observe a gap.

use tracing::debug;

use crate::config::EngineConfig;
use crate::domain::aggregates::FormField;
use crate::domain::value_objects::{FieldId, FieldOption, FieldType, FieldWidth, ValidationRule};
use crate::error::{FormsError, Result};

/// Outcome of removing a field
#[derive(Clone, Debug)]
pub struct Removed {
    pub field: FormField,
    pub index: usize,
    /// Fields whose conditional rule referenced the removed field
    pub cleared_conditions: Vec<FieldId>,
}

pub struct OrderManager {
    config: EngineConfig,
}

impl Default for OrderManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl OrderManager {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// A fresh field of the given type with per-type defaults
    pub fn new_field(&self, field_type: FieldType) -> FormField {
        let mut field = FormField::new(FieldId::generate(), field_type, field_type.default_label())
            .with_width(self.config.default_width);

        field.placeholder = match field_type {
            FieldType::Text => "Enter text...".into(),
            FieldType::Email => "name@example.com".into(),
            FieldType::Tel => "+1 (555) 000-0000".into(),
            FieldType::Number => "0".into(),
            FieldType::Textarea => "Type your answer...".into(),
            FieldType::Select => "Choose an option".into(),
            _ => String::new(),
        };

        match field_type {
            t if t.is_choice() => {
                field.options = self
                    .config
                    .placeholder_options
                    .iter()
                    .map(|label| FieldOption::from_label(label.as_str()))
                    .collect();
            }
            FieldType::Email => {
                field.validation.push(ValidationRule::email("Please enter a valid email address"));
            }
            FieldType::Tel => {
                field.validation.push(ValidationRule::phone("Please enter a valid phone number"));
            }
            FieldType::Divider => {
                field.width = FieldWidth::Full;
            }
            FieldType::Html => {
                field.width = FieldWidth::Full;
                field.content = Some("<p>Custom content</p>".into());
            }
            _ => {}
        }

        field
    }

    /// Insert a new field of `field_type` at `at` (0..=len)
    pub fn insert(&self, fields: &mut Vec<FormField>, field_type: FieldType, at: usize) -> Result<FieldId> {
        let field = self.new_field(field_type);
        self.insert_field(fields, field, at)
    }

    /// Insert a prepared field at `at` (0..=len). Its identifier must be new.
    pub fn insert_field(&self, fields: &mut Vec<FormField>, field: FormField, at: usize) -> Result<FieldId> {
        if at > fields.len() {
            return Err(FormsError::IndexOutOfRange { index: at, len: fields.len() });
        }
        self.check_capacity(fields)?;
        if fields.iter().any(|f| f.id == field.id) {
            return Err(FormsError::SchemaInvariantViolation(format!(
                "field id {} already present",
                field.id
            )));
        }

        let id = field.id.clone();
        debug!(field = %id, field_type = %field.field_type, index = at, "inserting field");
        fields.insert(at, field);
        renumber(fields);
        Ok(id)
    }

    /// Move the field at `from` so that it ends up at `to`
    pub fn move_field(&self, fields: &mut Vec<FormField>, from: usize, to: usize) -> Result<()> {
        let len = fields.len();
        if from >= len {
            return Err(FormsError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(FormsError::IndexOutOfRange { index: to, len });
        }
        if from == to {
            return Ok(());
        }

        let field = fields.remove(from);
        debug!(field = %field.id, from, to, "moving field");
        fields.insert(to, field);
        renumber(fields);
        Ok(())
    }

    /// Deep-copy a field under a new identifier and append it
    pub fn duplicate(&self, fields: &mut Vec<FormField>, id: &FieldId) -> Result<FieldId> {
        let source = fields
            .iter()
            .find(|f| &f.id == id)
            .ok_or_else(|| FormsError::FieldNotFound(id.clone()))?;
        self.check_capacity(fields)?;

        let mut copy = source.clone();
        copy.id = FieldId::generate();
        copy.label = format!("{}{}", source.label, self.config.copy_suffix);

        let copy_id = copy.id.clone();
        debug!(source = %id, copy = %copy_id, "duplicating field");
        fields.push(copy);
        renumber(fields);
        Ok(copy_id)
    }

    /// Remove a field and clear conditional rules that pointed at it
    pub fn remove(&self, fields: &mut Vec<FormField>, id: &FieldId) -> Result<Removed> {
        let index = fields
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| FormsError::FieldNotFound(id.clone()))?;

        let field = fields.remove(index);
        let mut cleared_conditions = Vec::new();
        for other in fields.iter_mut() {
            if other.conditional.as_ref().is_some_and(|c| &c.field_id == id) {
                other.conditional = None;
                cleared_conditions.push(other.id.clone());
            }
        }
        renumber(fields);

        debug!(field = %id, index, cleared = cleared_conditions.len(), "removed field");
        Ok(Removed { field, index, cleared_conditions })
    }

    fn check_capacity(&self, fields: &[FormField]) -> Result<()> {
        match self.config.max_fields {
            Some(max) if fields.len() >= max => Err(FormsError::FieldLimitReached { max }),
            _ => Ok(()),
        }
    }
}

/// Restamp `order` as position + 1
pub fn renumber(fields: &mut [FormField]) {
    for (position, field) in fields.iter_mut().enumerate() {
        field.order = position as u32 + 1;
    }
    debug_assert!(is_dense(fields));
}

/// Whether `order` equals position + 1 for every field
pub fn is_dense(fields: &[FormField]) -> bool {
    fields
        .iter()
        .enumerate()
        .all(|(position, field)| field.order as usize == position + 1)
}
