//! Error types for the form engine
//!
//! Validation failures are not errors: they are returned as data by the
//! validation engine and the runtime. The variants here cover misuse of the
//! builder API, rejected saves and store failures.

use thiserror::Error;

use crate::domain::value_objects::FieldId;

/// Form engine error type
#[derive(Error, Debug)]
pub enum FormsError {
    /// No field with this identifier in the template
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    /// Index outside the field sequence
    #[error("index {index} out of range for {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    /// Duplicate identifiers or a non-dense order stamp
    #[error("schema invariant violated: {0}")]
    SchemaInvariantViolation(String),

    /// Pre-save or pre-publish checks failed
    #[error("save rejected: {0}")]
    SaveRejected(#[from] SaveRejection),

    /// The configured field cap was hit
    #[error("field limit reached ({max})")]
    FieldLimitReached { max: usize },

    /// Template store lookup miss
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Template store failure
    #[error("store error: {0}")]
    Store(String),

    /// JSON transport failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reason a template could not be saved or published
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveRejection {
    #[error("template name is required")]
    EmptyName,

    #[error("template must contain at least one field")]
    NoFields,

    #[error("field \"{label}\" ({field_id}) needs at least one option")]
    MissingOptions { field_id: FieldId, label: String },

    #[error("field {field_id} is conditional on unknown field {target}")]
    DanglingCondition { field_id: FieldId, target: FieldId },

    #[error("field {field_id} is conditional on itself")]
    SelfCondition { field_id: FieldId },

    #[error("field {field_id} is part of a conditional cycle")]
    CycleCondition { field_id: FieldId },

    #[error("field {field_id} has an invalid pattern: {pattern}")]
    InvalidPattern { field_id: FieldId, pattern: String },

    #[error("duplicate field id: {0}")]
    DuplicateFieldId(FieldId),

    #[error("field at position {position} has order {order}")]
    NonDenseOrder { position: usize, order: u32 },
}

/// Result type for the form engine
pub type Result<T> = std::result::Result<T, FormsError>;
