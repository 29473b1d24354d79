//! Form Engine
//!
//! Dynamic form definition and rendering engine for hotel operations:
//! guest feedback, check-in, incident and compliance forms are all
//! templates interpreted by this crate.
//!
//! ## Architecture
//!
//! - **Domain Layer**: the schema (templates, fields, rules), the condition
//!   evaluator, the validation engine and the field order manager. Pure.
//! - **Application Layer**: the builder session (authoring) and the runtime
//!   renderer (filling in), plus DTOs.
//! - **Ports Layer**: template store, submission sink, widget registry.
//! - **Infrastructure Layer**: in-memory adapters.
//!
//! ## Failure policy
//!
//! A malformed template degrades to "field always visible" or "rule always
//! passes", never to an error a guest could not get past.

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use domain::aggregates::{FormField, FormTemplate, Settings, Styling};
pub use domain::value_objects::{
    ConditionOperator, ConditionalRule, FieldId, FieldOption, FieldType, FieldWidth, RuleType,
    TemplateCategory, TemplateId, TemplateStatus, ValidationRule,
};
pub use domain::events::BuilderEvent;
pub use domain::services::{is_visible, validate, visible_field_ids, OrderManager, ValidationFailure, ValueMap};
pub use application::dto::{FieldPatch, Submission, TemplateFilter, TemplatePatch};
pub use application::{BuilderSession, FormRuntime, RenderedField, RuntimeState, SubmitOutcome};
pub use application::runtime::ErrorMap;
pub use ports::{FieldWidget, SubmissionSink, TemplateStore, WidgetContext, WidgetRegistry};
pub use infrastructure::{CollectingSink, InMemoryTemplateStore};
pub use config::EngineConfig;
pub use error::{FormsError, Result, SaveRejection};
