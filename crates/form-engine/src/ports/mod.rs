//! Ports module
//!
//! Interfaces to the collaborators outside the engine: template store,
//! submission sink and the per-type widget registry.

pub mod outbound;
pub mod rendering;

pub use outbound::{SubmissionSink, TemplateStore};
pub use rendering::{FieldWidget, WidgetContext, WidgetRegistry};
