//! Aggregates module

pub mod template;

pub use template::{FormField, FormTemplate, Settings, Styling};
