//! Domain services
//!
//! Stateless functions over the schema plus the field order manager.

pub mod values;
pub mod condition;
pub mod validation;
pub mod ordering;

pub use values::ValueMap;
pub use condition::{cyclic_field_ids, evaluate, is_visible, visible_field_ids};
pub use validation::{compile_pattern, validate, validate_fields, ValidationFailure};
pub use ordering::OrderManager;
