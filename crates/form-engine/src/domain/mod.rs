//! Domain module
//!
//! The pure schema engine: data shapes, the condition evaluator, the
//! validation engine and the field order manager. No I/O.

pub mod aggregates;
pub mod value_objects;
pub mod events;
pub mod services;

pub use aggregates::*;
pub use value_objects::*;
pub use events::*;
