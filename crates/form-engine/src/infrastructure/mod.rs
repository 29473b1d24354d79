//! Infrastructure layer
//!
//! In-memory adapters for the outbound ports.

pub mod persistence;

pub use persistence::{CollectingSink, InMemoryTemplateStore};
