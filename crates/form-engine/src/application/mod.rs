//! Application layer
//!
//! Sessions that orchestrate the domain services: the builder session for
//! authoring and the runtime renderer for filling in a form.

pub mod dto;
pub mod builder;
pub mod runtime;

pub use builder::BuilderSession;
pub use runtime::{FormRuntime, RenderedField, RuntimeState, SubmitOutcome};
