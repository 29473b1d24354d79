//! Builder events
//!
//! Raised by the builder session so an authoring UI (or an audit trail)
//! can follow what changed without diffing templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FieldId, FieldType, TemplateId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuilderEvent {
    FieldAdded {
        field_id: FieldId,
        field_type: FieldType,
        index: usize,
    },

    FieldUpdated {
        field_id: FieldId,
    },

    FieldRemoved {
        field_id: FieldId,
        /// Fields whose conditional rule pointed at the removed field
        cleared_conditions: Vec<FieldId>,
    },

    FieldMoved {
        field_id: FieldId,
        from: usize,
        to: usize,
    },

    FieldDuplicated {
        source_id: FieldId,
        copy_id: FieldId,
    },

    Saved {
        template_id: TemplateId,
        saved_at: DateTime<Utc>,
    },

    Published {
        template_id: Option<TemplateId>,
        published_at: DateTime<Utc>,
    },
}

impl BuilderEvent {
    /// Field the event is about, if any
    pub fn field_id(&self) -> Option<&FieldId> {
        match self {
            Self::FieldAdded { field_id, .. }
            | Self::FieldUpdated { field_id }
            | Self::FieldRemoved { field_id, .. }
            | Self::FieldMoved { field_id, .. } => Some(field_id),
            Self::FieldDuplicated { copy_id, .. } => Some(copy_id),
            Self::Saved { .. } | Self::Published { .. } => None,
        }
    }
}
