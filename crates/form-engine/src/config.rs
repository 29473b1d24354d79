//! Engine configuration
//!
//! Defaults applied by the field order manager when authoring.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::value_objects::FieldWidth;
use crate::error::FormsError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width given to newly inserted fields
    pub default_width: FieldWidth,
    /// Option labels seeded into new select, radio and checkbox fields
    pub placeholder_options: Vec<String>,
    /// Appended to the label of a duplicated field
    pub copy_suffix: String,
    /// Maximum number of fields per template
    pub max_fields: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_width: FieldWidth::Full,
            placeholder_options: vec!["Option 1".into(), "Option 2".into()],
            copy_suffix: " (Copy)".into(),
            max_fields: None,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormsError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| FormsError::Store(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }
}
