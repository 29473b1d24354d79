//! Field type, width and option value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of field types understood by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Number,
    Date,
    Time,
    Datetime,
    Textarea,
    Select,
    Radio,
    Checkbox,
    File,
    Divider,
    Html,
}

impl FieldType {
    pub const ALL: [FieldType; 14] = [
        Self::Text,
        Self::Email,
        Self::Tel,
        Self::Number,
        Self::Date,
        Self::Time,
        Self::Datetime,
        Self::Textarea,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
        Self::File,
        Self::Divider,
        Self::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::File => "file",
            Self::Divider => "divider",
            Self::Html => "html",
        }
    }

    /// Whether the field collects a value. Divider and html are layout only.
    pub fn is_input(&self) -> bool {
        !matches!(self, Self::Divider | Self::Html)
    }

    /// Whether the field offers a list of options
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Whether publishing requires a non-empty options list.
    /// A checkbox without options is a single boolean toggle.
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// Label given to a freshly inserted field
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Text => "Text Field",
            Self::Email => "Email Address",
            Self::Tel => "Phone Number",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Datetime => "Date & Time",
            Self::Textarea => "Long Answer",
            Self::Select => "Dropdown",
            Self::Radio => "Multiple Choice",
            Self::Checkbox => "Checkboxes",
            Self::File => "File Upload",
            Self::Divider => "Section Divider",
            Self::Html => "Custom Content",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(UnknownFieldType(s))
    }
}

/// Field width as a percentage of the form row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FieldWidth {
    Quarter,
    Third,
    Half,
    TwoThirds,
    ThreeQuarters,
    #[default]
    Full,
}

impl FieldWidth {
    pub fn percent(&self) -> u8 {
        match self {
            Self::Quarter => 25,
            Self::Third => 33,
            Self::Half => 50,
            Self::TwoThirds => 66,
            Self::ThreeQuarters => 75,
            Self::Full => 100,
        }
    }
}

impl TryFrom<u8> for FieldWidth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            25 => Ok(Self::Quarter),
            33 => Ok(Self::Third),
            50 => Ok(Self::Half),
            66 => Ok(Self::TwoThirds),
            75 => Ok(Self::ThreeQuarters),
            100 => Ok(Self::Full),
            other => Err(format!("unsupported field width: {}%", other)),
        }
    }
}

impl From<FieldWidth> for u8 {
    fn from(width: FieldWidth) -> Self {
        width.percent()
    }
}

/// One value/label pair of a select, radio or checkbox field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    /// Option whose value is derived from its label
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let value = label
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        Self { value, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parsing() {
        assert_eq!("Select".parse::<FieldType>().unwrap(), FieldType::Select);
        assert_eq!("datetime".parse::<FieldType>().unwrap(), FieldType::Datetime);
        assert!("slider".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_layout_types_are_not_inputs() {
        assert!(!FieldType::Divider.is_input());
        assert!(!FieldType::Html.is_input());
        assert!(FieldType::File.is_input());
    }

    #[test]
    fn test_checkbox_does_not_require_options() {
        assert!(FieldType::Checkbox.is_choice());
        assert!(!FieldType::Checkbox.requires_options());
        assert!(FieldType::Radio.requires_options());
    }

    #[test]
    fn test_width_serializes_as_percent() {
        assert_eq!(serde_json::to_string(&FieldWidth::Half).unwrap(), "50");
        let width: FieldWidth = serde_json::from_str("33").unwrap();
        assert_eq!(width, FieldWidth::Third);
        assert!(serde_json::from_str::<FieldWidth>("40").is_err());
    }

    #[test]
    fn test_option_from_label() {
        let option = FieldOption::from_label("Late Check Out");
        assert_eq!(option.value, "late_check_out");
        assert_eq!(option.label, "Late Check Out");
    }
}
