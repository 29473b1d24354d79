//! Validation and conditional rule value objects

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::FieldId;

/// Validation rule types.
///
/// A type written by a newer template author loads as `Unknown`, keeps its
/// name for saving back, and always passes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleType {
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    Email,
    Phone,
    Url,
    Regex,
    Unknown(String),
}

impl RuleType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Regex => "regex",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for RuleType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "min_length" => Self::MinLength,
            "max_length" => Self::MaxLength,
            "min_value" => Self::MinValue,
            "max_value" => Self::MaxValue,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "url" => Self::Url,
            "regex" => Self::Regex,
            _ => Self::Unknown(name),
        }
    }
}

impl From<RuleType> for String {
    fn from(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-field constraint with its failure message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub message: String,
}

impl ValidationRule {
    pub fn new(rule_type: RuleType, value: Option<Value>, message: impl Into<String>) -> Self {
        Self { rule_type, value, message: message.into() }
    }

    pub fn min_length(len: u64, message: impl Into<String>) -> Self {
        Self::new(RuleType::MinLength, Some(Value::from(len)), message)
    }

    pub fn max_length(len: u64, message: impl Into<String>) -> Self {
        Self::new(RuleType::MaxLength, Some(Value::from(len)), message)
    }

    pub fn min_value(min: f64, message: impl Into<String>) -> Self {
        Self::new(RuleType::MinValue, Some(Value::from(min)), message)
    }

    pub fn max_value(max: f64, message: impl Into<String>) -> Self {
        Self::new(RuleType::MaxValue, Some(Value::from(max)), message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleType::Email, None, message)
    }

    pub fn phone(message: impl Into<String>) -> Self {
        Self::new(RuleType::Phone, None, message)
    }

    pub fn url(message: impl Into<String>) -> Self {
        Self::new(RuleType::Url, None, message)
    }

    pub fn regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(RuleType::Regex, Some(Value::String(pattern.into())), message)
    }

    /// Numeric parameter. Numeric strings are accepted since authoring UIs
    /// often store the parameter as typed text.
    pub fn numeric_param(&self) -> Option<f64> {
        match self.value.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Pattern parameter of a regex rule
    pub fn pattern(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    /// Message shown on failure, falling back to a generic one
    pub fn failure_message(&self, label: &str) -> String {
        if !self.message.trim().is_empty() {
            return self.message.clone();
        }
        match (&self.rule_type, self.numeric_param()) {
            (RuleType::MinLength, Some(n)) => format!("{} must be at least {} characters", label, n),
            (RuleType::MaxLength, Some(n)) => format!("{} must be at most {} characters", label, n),
            (RuleType::MinValue, Some(n)) => format!("{} must be at least {}", label, n),
            (RuleType::MaxValue, Some(n)) => format!("{} must be at most {}", label, n),
            (RuleType::Email, _) => format!("{} must be a valid email address", label),
            (RuleType::Phone, _) => format!("{} must be a valid phone number", label),
            (RuleType::Url, _) => format!("{} must be a valid URL", label),
            _ => format!("{} is invalid", label),
        }
    }
}

/// Comparison operator of a conditional rule.
///
/// Unrecognized operators load as `Unknown`, keep their name, and evaluate
/// to visible.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    Unknown(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            _ => Self::Unknown(name),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(operator: ConditionOperator) -> Self {
        match operator {
            ConditionOperator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility predicate over another field's current value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub field_id: FieldId,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

impl ConditionalRule {
    pub fn new(field_id: impl Into<FieldId>, operator: ConditionOperator, value: impl Into<Value>) -> Self {
        Self { field_id: field_id.into(), operator, value: value.into() }
    }

    pub fn equals(field_id: impl Into<FieldId>, value: impl Into<Value>) -> Self {
        Self::new(field_id, ConditionOperator::Equals, value)
    }
}
