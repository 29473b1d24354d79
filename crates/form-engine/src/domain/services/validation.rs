//! Validation Engine
//!
//! Checks one field's value against its required flag and rule list.
//! Failures are returned as data. The first failing rule wins, so a field
//! surfaces at most one message at a time.

use dashmap::DashMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::values::{self, ValueMap};
use crate::domain::aggregates::FormField;
use crate::domain::value_objects::{FieldId, RuleType, ValidationRule};

/// Upper bound on compiled size of author-supplied patterns
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A user-facing validation failure for one field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field_id: FieldId,
    pub message: String,
    /// Rule that failed; `None` for the required check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleType>,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field_id, self.message)
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]*\d[\d\s\-()]*$").expect("static phone pattern"))
}

/// Validate a field's current value.
///
/// 1. Required and empty fails with "`<label>` is required".
/// 2. Optional and empty passes without looking at the rules.
/// 3. Otherwise rules run in declaration order; the first failure is returned.
///
/// Layout fields (divider, html) always pass.
pub fn validate(field: &FormField, value: Option<&Value>) -> Result<(), ValidationFailure> {
    if !field.is_input() {
        return Ok(());
    }

    if values::is_empty(value) {
        if field.required {
            return Err(ValidationFailure {
                field_id: field.id.clone(),
                message: format!("{} is required", field.display_label()),
                rule: None,
            });
        }
        return Ok(());
    }

    match field.validation.iter().find(|rule| !passes(rule, value, &field.id)) {
        Some(rule) => Err(ValidationFailure {
            field_id: field.id.clone(),
            message: rule.failure_message(field.display_label()),
            rule: Some(rule.rule_type.clone()),
        }),
        None => Ok(()),
    }
}

/// Validate a set of fields against the live values, in the order given
pub fn validate_fields<'a, I>(fields: I, values: &ValueMap) -> Vec<ValidationFailure>
where
    I: IntoIterator<Item = &'a FormField>,
{
    fields
        .into_iter()
        .filter_map(|field| validate(field, values.get(field.id.as_str())).err())
        .collect()
}

fn passes(rule: &ValidationRule, value: Option<&Value>, field_id: &FieldId) -> bool {
    match &rule.rule_type {
        RuleType::MinLength => with_number(rule, field_id, |n| values::length(value) as f64 >= n),
        RuleType::MaxLength => with_number(rule, field_id, |n| values::length(value) as f64 <= n),
        RuleType::MinValue => with_number(rule, field_id, |n| values::to_number(value) >= n),
        RuleType::MaxValue => with_number(rule, field_id, |n| values::to_number(value) <= n),
        RuleType::Email => email_pattern().is_match(&values::to_text(value)),
        RuleType::Phone => phone_pattern().is_match(values::to_text(value).trim()),
        RuleType::Url => {
            let text = values::to_text(value);
            text.starts_with("http://") || text.starts_with("https://")
        }
        RuleType::Regex => match compile_pattern(rule.pattern().unwrap_or_default()) {
            Ok(pattern) => pattern.is_match(&values::to_text(value)),
            Err(e) => {
                warn!(field = %field_id, error = %e, "invalid regex rule, skipping");
                true
            }
        },
        RuleType::Unknown(name) => {
            debug!(field = %field_id, rule = %name, "unknown rule type, skipping");
            true
        }
    }
}

/// Run a numeric check, passing when the rule parameter is not a number
fn with_number(rule: &ValidationRule, field_id: &FieldId, check: impl FnOnce(f64) -> bool) -> bool {
    match rule.numeric_param() {
        Some(n) => check(n),
        None => {
            warn!(field = %field_id, rule = %rule.rule_type, "non-numeric rule parameter, skipping");
            true
        }
    }
}

fn pattern_cache() -> &'static DashMap<String, Regex> {
    static CACHE: OnceLock<DashMap<String, Regex>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// Compile an author-supplied pattern under the size limit.
///
/// Publish checks and runtime validation both go through here, so a pattern
/// that publishes is a pattern that runs. Compiled patterns are cached;
/// failures are not.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(hit) = pattern_cache().get(pattern) {
        return Ok(hit.clone());
    }
    let compiled = RegexBuilder::new(pattern).size_limit(PATTERN_SIZE_LIMIT).build()?;
    pattern_cache().insert(pattern.to_string(), compiled.clone());
    Ok(compiled)
}
