//! Condition Evaluator
//!
//! Decides field visibility from conditional rules. Every ambiguity
//! (unknown operator, blank or unknown reference, dependency cycle) resolves
//! to visible so a broken template can never hide a required field.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::values::{self, ValueMap};
use crate::domain::aggregates::{FormField, FormTemplate};
use crate::domain::value_objects::{ConditionOperator, ConditionalRule, FieldId};

/// Visibility of a single field against the live values.
///
/// Fields without a conditional rule are always visible.
pub fn is_visible(field: &FormField, values: &ValueMap) -> bool {
    match &field.conditional {
        None => true,
        Some(rule) if rule.field_id.is_empty() => {
            warn!(field = %field.id, "conditional rule without a source field, showing field");
            true
        }
        Some(rule) => evaluate(rule, values.get(rule.field_id.as_str())),
    }
}

/// Apply a rule's operator to the referenced field's value
pub fn evaluate(rule: &ConditionalRule, actual: Option<&Value>) -> bool {
    match &rule.operator {
        ConditionOperator::Equals => equals(actual, &rule.value),
        ConditionOperator::NotEquals => !equals(actual, &rule.value),
        ConditionOperator::Contains => contains(actual, &rule.value),
        ConditionOperator::NotContains => !contains(actual, &rule.value),
        ConditionOperator::GreaterThan => {
            values::to_number(actual) > values::to_number(Some(&rule.value))
        }
        ConditionOperator::LessThan => {
            values::to_number(actual) < values::to_number(Some(&rule.value))
        }
        ConditionOperator::Unknown(name) => {
            warn!(source = %rule.field_id, operator = %name, "unknown condition operator, showing field");
            true
        }
    }
}

fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        Some(actual) => values::strict_eq(actual, expected),
        // absent compares as the empty string
        None => values::strict_eq(&Value::String(String::new()), expected),
    }
}

fn contains(actual: Option<&Value>, expected: &Value) -> bool {
    let haystack = values::to_text(actual);
    let needle = values::to_text(Some(expected));
    haystack.contains(needle.as_ref())
}

#[derive(Clone, Copy)]
enum Mark {
    Unvisited,
    Visiting,
    Done(bool),
}

struct Resolver<'a> {
    fields: &'a [FormField],
    values: &'a ValueMap,
    index: HashMap<&'a str, usize>,
    marks: Vec<Mark>,
}

impl<'a> Resolver<'a> {
    fn new(fields: &'a [FormField], values: &'a ValueMap) -> Self {
        let index: HashMap<&'a str, usize> =
            fields.iter().enumerate().map(|(i, f)| (f.id.as_str(), i)).collect();
        let mut marks = vec![Mark::Unvisited; fields.len()];
        for i in cycle_members(fields, &index) {
            warn!(field = %fields[i].id, "field is part of a conditional cycle, showing field");
            marks[i] = Mark::Done(true);
        }
        Self { fields, values, index, marks }
    }

    fn resolve(&mut self, i: usize) -> bool {
        match self.marks[i] {
            Mark::Done(visible) => return visible,
            // unreachable once cycle members are pre-marked
            Mark::Visiting => return true,
            Mark::Unvisited => {}
        }

        self.marks[i] = Mark::Visiting;
        let fields = self.fields;
        let field = &fields[i];

        let visible = match &field.conditional {
            None => true,
            Some(rule) => match self.index.get(rule.field_id.as_str()).copied() {
                None if !rule.field_id.is_empty() => {
                    warn!(field = %field.id, source = %rule.field_id, "conditional source not in template, showing field");
                    true
                }
                // a field controlled by a hidden field is hidden too
                Some(source) => is_visible(field, self.values) && self.resolve(source),
                None => is_visible(field, self.values),
            },
        };

        self.marks[i] = Mark::Done(visible);
        visible
    }
}

/// Positions of fields that sit on a conditional cycle, self references
/// included. Each field has at most one source, so following source links
/// from any field either ends or enters exactly one cycle.
fn cycle_members(fields: &[FormField], index: &HashMap<&str, usize>) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Walk {
        New,
        OnPath,
        Finished,
    }

    let source_of = |i: usize| {
        fields[i]
            .conditional
            .as_ref()
            .and_then(|rule| index.get(rule.field_id.as_str()).copied())
    };

    let mut state = vec![Walk::New; fields.len()];
    let mut members = Vec::new();
    for start in 0..fields.len() {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                Walk::Finished => break,
                Walk::OnPath => {
                    if let Some(at) = path.iter().position(|&p| p == i) {
                        members.extend_from_slice(&path[at..]);
                    }
                    break;
                }
                Walk::New => {
                    state[i] = Walk::OnPath;
                    path.push(i);
                    current = source_of(i);
                }
            }
        }
        for i in path {
            state[i] = Walk::Finished;
        }
    }
    members
}

/// Identifiers of fields whose conditional chain loops back on itself.
///
/// Such fields are always visible at runtime.
pub fn cyclic_field_ids(fields: &[FormField]) -> HashSet<FieldId> {
    let index: HashMap<&str, usize> = fields.iter().enumerate().map(|(i, f)| (f.id.as_str(), i)).collect();
    cycle_members(fields, &index).into_iter().map(|i| fields[i].id.clone()).collect()
}

/// Recompute the visible field set for a whole template.
///
/// Pure: call it after every value change. Visibility is transitive along
/// conditional links, so chains resolve the same whatever the order in
/// which values were entered.
pub fn visible_field_ids(template: &FormTemplate, values: &ValueMap) -> HashSet<FieldId> {
    let fields = template.fields.as_slice();
    let mut resolver = Resolver::new(fields, values);

    let visible: HashSet<FieldId> = (0..fields.len())
        .filter(|&i| resolver.resolve(i))
        .map(|i| fields[i].id.clone())
        .collect();

    debug!(visible = visible.len(), total = fields.len(), "visible field set recomputed");
    visible
}
