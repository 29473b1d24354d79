//! Plain-text widgets for `formctl preview`

use form_engine::{FieldType, FieldWidget, FormField, WidgetContext, WidgetRegistry};
use serde_json::Value;
use std::fmt::Write;

fn heading(field: &FormField) -> String {
    let mut line = field.display_label().to_string();
    if field.required {
        line.push_str(" *");
    }
    line
}

fn footer(out: &mut String, ctx: &WidgetContext<'_>) {
    if !ctx.field.help_text.is_empty() {
        let _ = write!(out, "\n    ({})", ctx.field.help_text);
    }
    if let Some(error) = ctx.error {
        let _ = write!(out, "\n    ! {}", error);
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Single-value inputs: text, email, number, dates, textarea, file
pub struct InputWidget;

impl FieldWidget for InputWidget {
    type Output = String;

    fn render(&self, ctx: &WidgetContext<'_>) -> String {
        let shown = match ctx.value {
            Some(value) if !value.is_null() => scalar(value),
            _ => ctx.field.placeholder.clone(),
        };
        let mut out = format!("{}\n    [{}]", heading(ctx.field), shown);
        footer(&mut out, ctx);
        out
    }
}

/// Select, radio and checkbox groups
pub struct ChoiceWidget;

impl ChoiceWidget {
    fn is_chosen(value: Option<&Value>, option: &str) -> bool {
        match value {
            Some(Value::String(s)) => s == option,
            Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(option)),
            _ => false,
        }
    }
}

impl FieldWidget for ChoiceWidget {
    type Output = String;

    fn render(&self, ctx: &WidgetContext<'_>) -> String {
        let mut out = heading(ctx.field);
        if ctx.field.options.is_empty() {
            // single toggle checkbox
            let checked = matches!(ctx.value, Some(Value::Bool(true)));
            let _ = write!(out, "\n    [{}]", if checked { "x" } else { " " });
        }
        for option in &ctx.field.options {
            let mark = if Self::is_chosen(ctx.value, &option.value) { "x" } else { " " };
            let _ = write!(out, "\n    ({}) {}", mark, option.label);
        }
        footer(&mut out, ctx);
        out
    }
}

pub struct DividerWidget;

impl FieldWidget for DividerWidget {
    type Output = String;

    fn render(&self, ctx: &WidgetContext<'_>) -> String {
        format!("── {} ──", ctx.field.display_label())
    }
}

pub struct HtmlWidget;

impl FieldWidget for HtmlWidget {
    type Output = String;

    fn render(&self, ctx: &WidgetContext<'_>) -> String {
        ctx.field.content.clone().unwrap_or_default()
    }
}

/// Registry covering every field type
pub fn text_registry() -> WidgetRegistry<String> {
    let mut registry = WidgetRegistry::new();
    for field_type in FieldType::ALL {
        match field_type {
            FieldType::Select | FieldType::Radio | FieldType::Checkbox => {
                registry.register(field_type, ChoiceWidget);
            }
            FieldType::Divider => {
                registry.register(field_type, DividerWidget);
            }
            FieldType::Html => {
                registry.register(field_type, HtmlWidget);
            }
            _ => {
                registry.register(field_type, InputWidget);
            }
        }
    }
    registry
}
