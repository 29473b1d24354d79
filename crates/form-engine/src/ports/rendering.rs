//! Widget registry port
//!
//! The engine knows the closed set of field types, never how they are
//! drawn. A host toolkit registers one widget per type; the runtime hands
//! each visible field to its widget in render order.

use serde_json::Value;
use std::collections::HashMap;

use crate::domain::aggregates::{FormField, Styling};
use crate::domain::value_objects::FieldType;

/// Everything a widget needs to draw one field
#[derive(Debug, Clone, Copy)]
pub struct WidgetContext<'a> {
    pub field: &'a FormField,
    pub value: Option<&'a Value>,
    pub error: Option<&'a str>,
    pub styling: &'a Styling,
}

/// Rendering capability for one field type
pub trait FieldWidget {
    type Output;

    fn render(&self, ctx: &WidgetContext<'_>) -> Self::Output;
}

/// Maps field types to widgets producing `O`
pub struct WidgetRegistry<O> {
    widgets: HashMap<FieldType, Box<dyn FieldWidget<Output = O>>>,
}

impl<O> Default for WidgetRegistry<O> {
    fn default() -> Self {
        Self { widgets: HashMap::new() }
    }
}

impl<O> WidgetRegistry<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<W>(&mut self, field_type: FieldType, widget: W) -> &mut Self
    where
        W: FieldWidget<Output = O> + 'static,
    {
        self.widgets.insert(field_type, Box::new(widget));
        self
    }

    pub fn contains(&self, field_type: FieldType) -> bool {
        self.widgets.contains_key(&field_type)
    }

    /// Field types with no registered widget
    pub fn missing_types(&self) -> Vec<FieldType> {
        FieldType::ALL.into_iter().filter(|t| !self.contains(*t)).collect()
    }

    /// Render with the widget registered for the field's type
    pub fn render(&self, ctx: &WidgetContext<'_>) -> Option<O> {
        self.widgets.get(&ctx.field.field_type).map(|widget| widget.render(ctx))
    }
}
