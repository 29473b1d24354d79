//! Preview command

use anyhow::Result;
use colored::Colorize;
use form_engine::{FormRuntime, FormTemplate, ValueMap};
use std::path::Path;

use super::{read_values, Context};
use crate::widgets::text_registry;

/// Render the visible fields of `template` under `values` as text
pub fn render(template: FormTemplate, values: ValueMap) -> String {
    let runtime = FormRuntime::with_values(template, values);
    let registry = text_registry();

    let mut out = String::new();
    out.push_str(&runtime.template().name);
    if let Some(progress) = runtime.progress() {
        out.push_str(&format!("  [{}% complete]", progress));
    }
    out.push('\n');
    if !runtime.template().description.is_empty() {
        out.push_str(&runtime.template().description);
        out.push('\n');
    }
    for rendered in runtime.render_with(&registry) {
        out.push('\n');
        match rendered.output {
            Some(text) => out.push_str(&text),
            None => out.push_str(&format!("<{}>", rendered.field_id)),
        }
        out.push('\n');
    }
    out.push_str(&format!("\n[ {} ]\n", runtime.template().settings.submit_button_text));
    out
}

pub async fn handle(ctx: &Context, reference: &str, values: Option<&Path>) -> Result<()> {
    let template = ctx.resolve(reference).await?;
    let values = match values {
        Some(path) => read_values(path).await?,
        None => ValueMap::new(),
    };
    let total = template.fields.len();
    print!("{}", render(template, values));
    eprintln!("{}", format!("{} field(s) in template, hidden fields are not shown", total).dimmed());
    Ok(())
}
