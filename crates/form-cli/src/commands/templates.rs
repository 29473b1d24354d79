//! Template commands

use anyhow::{anyhow, Result};
use colored::Colorize;
use form_engine::{
    BuilderSession, FieldPatch, FieldType, FormTemplate, TemplateCategory, TemplateFilter, TemplateId,
    TemplatePatch, TemplateStatus, TemplateStore,
};
use std::path::PathBuf;

use super::{Context, FieldRow, TemplateRow};
use crate::output::OutputFormat;
use crate::TemplateCommands;

/// Parse `type` or `type:label`
pub fn parse_field_spec(spec: &str) -> Result<(FieldType, Option<String>)> {
    let (kind, label) = match spec.split_once(':') {
        Some((kind, label)) => (kind, Some(label.trim().to_string()).filter(|l| !l.is_empty())),
        None => (spec, None),
    };
    Ok((kind.parse()?, label))
}

/// Build a draft from the command line, ready for saving
pub fn draft(ctx: &Context, name: &str, category: TemplateCategory, description: &str, fields: &[String]) -> Result<BuilderSession> {
    let mut session = BuilderSession::with_config(name, ctx.engine.clone());
    session.set_category(category);
    session.set_description(description);
    for spec in fields {
        let (field_type, label) = parse_field_spec(spec)?;
        let id = session.add_field(field_type)?;
        if let Some(label) = label {
            session.update_field(&id, FieldPatch::label(label))?;
        }
    }
    Ok(session)
}

fn show(template: &FormTemplate, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{} {}", template.name.bold(), format!("({}, {})", template.category, template.status).dimmed());
            if !template.description.is_empty() {
                println!("{}", template.description);
            }
            let rows: Vec<FieldRow> = template.fields.iter().map(FieldRow::from).collect();
            format.print_rows(&rows)
        }
        _ => format.print(template),
    }
}

pub async fn handle(action: TemplateCommands, ctx: &Context) -> Result<()> {
    match action {
        TemplateCommands::List { category, status, search } => {
            let filter = TemplateFilter {
                category: category.as_deref().map(str::parse::<TemplateCategory>).transpose().map_err(anyhow::Error::msg)?,
                status: status.as_deref().map(str::parse::<TemplateStatus>).transpose().map_err(anyhow::Error::msg)?,
                search,
            };
            let templates = ctx.store.list(&filter).await?;
            let rows: Vec<TemplateRow> = templates.iter().map(TemplateRow::from).collect();
            ctx.format.print_rows(&rows)?;
        }
        TemplateCommands::Show { id } => {
            show(&ctx.stored(&id).await?, ctx.format)?;
        }
        TemplateCommands::Create { name, category, description, fields } => {
            let category: TemplateCategory = category.parse().map_err(anyhow::Error::msg)?;
            let mut session = draft(ctx, &name, category, &description, &fields)?;
            let saved = session.save(&ctx.store).await?;
            println!("Created template: {}", display_id(&saved));
        }
        TemplateCommands::Import { file } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let mut template = FormTemplate::from_json(&content)?;
            template.id = None;
            let saved = ctx.store.create(template).await?;
            println!("Imported {} as {}", file.display(), display_id(&saved));
        }
        TemplateCommands::Export { id, out } => {
            let json = ctx.stored(&id).await?.to_json()?;
            export(json, out).await?;
        }
        TemplateCommands::Duplicate { id, name } => {
            let original = ctx.stored(&id).await?;
            let name = name.unwrap_or_else(|| format!("{}{}", original.name, ctx.engine.copy_suffix));
            let copy = ctx.store.duplicate(&TemplateId::from_string(id), &name).await?;
            println!("Created template: {}", display_id(&copy));
        }
        TemplateCommands::Delete { id } => {
            ctx.store.delete(&TemplateId::from_string(&id)).await?;
            println!("Deleted template: {}", id);
        }
        TemplateCommands::Publish { id } => {
            let mut session = BuilderSession::from_template(ctx.stored(&id).await?, ctx.engine.clone())?;
            session.publish()?;
            session.save(&ctx.store).await?;
            println!("{} {} is active", "✓".green(), session.template().name);
        }
        TemplateCommands::Archive { id } => {
            let archived = ctx
                .store
                .update(&TemplateId::from_string(id), TemplatePatch::status(TemplateStatus::Archived))
                .await?;
            println!("Archived template: {}", archived.name);
        }
    }
    Ok(())
}

fn display_id(template: &FormTemplate) -> String {
    template.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}

async fn export(json: String, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => tokio::fs::write(&path, json)
            .await
            .map_err(|e| anyhow!("writing {}: {}", path.display(), e)),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
