//! Field commands
//!
//! Positions on the command line are 1-based, matching the `order` column.

use anyhow::{anyhow, Result};
use form_engine::{BuilderSession, FieldId, FieldPatch, FieldType};

use super::{Context, FieldRow};
use crate::FieldCommands;

fn index(position: usize) -> Result<usize> {
    position.checked_sub(1).ok_or_else(|| anyhow!("positions start at 1"))
}

/// Apply one field edit to a session
pub fn apply(session: &mut BuilderSession, action: FieldCommands) -> Result<()> {
    match action {
        FieldCommands::Add { field_type, label, at, required, .. } => {
            let field_type: FieldType = field_type.parse()?;
            let id = match at {
                Some(position) => session.insert_field(field_type, index(position)?)?,
                None => session.add_field(field_type)?,
            };
            let patch = FieldPatch { label, required: required.then_some(true), ..FieldPatch::default() };
            session.update_field(&id, patch)?;
            Ok(())
        }
        FieldCommands::Move { from, to, .. } => {
            session.move_field(index(from)?, index(to)?)?;
            Ok(())
        }
        FieldCommands::Duplicate { field, .. } => {
            session.duplicate_field(&FieldId::from_string(field))?;
            Ok(())
        }
        FieldCommands::Remove { field, .. } => {
            let removed = session.delete_field(&FieldId::from_string(field))?;
            tracing::debug!(field = %removed.id, "removed");
            Ok(())
        }
    }
}

fn template_of(action: &FieldCommands) -> &str {
    match action {
        FieldCommands::Add { template, .. }
        | FieldCommands::Move { template, .. }
        | FieldCommands::Duplicate { template, .. }
        | FieldCommands::Remove { template, .. } => template,
    }
}

pub async fn handle(action: FieldCommands, ctx: &Context) -> Result<()> {
    let stored = ctx.stored(template_of(&action)).await?;
    let mut session = BuilderSession::from_template(stored, ctx.engine.clone())?;
    apply(&mut session, action)?;
    let saved = session.save(&ctx.store).await?;

    let rows: Vec<FieldRow> = saved.fields.iter().map(FieldRow::from).collect();
    ctx.format.print_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{ConditionalRule, EngineConfig, FormField, FormTemplate};

    fn session() -> BuilderSession {
        let mut template = FormTemplate::new("Maintenance Request");
        template.fields = vec![
            FormField::new("room", FieldType::Text, "Room"),
            FormField::new("issue", FieldType::Select, "Issue").with_options(["Plumbing", "Electrical"]),
            FormField::new("details", FieldType::Textarea, "Details")
                .with_conditional(ConditionalRule::equals("issue", "plumbing")),
        ];
        BuilderSession::from_template(template, EngineConfig::default()).unwrap()
    }

    fn ids(session: &BuilderSession) -> Vec<&str> {
        session.fields().iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_add_at_position_with_label() {
        let mut session = session();
        apply(
            &mut session,
            FieldCommands::Add {
                template: "tpl".into(),
                field_type: "tel".into(),
                label: Some("Callback number".into()),
                at: Some(1),
                required: true,
            },
        )
        .unwrap();

        let first = &session.fields()[0];
        assert_eq!(first.field_type, FieldType::Tel);
        assert_eq!(first.label, "Callback number");
        assert!(first.required);
        assert_eq!(session.fields()[1].order, 2);
    }

    #[test]
    fn test_move_is_one_based() {
        let mut session = session();
        apply(&mut session, FieldCommands::Move { template: "tpl".into(), from: 3, to: 1 }).unwrap();
        assert_eq!(ids(&session), vec!["details", "room", "issue"]);
        assert!(apply(&mut session, FieldCommands::Move { template: "tpl".into(), from: 0, to: 1 }).is_err());
    }

    #[test]
    fn test_remove_clears_dependent_condition() {
        let mut session = session();
        apply(&mut session, FieldCommands::Remove { template: "tpl".into(), field: "issue".into() }).unwrap();
        assert_eq!(ids(&session), vec!["room", "details"]);
        assert!(session.fields()[1].conditional.is_none());
    }
}
