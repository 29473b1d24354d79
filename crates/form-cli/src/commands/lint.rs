//! Lint command

use anyhow::{bail, Result};
use colored::Colorize;
use form_engine::{FormTemplate, SaveRejection};

use super::{Context, IssueRow};

fn field_of(issue: &SaveRejection) -> String {
    match issue {
        SaveRejection::MissingOptions { field_id, .. }
        | SaveRejection::DanglingCondition { field_id, .. }
        | SaveRejection::SelfCondition { field_id }
        | SaveRejection::CycleCondition { field_id }
        | SaveRejection::InvalidPattern { field_id, .. }
        | SaveRejection::DuplicateFieldId(field_id) => field_id.to_string(),
        SaveRejection::NonDenseOrder { position, .. } => format!("#{}", position + 1),
        SaveRejection::EmptyName | SaveRejection::NoFields => "-".to_string(),
    }
}

/// Every save and publish problem of a template
pub fn issues(template: &FormTemplate) -> Vec<SaveRejection> {
    let mut issues = Vec::new();
    if template.name.trim().is_empty() {
        issues.push(SaveRejection::EmptyName);
    }
    if template.fields.is_empty() {
        issues.push(SaveRejection::NoFields);
    }
    if let Err(e) = template.check_invariants() {
        issues.push(e);
    }
    issues.extend(template.publish_issues());
    issues
}

pub async fn handle(ctx: &Context, reference: &str) -> Result<()> {
    let template = ctx.resolve(reference).await?;
    let found = issues(&template);

    if found.is_empty() {
        println!("{} {} is ready to publish", "✓".green(), template.name.bold());
        return Ok(());
    }

    let rows: Vec<IssueRow> = found.iter().map(|issue| IssueRow::new(field_of(issue), issue)).collect();
    ctx.format.print_rows(&rows)?;
    bail!("{} problem(s) in {}", found.len(), template.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{ConditionalRule, FieldType, FormField};

    #[test]
    fn test_reports_every_problem() {
        let mut template = FormTemplate::new("  ");
        template.fields = vec![
            FormField::new("meal", FieldType::Select, "Meal"),
            FormField::new("notes", FieldType::Textarea, "Notes")
                .with_conditional(ConditionalRule::equals("gone", "x")),
        ];
        template.normalize_order();

        let found = issues(&template);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], SaveRejection::EmptyName);
        assert_eq!(field_of(&found[1]), "meal");
        assert_eq!(field_of(&found[2]), "notes");
    }

    #[test]
    fn test_reports_conditional_cycle_per_field() {
        let mut template = FormTemplate::new("Transfers");
        template.fields = vec![
            FormField::new("pickup", FieldType::Text, "Pickup").with_conditional(ConditionalRule::equals("flight", "x")),
            FormField::new("flight", FieldType::Text, "Flight").with_conditional(ConditionalRule::equals("pickup", "x")),
        ];
        template.normalize_order();

        let fields: Vec<String> = issues(&template).iter().map(field_of).collect();
        assert_eq!(fields, ["pickup", "flight"]);
    }

    #[test]
    fn test_clean_template() {
        let mut template = FormTemplate::new("Late Checkout");
        template.fields = vec![FormField::new("room", FieldType::Text, "Room number").required()];
        template.normalize_order();
        assert!(issues(&template).is_empty());
    }
}
