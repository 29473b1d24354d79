//! Submit command

use anyhow::{bail, Result};
use colored::Colorize;
use form_engine::{ErrorMap, FormRuntime, FormTemplate, SubmissionSink, SubmitOutcome, ValueMap};
use std::path::{Path, PathBuf};

use super::{read_values, Context, IssueRow};
use crate::sink::JsonSink;

/// Fill a runtime from `values`, skipping ids the template does not know
pub fn fill(template: FormTemplate, values: ValueMap) -> FormRuntime {
    let mut runtime = FormRuntime::new(template);
    for (id, value) in values {
        if let Err(e) = runtime.set_value(id.as_str(), value) {
            tracing::warn!(field = %id, error = %e, "ignoring value");
        }
    }
    runtime
}

/// Errors in field order
pub fn error_rows(template: &FormTemplate, errors: &ErrorMap) -> Vec<IssueRow> {
    template
        .fields
        .iter()
        .filter_map(|field| errors.get(field.id.as_str()).map(|message| IssueRow::new(field.id.as_str(), message)))
        .collect()
}

pub async fn run(template: FormTemplate, values: ValueMap, sink: &dyn SubmissionSink) -> Result<SubmitOutcome> {
    let mut runtime = fill(template, values);
    Ok(runtime.submit_to(sink).await?)
}

pub async fn handle(ctx: &Context, reference: &str, values: &Path, out: Option<PathBuf>) -> Result<()> {
    let template = ctx.resolve(reference).await?;
    let values = read_values(values).await?;
    let sink = JsonSink::new(out.clone());

    match run(template.clone(), values, &sink).await? {
        SubmitOutcome::Accepted(accepted) => {
            if let Some(path) = out {
                eprintln!(
                    "{} {} value(s) written to {}",
                    "✓".green(),
                    accepted.len(),
                    path.display()
                );
            }
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            eprintln!("{}", template.settings.error_message.yellow());
            ctx.format.print_rows(&error_rows(&template, &errors))?;
            bail!("submission rejected with {} error(s)", errors.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{CollectingSink, ConditionalRule, FieldType, FormField, ValidationRule};
    use serde_json::json;

    fn checkin() -> FormTemplate {
        let mut template = FormTemplate::new("Express Check-in");
        template.fields = vec![
            FormField::new("email", FieldType::Email, "Email").required().with_rule(ValidationRule::email("")),
            FormField::new("parking", FieldType::Radio, "Need parking?").with_options(["Yes", "No"]),
            FormField::new("plate", FieldType::Text, "Licence plate")
                .required()
                .with_conditional(ConditionalRule::equals("parking", "yes")),
        ];
        template.normalize_order();
        template
    }

    #[tokio::test]
    async fn test_accepted_submission_reaches_sink() {
        let sink = CollectingSink::new();
        let mut values = ValueMap::new();
        values.insert("email".into(), json!("guest@example.com"));
        values.insert("parking".into(), json!("no"));
        values.insert("unknown".into(), json!("ignored"));

        let outcome = run(checkin(), values, &sink).await.unwrap();
        assert!(outcome.is_accepted());
        let delivered = sink.submissions();
        assert_eq!(delivered.len(), 1);
        assert!(!delivered[0].values.contains_key("unknown"));
    }

    #[tokio::test]
    async fn test_rejected_submission_lists_errors_in_order() {
        let sink = CollectingSink::new();
        let mut values = ValueMap::new();
        values.insert("email".into(), json!("not-an-email"));
        values.insert("parking".into(), json!("yes"));

        let template = checkin();
        let SubmitOutcome::Rejected(errors) = run(template.clone(), values, &sink).await.unwrap() else {
            panic!("expected rejection");
        };
        let rows = error_rows(&template, &errors);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field, "email");
        assert_eq!(rows[1].problem, "Licence plate is required");
        assert!(sink.submissions().is_empty());
    }
}
