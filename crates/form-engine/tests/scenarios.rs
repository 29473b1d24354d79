//! End-to-end authoring and fill-in scenarios

use form_engine::{
    BuilderSession, CollectingSink, ConditionalRule, FieldId, FieldOption, FieldPatch, FieldType,
    FormRuntime, FormTemplate, InMemoryTemplateStore, SubmitOutcome, TemplateStore, TemplateFilter,
    ValidationRule,
};
use serde_json::json;

/// Field A (select Yes/No) and field B visible when A == "Yes"
fn yes_no_template() -> (FormTemplate, FieldId, FieldId) {
    let mut session = BuilderSession::new("Late Checkout Request");
    let a = session.add_field(FieldType::Select).unwrap();
    session
        .update_field(&a, FieldPatch {
            label: Some("Need a late checkout?".into()),
            options: Some(vec![FieldOption::new("Yes", "Yes"), FieldOption::new("No", "No")]),
            ..Default::default()
        })
        .unwrap();

    let b = session.add_field(FieldType::Time).unwrap();
    session.update_field(&b, FieldPatch::label("Checkout time")).unwrap();
    session.set_conditional(&b, Some(ConditionalRule::equals(a.clone(), "Yes"))).unwrap();

    (session.into_template(), a, b)
}

#[test]
fn conditional_field_toggles_and_keeps_value() {
    let (template, a, b) = yes_no_template();
    let mut runtime = FormRuntime::new(template);

    runtime.set_value(a.as_str(), json!("Yes")).unwrap();
    runtime.set_value(b.as_str(), json!("14:00")).unwrap();
    assert!(runtime.is_visible(b.as_str()));

    runtime.set_value(a.as_str(), json!("No")).unwrap();
    assert!(!runtime.is_visible(b.as_str()));

    runtime.set_value(a.as_str(), json!("Yes")).unwrap();
    assert!(runtime.is_visible(b.as_str()));
    assert_eq!(runtime.value(b.as_str()), Some(&json!("14:00")));
}

#[test]
fn first_failing_rule_message_is_reported() {
    let mut session = BuilderSession::new("Contact");
    let id = session.add_field(FieldType::Text).unwrap();
    session.add_rule(&id, ValidationRule::min_length(5, "Use at least 5 characters")).unwrap();
    session.add_rule(&id, ValidationRule::email("Enter an email")).unwrap();

    let mut runtime = FormRuntime::new(session.into_template());
    runtime.set_value(id.as_str(), json!("ab")).unwrap();

    match runtime.submit() {
        SubmitOutcome::Rejected(errors) => {
            assert_eq!(errors.get(id.as_str()).map(String::as_str), Some("Use at least 5 characters"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn invisible_required_field_does_not_block_submit() {
    let (template, a, b) = yes_no_template();
    let mut template = template;
    template.fields[1].required = true;
    let mut runtime = FormRuntime::new(template);

    runtime.set_value(a.as_str(), json!("No")).unwrap();
    match runtime.submit() {
        SubmitOutcome::Accepted(values) => {
            assert_eq!(values.get(a.as_str()), Some(&json!("No")));
            assert!(!values.contains_key(b.as_str()));
        }
        other => panic!("expected acceptance, got {:?}", other),
    }
}

#[test]
fn json_round_trip_keeps_fields_rules_and_conditions() {
    let (template, _, _) = yes_no_template();
    let mut template = template;
    template.fields[0].validation.push(ValidationRule::regex("^(Yes|No)$", "Pick one"));

    let json = template.to_json().unwrap();
    let restored = FormTemplate::from_json(&json).unwrap();

    assert_eq!(restored.fields, template.fields);
    assert_eq!(restored, template);
}

#[test]
fn insert_then_delete_restores_sequence() {
    let mut session = BuilderSession::new("Housekeeping");
    for field_type in [FieldType::Text, FieldType::Number, FieldType::Checkbox] {
        session.add_field(field_type).unwrap();
    }
    let before: Vec<FieldId> = session.fields().iter().map(|f| f.id.clone()).collect();

    let inserted = session.insert_field(FieldType::Date, 1).unwrap();
    session.delete_field(&inserted).unwrap();

    let after: Vec<FieldId> = session.fields().iter().map(|f| f.id.clone()).collect();
    assert_eq!(before, after);
    for (i, field) in session.fields().iter().enumerate() {
        assert_eq!(field.order as usize, i + 1);
    }
}

#[tokio::test]
async fn save_publish_and_submit_through_ports() {
    let store = InMemoryTemplateStore::new();
    let (template, a, _) = yes_no_template();

    let mut session = BuilderSession::from_template(template, Default::default()).unwrap();
    session.publish().unwrap();
    let saved = session.save(&store).await.unwrap();

    let active = store
        .list(&TemplateFilter { status: Some(form_engine::TemplateStatus::Active), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(active.len(), 1);

    let sink = CollectingSink::new();
    let mut runtime = FormRuntime::new(saved);
    runtime.set_value(a.as_str(), json!("No")).unwrap();
    let outcome = runtime.submit_to(&sink).await.unwrap();

    assert!(outcome.is_accepted());
    let delivered = sink.submissions();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].template_id, session.template().id);
}

#[tokio::test]
async fn rejected_submission_is_not_delivered() {
    let mut session = BuilderSession::new("Incident");
    let id = session.add_field(FieldType::Textarea).unwrap();
    session.update_field(&id, FieldPatch { required: Some(true), ..Default::default() }).unwrap();

    let sink = CollectingSink::new();
    let mut runtime = FormRuntime::new(session.into_template());
    let outcome = runtime.submit_to(&sink).await.unwrap();

    assert!(!outcome.is_accepted());
    assert!(sink.submissions().is_empty());
}
