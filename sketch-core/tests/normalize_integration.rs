//! Reply normalization integration tests.
//!
//! Covers the recovery tiers end to end, fence handling in every position,
//! and totality over arbitrary input.

use proptest::prelude::*;
use serde_json::{json, Value};
use sketch_core::normalize::{parse_records, strip_fences};
use sketch_core::{normalize, normalize_with_tier, RecoveryTier, ResultRecord};

/// Wrap `body` in the requested combination of fences.
fn wrap(body: &str, leading: Option<&str>, trailing: bool) -> String {
    let mut text = String::new();
    if let Some(tag) = leading {
        text.push_str("```");
        text.push_str(tag);
        text.push('\n');
    }
    text.push_str(body);
    if trailing {
        text.push_str("\n```");
    }
    text
}

fn record_strategy() -> impl Strategy<Value = Value> {
    let result = prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,10}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ];
    let assign = prop_oneof![
        Just(None),
        Just(Some(json!(true))),
        Just(Some(json!(false))),
        Just(Some(json!("true"))),
    ];
    ("[a-z0-9+=^ ]{1,12}", result, assign).prop_map(|(expr, result, assign)| {
        let mut record = json!({ "expr": expr, "result": result });
        if let (Some(assign), Value::Object(fields)) = (assign, &mut record) {
            fields.insert("assign".to_string(), assign);
        }
        record
    })
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_fenced_reply_with_language_tag() {
    let records = normalize("```json\n[{\"expr\": \"2+2\", \"result\": 4}]\n```");
    assert_eq!(records.as_slice(), &[ResultRecord::new("2+2", 4, false)]);
}

#[test]
fn test_python_style_reply_is_repaired() {
    let normalized = normalize_with_tier("[{'expr': 'x', 'result': 2, 'assign': true}]");
    assert_eq!(normalized.tier, RecoveryTier::QuotingRepair);
    assert_eq!(
        normalized.records.as_slice(),
        &[ResultRecord::new("x", 2, true)]
    );
}

#[test]
fn test_prose_reply_is_empty() {
    assert!(normalize("not json at all").is_empty());
    assert!(normalize("").is_empty());
    assert!(normalize("```json\n```").is_empty());
}

#[test]
fn test_multiple_assignments_keep_order() {
    let raw = r#"[{"expr": "x", "result": 2, "assign": true}, {"expr": "y", "result": 5, "assign": true}]"#;
    let records = normalize(raw);
    let names: Vec<_> = records.iter().map(|r| r.expr.as_str()).collect();
    assert_eq!(names, ["x", "y"]);
    assert!(records.iter().all(|r| r.assign));
}

#[test]
fn test_abstract_concept_reply() {
    let raw = "```\n[{\"expr\": \"A heart drawn with two names\", \"result\": \"love\"}]\n```";
    let records = normalize(raw);
    assert_eq!(records.len(), 1);
    assert_eq!(records.as_slice()[0].result_text(), "love");
}

#[test]
fn test_trailing_fence_only() {
    let records = normalize("[{\"expr\": \"3*4\", \"result\": 12}]\n```");
    assert_eq!(records.as_slice(), &[ResultRecord::new("3*4", 12, false)]);
}

#[test]
fn test_record_missing_result_fails_both_tiers() {
    let normalized = normalize_with_tier(r#"[{"expr": "x"}]"#);
    assert_eq!(normalized.tier, RecoveryTier::Fallback);
    assert!(normalized.records.is_empty());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn normalize_is_total(raw in any::<String>()) {
        let _ = normalize(&raw);
    }

    #[test]
    fn normalize_is_total_on_json_like_noise(raw in r#"[\[\]{}'":,` a-z0-9\n]{0,64}"#) {
        let _ = normalize(&raw);
    }

    #[test]
    fn fences_do_not_change_records(
        records in prop::collection::vec(record_strategy(), 0..5),
        leading in prop_oneof![Just(None), Just(Some("")), Just(Some("json"))],
        trailing in any::<bool>(),
    ) {
        let body = Value::Array(records).to_string();
        let expected = parse_records(&body).expect("well-formed body");
        let wrapped = wrap(&body, leading, trailing);

        prop_assert_eq!(strip_fences(&wrapped), body.as_str());
        prop_assert_eq!(normalize(&wrapped), expected);
    }

    #[test]
    fn assign_is_true_only_for_literal_true(record in record_strategy()) {
        let expected = record.get("assign") == Some(&Value::Bool(true));
        let body = Value::Array(vec![record]).to_string();
        let records = normalize(&body);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records.as_slice()[0].assign, expected);
    }
}
