// integration tests for rule files

use jsonmatch::config;
use jsonmatch::RuleError;
use serde_json::json;

use crate::common::write_rules;

const RULES: &str = r#"{
    // applied to every rule in this file
    options: {
        when_not_found: "return_false",
        date_time_format: "%Y-%m-%d",
    },
    rules: {
        adult: ["user.age", ">=", 18],
        recent_buyer: {
            and: [
                ["orders.[+].date", ">=", "2024-01-01"],
                { not: ["user.banned", "=", true] },
            ],
        },
        vip: { field: "user.tier", op: "in", value: ["gold", "platinum"] },
    },
}"#;

#[test]
fn test_load_and_match() {
    let (_dir, path) = write_rules("rules.json5", RULES);
    let rules = config::load(&path).unwrap();

    assert_eq!(rules.len(), 3);
    assert_eq!(
        rules.names().collect::<Vec<_>>(),
        vec!["adult", "recent_buyer", "vip"]
    );

    let customer = json!({
        "user": {"age": 34, "tier": "silver"},
        "orders": [{"date": "2023-11-02"}, {"date": "2024-03-15"}]
    });
    assert!(rules.matches("adult", &customer).unwrap());
    // user.banned is missing; the file's policy turns that into false
    assert!(rules.matches("recent_buyer", &customer).unwrap());
    assert!(!rules.matches("vip", &customer).unwrap());

    assert_eq!(
        rules.matching(&customer).unwrap(),
        vec!["adult", "recent_buyer"]
    );
}

#[test]
fn test_unknown_rule() {
    let (_dir, path) = write_rules("rules.json5", RULES);
    let rules = config::load(&path).unwrap();
    let err = rules.matches("nope", &json!({})).unwrap_err();
    assert!(matches!(err, RuleError::UnknownRule(_)));
    assert_eq!(err.to_string(), "unknown rule: 'nope'");
}

#[test]
fn test_match_errors_pass_through() {
    let (_dir, path) = write_rules(
        "rules.json",
        r#"{"rules": {"bad": ["user.age", "between", [1, 2]]}}"#,
    );
    let rules = config::load(&path).unwrap();
    let err = rules.matches("bad", &json!({"user": {"age": 1}})).unwrap_err();
    assert!(matches!(
        err,
        RuleError::Match(jsonmatch::MatchError::IllegalOperator(_))
    ));
}

#[test]
fn test_load_invalid_file() {
    let (_dir, path) = write_rules("rules.json", r#"{"rules": {"a": ["x"]}}"#);
    let err = config::load(&path).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("invalid rule file"), "{}", message);
    assert!(message.contains("length 3"), "{}", message);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = config::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("rule file not found"));
}

#[test]
fn test_verify_file() {
    let (_dir, path) = write_rules("rules.json5", RULES);
    assert!(config::verify(&path).unwrap().is_empty());

    let (_dir, path) = write_rules(
        "broken.json5",
        r#"{ rules: { a: ["x.[last]", "like", "y"] } }"#,
    );
    let errors = config::verify(&path).unwrap();
    assert_eq!(errors.len(), 2, "errors: {:?}", errors);
    assert!(errors.iter().any(|e| e.contains("unknown operator 'like'")));
    assert!(errors.iter().any(|e| e.contains("segment '[last]'")));
}
