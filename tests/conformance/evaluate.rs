use super::common::{Expected, load_cases, report};
use checkit::tree::evaluate_path;
use checkit::{MissingPolicy, RuleSpec, Value};

#[derive(Debug, serde::Deserialize)]
struct EvaluateCase {
    name: String,
    id: String,
    input: EvaluateInput,
    expected: Expected,
}

#[derive(Debug, serde::Deserialize)]
struct EvaluateInput {
    path: String,
    value: serde_json::Value,
    rule: serde_json::Value,
    #[serde(default)]
    missing: MissingPolicy,
}

#[test]
fn evaluate_path_suite() {
    let cases: Vec<EvaluateCase> = load_cases("evaluate.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();

    for case in &cases {
        let spec: RuleSpec = serde_json::from_value(case.input.rule.clone())
            .unwrap_or_else(|e| panic!("{}: bad rule: {}", case.id, e));
        let rule = spec.build().unwrap();
        let value = Value::from(&case.input.value);

        let result = evaluate_path(&case.input.path, &value, rule.as_ref(), case.input.missing);
        let actual = Expected::of(&result);

        if actual == case.expected {
            passed += 1;
        } else {
            failures.push(format!(
                "{} ({}): expected {:?}, got {:?}",
                case.id, case.name, case.expected, result
            ));
        }
    }

    report("evaluate", passed, &failures);
}

#[test]
fn evaluate_path_is_repeatable() {
    let cases: Vec<EvaluateCase> = load_cases("evaluate.yaml");

    for case in &cases {
        let spec: RuleSpec = serde_json::from_value(case.input.rule.clone()).unwrap();
        let rule = spec.build().unwrap();
        let value = Value::from(&case.input.value);
        let before = value.clone();

        let first = evaluate_path(&case.input.path, &value, rule.as_ref(), case.input.missing);
        let second = evaluate_path(&case.input.path, &value, rule.as_ref(), case.input.missing);

        assert_eq!(first, second, "{}: results differ between runs", case.id);
        assert_eq!(value, before, "{}: input was modified", case.id);
    }
}
