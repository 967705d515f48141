use super::common::{load_cases, report};
use checkit::Value;
use checkit::path::resolve_path;

#[derive(Debug, serde::Deserialize)]
struct ResolveCase {
    name: String,
    id: String,
    input: ResolveInput,
    expected: ResolveExpected,
}

#[derive(Debug, serde::Deserialize)]
struct ResolveInput {
    path: String,
    value: serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
struct ResolveExpected {
    found: bool,
    #[serde(default)]
    value: serde_json::Value,
}

#[test]
fn resolve_path_suite() {
    let cases: Vec<ResolveCase> = load_cases("resolve.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();

    for case in &cases {
        let value = Value::from(&case.input.value);
        let result = resolve_path(&case.input.path, &value);

        let matches = match (case.expected.found, result) {
            (true, Some(actual)) => *actual == Value::from(&case.expected.value),
            (false, None) => true,
            _ => false,
        };

        if matches {
            passed += 1;
        } else {
            failures.push(format!(
                "{} ({}): expected {:?}, got {:?}",
                case.id, case.name, case.expected, result
            ));
        }
    }

    report("resolve", passed, &failures);
}
