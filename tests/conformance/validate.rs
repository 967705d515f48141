use super::common::{Expected, load_cases, report};
use checkit::Value;

#[derive(Debug, serde::Deserialize)]
struct ValidateCase {
    name: String,
    id: String,
    input: ValidateInput,
    expected: Expected,
}

#[derive(Debug, serde::Deserialize)]
struct ValidateInput {
    document: serde_json::Value,
    value: serde_json::Value,
}

#[test]
fn rule_document_suite() {
    let cases: Vec<ValidateCase> = load_cases("validate.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();

    for case in &cases {
        // JSON is valid YAML, so the document goes through the normal loader.
        let source = serde_json::to_string(&case.input.document).unwrap();
        let validator = match checkit::load(&source) {
            Ok(v) => v,
            Err(e) => {
                failures.push(format!("{} ({}): load failed: {}", case.id, case.name, e));
                continue;
            }
        };

        let value = Value::from(&case.input.value);
        let result = validator.validate(&value);
        let actual = Expected::of(&result);

        // The report must agree with the short-circuiting verdict, except that
        // it has no error outcome of its own.
        let report_passed = validator.check(&value).passed(validator.logic);
        let report_agrees = report_passed == (actual == Expected::Pass);

        if actual == case.expected && report_agrees {
            passed += 1;
        } else {
            failures.push(format!(
                "{} ({}): expected {:?}, got {:?} (report passed: {})",
                case.id, case.name, case.expected, result, report_passed
            ));
        }
    }

    report("validate", passed, &failures);
}
