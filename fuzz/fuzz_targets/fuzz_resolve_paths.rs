#![no_main]

use checkit::error::RuleError;
use checkit::path::{resolve_path, split_path};
use checkit::tree::{Node, build_tree, evaluate_tree};
use checkit::{MissingPolicy, Mode, RuleSet, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Use the first byte to determine the split point between path and JSON value.
    let split = data[0] as usize % data.len().max(1);
    let (path_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let path = String::from_utf8_lossy(path_bytes);

    let Ok(json) = serde_json::from_slice::<serde_json::Value>(value_bytes) else {
        return;
    };
    let value = Value::from(json);

    let _ = resolve_path(&path, &value);

    let segments = split_path(&path);
    let tree = build_tree(&segments, &value);
    let passing = |_: &Value| -> Result<bool, RuleError> { Ok(true) };
    for policy in [MissingPolicy::Truncate, MissingPolicy::Fail, MissingPolicy::Error] {
        let _ = evaluate_tree(&tree, &passing, policy);
    }

    // Errors never count as passing under `any`, unless an `all` over an
    // empty sequence passes without calling the rule.
    let failing = RuleSet::new().rule(path.to_string(), |_: &Value| -> Result<bool, RuleError> {
        Err(RuleError::custom("always errors"))
    });
    let passed = failing.validate_any(&value);
    if !contains_all(&tree) {
        assert!(!passed);
    }
});

fn contains_all(node: &Node<'_>) -> bool {
    node.mode == Mode::All || node.children.iter().any(contains_all)
}
