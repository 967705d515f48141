use checkit::path::{resolve_path, split_path};
use checkit::tree::build_tree;
use checkit::{Key, Record, Value};
use proptest::prelude::*;

/// Strategy for arbitrary values nested up to `depth` levels.
pub fn arb_value(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::UInt),
        (-1e6f64..1e6).prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::String),
    ];

    leaf.prop_recursive(depth, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Sequence),
            prop::collection::vec(("[a-z]{1,4}", inner.clone()), 0..4).prop_map(|pairs| {
                Value::Map(pairs.into_iter().map(|(k, v)| (Key::String(k), v)).collect())
            }),
            prop::collection::vec((any::<u8>(), inner.clone()), 0..4).prop_map(|pairs| {
                Value::Map(pairs.into_iter().map(|(k, v)| (Key::U8(k), v)).collect())
            }),
            prop::collection::vec(("[a-z]{1,4}", inner.clone()), 0..4).prop_map(|fields| {
                Value::Record(Record { name: None, fields })
            }),
            prop::option::of(inner).prop_map(Value::from),
        ]
    })
}

/// Strategy for dotted paths drawn from keys, indexes and reserved names.
pub fn arb_path() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        "[a-z]{1,4}",
        (0u16..400).prop_map(|n| n.to_string()),
        Just("first".to_string()),
        Just("last".to_string()),
        Just("all".to_string()),
        Just("any".to_string()),
        Just(String::new()),
    ];
    prop::collection::vec(segment, 0..5).prop_map(|segments| segments.join("."))
}

/// All plain paths that resolve in `value`, up to `max_depth` segments.
fn extract_paths(value: &Value, prefix: &str, paths: &mut Vec<String>, max_depth: u32) {
    if max_depth == 0 {
        return;
    }
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", prefix, segment)
        }
    };
    match value.unboxed() {
        Value::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let path = join(&i.to_string());
                paths.push(path.clone());
                extract_paths(item, &path, paths, max_depth - 1);
            }
        }
        Value::Record(record) => {
            for (name, field) in &record.fields {
                let path = join(name);
                paths.push(path.clone());
                extract_paths(field, &path, paths, max_depth - 1);
            }
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn resolve_never_panics(value in arb_value(3), path in arb_path()) {
        let _ = resolve_path(&path, &value);
        let segments = split_path(&path);
        let _ = build_tree(&segments, &value);
    }

    #[test]
    fn empty_path_is_root(value in arb_value(3), dots in "\\.{0,4}") {
        prop_assert_eq!(resolve_path(&dots, &value), Some(&value));
    }

    #[test]
    fn quantified_paths_have_no_single_value(value in arb_value(3), prefix in arb_path()) {
        let path = format!("{}.all", prefix);
        prop_assert!(resolve_path(&path, &value).is_none());
    }

    #[test]
    fn extracted_paths_resolve(value in arb_value(3)) {
        let mut paths = Vec::new();
        extract_paths(&value, "", &mut paths, 4);
        for path in &paths {
            // Record field names may collide with reserved segments.
            if split_path(path).iter().any(|s| ["all", "any", "first", "last"].contains(s)) {
                continue;
            }
            prop_assert!(resolve_path(path, &value).is_some(), "path {} did not resolve", path);
        }
    }

    #[test]
    fn extra_dots_do_not_change_resolution(value in arb_value(3), path in arb_path()) {
        let padded = format!(".{}.", path.replace('.', ".."));
        prop_assert_eq!(resolve_path(&path, &value), resolve_path(&padded, &value));
    }
}
