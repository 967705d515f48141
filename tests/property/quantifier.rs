use super::resolve_path::arb_value;
use checkit::enums::MissingPolicy;
use checkit::error::RuleError;
use checkit::tree::evaluate_path;
use checkit::Value;
use proptest::prelude::*;

fn positive(v: &Value) -> Result<bool, RuleError> {
    match v.as_i64() {
        Some(n) => Ok(n > 0),
        None => Err(RuleError::custom("not an integer")),
    }
}

fn arb_items() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            any::<i8>().prop_map(|n| Value::Int(n.into())),
            Just(Value::String("x".into())),
        ],
        0..8,
    )
}

proptest! {
    #[test]
    fn all_is_conjunction_of_elements(items in arb_items()) {
        // Reference fold: first failure or error decides, otherwise true.
        let mut reference = Ok(true);
        for item in &items {
            match positive(item) {
                Ok(true) => {}
                other => {
                    reference = other;
                    break;
                }
            }
        }

        let value = Value::Sequence(items);
        let result = evaluate_path("all", &value, &positive, MissingPolicy::Truncate);
        prop_assert_eq!(result, reference);
    }

    #[test]
    fn any_is_disjunction_of_elements(items in arb_items()) {
        let reference = items.iter().any(|item| positive(item) == Ok(true));
        let value = Value::Sequence(items);
        let result = evaluate_path("any", &value, &positive, MissingPolicy::Truncate);
        prop_assert_eq!(result, Ok(reference));
    }

    #[test]
    fn any_never_errors(value in arb_value(3), policy in prop_oneof![
        Just(MissingPolicy::Truncate),
        Just(MissingPolicy::Fail),
        Just(MissingPolicy::Error),
    ]) {
        let wrapped = Value::Sequence(vec![value]);
        let result = evaluate_path("any.any", &wrapped, &positive, policy);
        prop_assert!(result.is_ok());
    }

    #[test]
    fn nested_quantifiers_fold_per_group(groups in prop::collection::vec(arb_items(), 0..5)) {
        let reference = groups
            .iter()
            .all(|group| group.iter().any(|item| positive(item) == Ok(true)));
        let value = Value::Sequence(groups.into_iter().map(Value::Sequence).collect());
        let result = evaluate_path("all.any", &value, &positive, MissingPolicy::Truncate);
        prop_assert_eq!(result, Ok(reference));
    }
}
