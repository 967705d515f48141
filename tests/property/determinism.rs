use super::resolve_path::{arb_path, arb_value};
use checkit::enums::MissingPolicy;
use checkit::rules::{self, Length, OfKind};
use checkit::{RuleSet, ValueKind};
use proptest::prelude::*;

fn rule_set(paths: &[String], missing: MissingPolicy) -> RuleSet {
    let mut set = RuleSet::new().missing(missing);
    for (i, path) in paths.iter().enumerate() {
        match i % 3 {
            0 => set.insert(path.clone(), rules::required()),
            1 => set.insert(path.clone(), Length::max(3)),
            _ => set.insert(path.clone(), OfKind::new(ValueKind::Sequence)),
        }
    }
    set
}

proptest! {
    #[test]
    fn validation_is_repeatable(
        value in arb_value(3),
        paths in prop::collection::vec(arb_path(), 0..5),
        missing in prop_oneof![
            Just(MissingPolicy::Truncate),
            Just(MissingPolicy::Fail),
            Just(MissingPolicy::Error),
        ],
    ) {
        let set = rule_set(&paths, missing);
        let before = value.clone();

        prop_assert_eq!(set.validate_all(&value), set.validate_all(&value));
        prop_assert_eq!(set.validate_any(&value), set.validate_any(&value));
        prop_assert_eq!(set.check(&value), set.check(&value));
        prop_assert_eq!(&value, &before);
    }

    #[test]
    fn report_agrees_with_validation(
        value in arb_value(3),
        paths in prop::collection::vec(arb_path(), 0..5),
    ) {
        let set = rule_set(&paths, MissingPolicy::Truncate);
        let report = set.check(&value);

        prop_assert_eq!(report.outcomes.len(), set.len());
        prop_assert_eq!(report.passed(checkit::Logic::Any), set.validate_any(&value));
        prop_assert_eq!(report.passed(checkit::Logic::All), set.validate_all(&value) == Ok(true));
    }
}
