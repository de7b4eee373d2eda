//! Property tests for scalar-or-sequence normalization.

use proptest::prelude::*;

use autolot::domain::validation::{normalize_many, FieldMap, FieldValue};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a scalar always normalizes to exactly itself.
    #[test]
    fn property_scalar_becomes_single_element(value in any::<String>()) {
        let normalized = normalize_many(Some(&FieldValue::Single(value.clone())));
        prop_assert_eq!(normalized, vec![value]);
    }

    /// PROPERTY: a sequence keeps its length and order.
    #[test]
    fn property_sequence_is_preserved(values in proptest::collection::vec(any::<String>(), 0..8)) {
        let normalized = normalize_many(Some(&FieldValue::Many(values.clone())));
        prop_assert_eq!(normalized, values);
    }

    /// PROPERTY: repeating a `-f` key accumulates every value in order.
    #[test]
    fn property_repeated_pairs_accumulate(values in proptest::collection::vec("[a-z0-9]{1,12}", 1..6)) {
        let pairs: Vec<String> = values.iter().map(|v| format!("vehicle_types={}", v)).collect();
        let map = FieldMap::from_pairs(&pairs).unwrap();
        let normalized = normalize_many(map.get("vehicle_types"));
        prop_assert_eq!(normalized, values);
    }
}
