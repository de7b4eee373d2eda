//! Property tests for the validation pipeline.

use proptest::prelude::*;

use autolot::domain::validation::{
    validate_manufacturer, validate_vehicle_instance, FieldMap, ValidationOptions, Validated,
};

fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[A-Za-z0-9 ]{0,16}",
        Just("2026-10-14".to_string()),
        Just("01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: any input yields a draft or a rejection, never a panic.
    #[test]
    fn property_instance_validation_is_total(
        vehicle in field_value(),
        status in field_value(),
        due_back in field_value(),
        year in field_value(),
    ) {
        let input = FieldMap::new()
            .with("vehicle", vehicle)
            .with("status", status)
            .with("dueBack", due_back)
            .with("year", year);
        match validate_vehicle_instance(&input) {
            Validated::Valid(_) => {}
            Validated::Invalid(rejection) => {
                prop_assert!(!rejection.errors.is_empty());
                prop_assert_eq!(rejection.input.len(), input.len());
            }
        }
    }

    /// PROPERTY: a rejected manufacturer's sanitized input is safe to redisplay.
    #[test]
    fn property_rejected_input_is_escaped(name in any::<String>(), country in any::<String>()) {
        let input = FieldMap::new().with("name", name).with("country", country);
        if let Validated::Invalid(rejection) =
            validate_manufacturer(&input, &ValidationOptions::default())
        {
            for (_, value) in rejection.input.iter() {
                let rendered = serde_json::to_string(value).unwrap();
                prop_assert!(!rendered.contains('<'));
            }
        }
    }
}
