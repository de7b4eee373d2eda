//! Property tests for HTML escaping of free text.

use proptest::prelude::*;

use autolot::domain::validation::escape_html;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: escaped text never contains a markup-significant character.
    #[test]
    fn property_escaped_text_has_no_raw_markup(input in any::<String>()) {
        let escaped = escape_html(&input);
        for c in ['<', '>', '"', '\''] {
            prop_assert!(!escaped.contains(c), "{:?} escaped to {:?}", input, escaped);
        }
    }

    /// PROPERTY: text without special characters passes through unchanged.
    #[test]
    fn property_plain_text_is_untouched(input in "[A-Za-z0-9 .,-]{0,64}") {
        prop_assert_eq!(escape_html(&input), input);
    }

    /// PROPERTY: escaping never shrinks its input.
    #[test]
    fn property_escaping_never_shrinks(input in any::<String>()) {
        prop_assert!(escape_html(&input).len() >= input.len());
    }
}
