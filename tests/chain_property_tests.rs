//! Property tests for locale identifier truncation and qualified names.

use proptest::prelude::*;

use resbundle::chain::{FallbackChain, parent_identifier, qualified_name};

fn segment_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z]{1,8}").expect("valid segment regex")
}

fn locale_id_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..5).prop_map(|segments| segments.join("_"))
}

proptest! {
    #[test]
    fn parent_is_strictly_shorter(locale_id in locale_id_strategy()) {
        let parent = parent_identifier(&locale_id).expect("non-empty id has a parent");
        prop_assert!(parent.len() < locale_id.len());
        prop_assert!(locale_id.starts_with(parent));
    }

    #[test]
    fn chain_terminates_at_root(locale_id in locale_id_strategy()) {
        let ancestors: Vec<&str> = FallbackChain::new(&locale_id).collect();
        let segments = locale_id.split('_').count();
        // One ancestor per dropped segment, the last being the root.
        prop_assert_eq!(ancestors.len(), segments);
        prop_assert_eq!(*ancestors.last().expect("at least the root"), "");
    }

    #[test]
    fn chain_drops_one_segment_per_step(locale_id in locale_id_strategy()) {
        let mut expected_segments: Vec<&str> = locale_id.split('_').collect();
        for ancestor in FallbackChain::new(&locale_id) {
            expected_segments.pop();
            prop_assert_eq!(ancestor, expected_segments.join("_"));
        }
    }

    #[test]
    fn qualified_name_round_trips_locale(base in segment_strategy(), locale_id in locale_id_strategy()) {
        let name = qualified_name(&base, &locale_id);
        prop_assert_eq!(name, format!("{}_{}", base, locale_id));
        prop_assert_eq!(qualified_name(&base, ""), base);
    }
}
