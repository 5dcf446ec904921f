//! Property tests: metric identity is a function of the label *set*, never
//! of construction order.

use proptest::prelude::*;

use reverbmon_core::models::{metric_key, Labels};

proptest! {
    #[test]
    fn prop_identity_ignores_insertion_order(
        pairs in proptest::collection::vec(("[a-z_]{1,12}", "[a-zA-Z0-9 ]{0,20}"), 1..8),
        seed in any::<u64>(),
    ) {
        let forward: Labels = pairs.iter().cloned().collect();

        // Re-insert the same (deduplicated) entries in a shuffled order.
        let mut shuffled: Vec<(String, String)> = forward.clone().into_iter().collect();
        let len = shuffled.len();
        for i in (1..len).rev() {
            shuffled.swap(i, (seed as usize).wrapping_mul(i + 7) % (i + 1));
        }
        let backward: Labels = shuffled.into_iter().collect();

        prop_assert_eq!(
            metric_key("reverb_channels_active", &forward),
            metric_key("reverb_channels_active", &backward)
        );
    }

    #[test]
    fn prop_value_changes_change_identity(
        key in "[a-z_]{1,12}",
        value in "[a-z]{1,10}",
        other in "[A-Z]{1,10}",
    ) {
        let mut a = Labels::new();
        a.insert(key.clone(), value);
        let mut b = Labels::new();
        b.insert(key, other);

        prop_assert_ne!(metric_key("m", &a), metric_key("m", &b));
    }
}
