use proptest::prelude::*;
use quill_util::{absolute_name, maybe_truncate, numeric_sort_key};

const PROPTEST_CASES: u32 = 256;

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}"
}

fn arb_dotted(max_parts: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_ident(), 1..=max_parts)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn relative_names_drop_one_component_per_extra_dot(
        prefix in arb_dotted(5),
        name in arb_ident(),
        dots in 1usize..7,
    ) {
        let relative = format!("{}{name}", ".".repeat(dots));
        let resolved = absolute_name(&prefix.join("."), &relative);
        if dots > prefix.len() {
            prop_assert_eq!(resolved, None);
        } else {
            let kept = &prefix[..prefix.len() + 1 - dots];
            let mut expected = kept.join(".");
            expected.push('.');
            expected.push_str(&name);
            prop_assert_eq!(resolved, Some(expected));
        }
    }

    #[test]
    fn undotted_names_are_appended(prefix in arb_dotted(4), name in arb_ident()) {
        let prefix = prefix.join(".");
        prop_assert_eq!(absolute_name(&prefix, &name), Some(format!("{prefix}.{name}")));
    }

    #[test]
    fn numeric_keys_order_like_numbers(stem in "[a-z]{1,4}", a in 0u64..100_000, b in 0u64..100_000) {
        let ka = numeric_sort_key(&format!("{stem}{a}"));
        let kb = numeric_sort_key(&format!("{stem}{b}"));
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    #[test]
    fn truncation_keeps_at_most_length_minus_three(text in "\\PC{0,60}", length in 3usize..40) {
        let out = maybe_truncate(&text, length);
        let chars = text.chars().count();
        if chars > length - 3 {
            let kept: String = text.chars().take(length - 3).collect();
            prop_assert_eq!(out, format!("{kept}..."));
        } else {
            prop_assert_eq!(out, text);
        }
    }
}
