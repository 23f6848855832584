//! Property-based tests for overlay-core
//!
//! Covers right-to-left token placement using proptest.

use overlay_core::{layout_rtl, visual_order, FontMetrics};
use proptest::prelude::*;

/// Every character is 0.5em wide, spaces 0.25em
struct FixedWidthFont;

impl FontMetrics for FixedWidthFont {
    fn name(&self) -> &str {
        "Fixed"
    }

    fn width_of_text_at_size(&self, text: &str, size: f64) -> f64 {
        text.chars()
            .map(|c| if c == ' ' { 0.25 } else { 0.5 })
            .sum::<f64>()
            * size
    }
}

fn token_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9\u{05D0}-\u{05EA}]{1,8}", 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn layout_reverses_token_order(tokens in token_list()) {
        let drawn = layout_rtl(&tokens, 0.0, 0.0, &FixedWidthFont, 10.0);
        let texts: Vec<String> = drawn.into_iter().map(|d| d.text).collect();
        let mut reversed = tokens.clone();
        reversed.reverse();
        prop_assert_eq!(texts, reversed);
    }

    #[test]
    fn advance_is_token_width_plus_space(
        tokens in token_list(),
        start_x in 0.0f64..500.0,
        size in 6.0f64..24.0
    ) {
        let font = FixedWidthFont;
        let drawn = layout_rtl(&tokens, start_x, 100.0, &font, size);
        let space = font.width_of_text_at_size(" ", size);
        prop_assert_eq!(drawn[0].x, start_x);
        for pair in drawn.windows(2) {
            let expected = pair[0].x + font.width_of_text_at_size(&pair[0].text, size) + space;
            prop_assert!((pair[1].x - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn every_token_shares_baseline_and_size(
        tokens in token_list(),
        y in 0.0f64..842.0,
        size in 6.0f64..24.0
    ) {
        let drawn = layout_rtl(&tokens, 40.0, y, &FixedWidthFont, size);
        prop_assert_eq!(drawn.len(), tokens.len());
        prop_assert!(drawn.iter().all(|d| d.y == y && d.size == size && d.font == "Fixed"));
    }

    #[test]
    fn visual_order_is_its_own_inverse(tokens in token_list()) {
        let once = visual_order(&tokens);
        let twice = visual_order(&once);
        prop_assert_eq!(twice, tokens.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
