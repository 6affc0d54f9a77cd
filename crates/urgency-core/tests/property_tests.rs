//! # Property-Based Tests
//!
//! Detector invariants checked with proptest over arbitrary sales series.

use chrono::{Days, NaiveDate};
use proptest::collection::vec;
use proptest::prelude::*;
use urgency_core::{DetectorConfig, WeeklyRecord, detect};

fn series(sales: &[f64]) -> Vec<WeeklyRecord> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid date");
    sales
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let week = start
                .checked_add_days(Days::new(7 * i as u64))
                .expect("in range");
            WeeklyRecord::new(week, s)
        })
        .collect()
}

fn config_strategy() -> impl Strategy<Value = DetectorConfig> {
    (1.0f64..99.0, 1usize..30, -0.5f64..1.0, 0.0f64..5000.0, any::<bool>()).prop_map(
        |(percentile, window, growth, baseline, hybrid)| {
            DetectorConfig::default()
                .with_percentile(percentile)
                .with_window(window)
                .with_growth_threshold(growth)
                .with_min_baseline_sales(baseline)
                .with_hybrid(hybrid)
        },
    )
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Same input and config always produce identical flags.
    #[test]
    fn determinism_identical_input_produces_identical_output(
        sales in vec(0.0f64..1e6, 1..150),
        config in config_strategy()
    ) {
        let weeks = series(&sales);
        let first = detect(&weeks, &config).expect("detect");
        let second = detect(&weeks, &config).expect("detect");
        prop_assert_eq!(first, second);
    }

    /// One flag per week, in input order.
    #[test]
    fn output_length_matches_input(
        sales in vec(0.0f64..1e6, 1..150),
        config in config_strategy()
    ) {
        let flags = detect(&series(&sales), &config).expect("detect");
        prop_assert_eq!(flags.len(), sales.len());
    }

    /// The first week has no prior week to grow from.
    #[test]
    fn first_week_never_urgent_by_growth(
        sales in vec(0.0f64..1e6, 1..50),
        config in config_strategy()
    ) {
        let flags = detect(&series(&sales), &config).expect("detect");
        prop_assert!(!flags[0].is_urgent_growth);
        prop_assert_eq!(flags[0].growth_rate, None);
    }

    /// Raising the percentile never adds percentile flags.
    #[test]
    fn higher_percentile_flags_subset(
        sales in vec(0.0f64..1e6, 1..150),
        low in 1.0f64..98.0,
        delta in 0.0f64..50.0,
        window in 1usize..30
    ) {
        let high = (low + delta).min(99.0);
        let weeks = series(&sales);
        let loose = detect(&weeks, &DetectorConfig::default().with_window(window).with_percentile(low))
            .expect("detect");
        let strict = detect(&weeks, &DetectorConfig::default().with_window(window).with_percentile(high))
            .expect("detect");

        for (l, s) in loose.iter().zip(&strict) {
            prop_assert!(!s.is_urgent_percentile || l.is_urgent_percentile);
        }
        let loose_count = loose.iter().filter(|f| f.is_urgent_percentile).count();
        let strict_count = strict.iter().filter(|f| f.is_urgent_percentile).count();
        prop_assert!(strict_count <= loose_count);
    }

    /// Hybrid mode flags every week the percentile-only mode flags.
    #[test]
    fn hybrid_is_superset(
        sales in vec(0.0f64..1e6, 1..150),
        config in config_strategy()
    ) {
        let weeks = series(&sales);
        let hybrid = detect(&weeks, &config.with_hybrid(true)).expect("detect");
        let plain = detect(&weeks, &config.with_hybrid(false)).expect("detect");

        for (h, p) in hybrid.iter().zip(&plain) {
            prop_assert!(!p.is_urgent || h.is_urgent);
            prop_assert_eq!(p.is_urgent, p.is_urgent_percentile);
        }
    }

    /// Changing week i never changes any threshold before i.
    #[test]
    fn thresholds_are_causal(
        sales in vec(0.0f64..1e6, 2..100),
        pick in any::<prop::sample::Index>(),
        replacement in 0.0f64..1e7,
        config in config_strategy()
    ) {
        let i = pick.index(sales.len());
        let mut changed = sales.clone();
        changed[i] = replacement;

        let before = detect(&series(&sales), &config).expect("detect");
        let after = detect(&series(&changed), &config).expect("detect");

        for j in 0..i {
            prop_assert_eq!(before[j], after[j]);
        }
    }

    /// A one-week window makes the threshold the week itself.
    #[test]
    fn unit_window_never_flags_percentile(sales in vec(0.0f64..1e6, 1..100)) {
        let flags = detect(&series(&sales), &DetectorConfig::default().with_window(1))
            .expect("detect");
        for (flag, &s) in flags.iter().zip(&sales) {
            prop_assert_eq!(flag.percentile_threshold, s);
            prop_assert!(!flag.is_urgent_percentile);
        }
    }
}
