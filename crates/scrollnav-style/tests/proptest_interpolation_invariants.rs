//! Property-based invariant tests for scroll interpolation.
//!
//! 1. Lockstep: mappings sharing a range clamp at the same boundary
//! 2. Monotonicity inside the range, constancy outside
//! 3. No overshoot for any offset, including NaN and infinities
//! 4. Navbar profile channels move together

use proptest::prelude::*;
use scrollnav_style::{
    CANONICAL_SCROLL_RANGE, InputRange, InterpolationMapping, NavbarProfile, RangePhase,
};

fn offset_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -500.0f64..500.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(0.0),
        Just(100.0),
    ]
}

fn range_strategy() -> impl Strategy<Value = InputRange> {
    (-200.0f64..200.0, 1.0f64..400.0)
        .prop_map(|(start, len)| InputRange::new(start, start + len).expect("valid range"))
}

proptest! {
    #[test]
    fn lockstep_for_shared_range(
        range in range_strategy(),
        x in offset_strategy(),
        a in (-50.0f64..50.0, -50.0f64..50.0),
        b in (-50.0f64..50.0, -50.0f64..50.0),
    ) {
        let m1 = InterpolationMapping::new(range, a.0, a.1);
        let m2 = InterpolationMapping::new(range, b.0, b.1);
        let v1 = m1.evaluate(x);
        let v2 = m2.evaluate(x);
        match range.phase(x) {
            RangePhase::Before => {
                prop_assert_eq!(v1, a.0);
                prop_assert_eq!(v2, b.0);
            }
            RangePhase::After => {
                prop_assert_eq!(v1, a.1);
                prop_assert_eq!(v2, b.1);
            }
            RangePhase::Within => {
                // Both are strictly interpolating with the same progress.
                let p = range.progress(x);
                prop_assert!(p > 0.0 && p < 1.0);
            }
        }
    }

    #[test]
    fn monotonic_within_range(
        range in range_strategy(),
        from in -100.0f64..100.0,
        to in -100.0f64..100.0,
        x in -500.0f64..500.0,
        dx in 0.0f64..100.0,
    ) {
        let m = InterpolationMapping::new(range, from, to);
        let lo = m.evaluate(x);
        let hi = m.evaluate(x + dx);
        if to >= from {
            prop_assert!(lo <= hi, "increasing mapping went down: {lo} > {hi}");
        } else {
            prop_assert!(lo >= hi, "decreasing mapping went up: {lo} < {hi}");
        }
    }

    #[test]
    fn never_overshoots(
        from in -100.0f64..100.0,
        to in -100.0f64..100.0,
        x in offset_strategy(),
    ) {
        let m = InterpolationMapping::canonical(from, to);
        let v = m.evaluate(x);
        prop_assert!(v >= from.min(to) && v <= from.max(to));
    }

    #[test]
    fn navbar_channels_move_together(x in offset_strategy()) {
        let s = NavbarProfile::default().sample(x);
        let p = CANONICAL_SCROLL_RANGE.progress(x);
        prop_assert!((s.logo_opacity - (1.0 - p)).abs() < 1e-9);
        prop_assert!((s.border_radius.value - 20.0 * p).abs() < 1e-9);
        prop_assert!((s.width.value - (100.0 - 30.0 * p)).abs() < 1e-9);
    }
}
