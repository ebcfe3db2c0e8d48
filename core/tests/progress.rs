use std::time::Duration;

use pledge_lungs_core::{
    breathing_transform, AssetTransform, ProgressState, Tier, MAX_ASSET_MARKERS,
    MAX_OVERLAY_MARKERS, PLEDGE_GOAL,
};

#[test]
fn ratio_tracks_count_until_the_goal() {
    let mut previous = 0.0;
    for count in 0..=(PLEDGE_GOAL * 2) {
        let state = ProgressState::from_count(count);
        let expected = (count as f32 / PLEDGE_GOAL as f32).min(1.0);

        assert!(
            (state.ratio() - expected).abs() < 1e-6,
            "ratio for {count} should be {expected}, got {}",
            state.ratio(),
        );
        assert!(state.ratio() >= previous, "ratio must never decrease");
        previous = state.ratio();
    }

    assert_eq!(ProgressState::from_count(u32::MAX).ratio(), 1.0);
}

/// Percentage computed with exact rational arithmetic, halves rounding up.
fn exact_percentage(count: u32) -> u64 {
    let filled = u64::from(count.min(PLEDGE_GOAL));
    let goal = u64::from(PLEDGE_GOAL);
    (filled * 100 * 2 + goal) / (goal * 2)
}

#[test]
fn percentage_rounds_exact_halves_up() {
    for count in 0..=(PLEDGE_GOAL + 50) {
        let state = ProgressState::from_count(count);

        assert!(state.percentage() <= 100);
        assert_eq!(
            u64::from(state.percentage()),
            exact_percentage(count),
            "percentage mismatch for count {count}",
        );
    }
}

#[test]
fn tiers_match_documented_counts() {
    let cases = [
        (0, Tier::Starting),
        (49, Tier::Starting),
        (50, Tier::Growing),
        (100, Tier::Halfway),
        (150, Tier::AlmostFull),
        (199, Tier::AlmostFull),
        (200, Tier::Complete),
        (500, Tier::Complete),
    ];

    for (count, tier) in cases {
        assert_eq!(
            ProgressState::from_count(count).tier(),
            tier,
            "unexpected tier for count {count}",
        );
    }
}

#[test]
fn empty_state_has_no_markers() {
    let state = ProgressState::from_count(0);

    assert_eq!(state.percentage(), 0);
    assert_eq!(state.asset_marker_count(), 0);
    assert_eq!(state.overlay_marker_count(), 0);
}

#[test]
fn full_state_has_every_marker() {
    let state = ProgressState::from_count(PLEDGE_GOAL);

    assert_eq!(state.percentage(), 100);
    assert_eq!(state.asset_marker_count(), MAX_ASSET_MARKERS);
    assert_eq!(state.overlay_marker_count(), MAX_OVERLAY_MARKERS);
}

#[test]
fn derivation_is_idempotent() {
    for count in [0, 1, 73, 150, 200, 9_000] {
        assert_eq!(
            ProgressState::from_count(count),
            ProgressState::from_count(count)
        );
    }
}

#[test]
fn animation_starts_at_identity() {
    assert_eq!(breathing_transform(Duration::ZERO), AssetTransform::IDENTITY);
}

#[test]
fn animation_is_restartable_from_any_time() {
    let sample = Duration::from_millis(12_345);
    let first = breathing_transform(sample);
    let _ = breathing_transform(Duration::from_secs(3));
    let second = breathing_transform(sample);

    assert_eq!(first, second);
    assert!((first.scale - 1.0).abs() <= 0.1 + f32::EPSILON);
    assert!(first.rotation_y.abs() <= 0.1 + f32::EPSILON);
}
