//! Screen-space status overlay describing the fill state.

use glam::Vec2;
use pledge_lungs_core::{ProgressState, Tier, PLEDGE_GOAL};

use crate::Color;

/// Heading shown above the caption.
pub const OVERLAY_TITLE: &str = "Breathe Together";

/// Status message and its styling for a single tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierMessage {
    /// Message text.
    pub text: &'static str,
    /// Color of the message text.
    pub text_color: Color,
    /// Color of the panel behind the message.
    pub accent_color: Color,
}

/// Returns the fixed message shown for `tier`.
#[must_use]
pub fn tier_message(tier: Tier) -> TierMessage {
    match tier {
        Tier::Starting => TierMessage {
            text: "Every pledge helps these lungs breathe. Add yours!",
            text_color: Color::from_rgb_u8(0xe2, 0xe8, 0xf0),
            accent_color: Color::from_rgb_u8(0x47, 0x55, 0x69).with_alpha(0.6),
        },
        Tier::Growing => TierMessage {
            text: "The lungs are starting to fill. Keep the pledges coming!",
            text_color: Color::from_rgb_u8(0xbb, 0xf7, 0xd0),
            accent_color: Color::from_rgb_u8(0x16, 0x65, 0x34).with_alpha(0.6),
        },
        Tier::Halfway => TierMessage {
            text: "Halfway there! The air is getting cleaner.",
            text_color: Color::from_rgb_u8(0x86, 0xef, 0xac),
            accent_color: Color::from_rgb_u8(0x15, 0x80, 0x3d).with_alpha(0.6),
        },
        Tier::AlmostFull => TierMessage {
            text: "Almost full! Just a few more pledges to go.",
            text_color: Color::from_rgb_u8(0xfe, 0xf0, 0x8a),
            accent_color: Color::from_rgb_u8(0x85, 0x4d, 0x0e).with_alpha(0.6),
        },
        Tier::Complete => TierMessage {
            text: "Goal reached! These lungs are breathing freely.",
            text_color: Color::WHITE,
            accent_color: Color::from_rgb_u8(0x05, 0x96, 0x69).with_alpha(0.8),
        },
    }
}

/// Horizontal progress bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressBar {
    /// Filled share of the bar in 0.0..=1.0, derived from the whole percentage.
    pub fill_fraction: f32,
    /// Color of the unfilled track.
    pub track_color: Color,
    /// Color of the filled portion.
    pub fill_color: Color,
}

/// Decorative dot floating above the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayMarker {
    /// Centre expressed as fractions of the render region's width and height.
    pub position: Vec2,
}

/// Overlay content for a single fill state.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Heading text.
    pub title: &'static str,
    /// Pledge tally, e.g. `"50 / 200 pledges (25%)"`.
    pub caption: String,
    /// Progress bar reflecting the percentage.
    pub progress_bar: ProgressBar,
    /// Status message selected by the tier.
    pub message: TierMessage,
    /// Decorative markers; unlike the 3D markers their positions are fixed.
    pub markers: Vec<OverlayMarker>,
}

/// Builds the overlay for a fill state.
#[must_use]
pub fn compose_overlay(progress: &ProgressState) -> Overlay {
    let markers = (0..progress.overlay_marker_count())
        .map(|index| OverlayMarker {
            position: overlay_marker_position(index),
        })
        .collect();

    Overlay {
        title: OVERLAY_TITLE,
        caption: format!(
            "{} / {PLEDGE_GOAL} pledges ({}%)",
            progress.count(),
            progress.percentage()
        ),
        progress_bar: ProgressBar {
            fill_fraction: f32::from(progress.percentage()) / 100.0,
            track_color: Color::WHITE.with_alpha(0.2),
            fill_color: Color::from_rgb_u8(0x4a, 0xde, 0x80),
        },
        message: tier_message(progress.tier()),
        markers,
    }
}

/// Position of the overlay marker with the provided index.
#[must_use]
pub fn overlay_marker_position(index: u32) -> Vec2 {
    let index = index as f32;
    Vec2::new(0.10 + 0.08 * index, 0.20 + 0.06 * index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_reports_count_and_percentage() {
        let overlay = compose_overlay(&ProgressState::from_count(50));

        assert_eq!(overlay.caption, "50 / 200 pledges (25%)");
        assert_eq!(overlay.title, OVERLAY_TITLE);
        assert!((overlay.progress_bar.fill_fraction - 0.25).abs() < 1e-6);
    }

    #[test]
    fn caption_keeps_raw_count_beyond_the_goal() {
        let overlay = compose_overlay(&ProgressState::from_count(500));

        assert_eq!(overlay.caption, "500 / 200 pledges (100%)");
        assert_eq!(overlay.progress_bar.fill_fraction, 1.0);
    }

    #[test]
    fn every_tier_has_a_distinct_message() {
        let texts: Vec<&str> = Tier::ALL
            .iter()
            .map(|tier| tier_message(*tier).text)
            .collect();

        for (index, text) in texts.iter().enumerate() {
            assert!(!text.is_empty());
            assert!(
                !texts[index + 1..].contains(text),
                "duplicate message `{text}`",
            );
        }
    }

    #[test]
    fn message_follows_the_tier() {
        let overlay = compose_overlay(&ProgressState::from_count(150));

        assert_eq!(overlay.message, tier_message(Tier::AlmostFull));
    }

    #[test]
    fn overlay_markers_are_deterministic() {
        let progress = ProgressState::from_count(200);
        let first = compose_overlay(&progress);
        let second = compose_overlay(&progress);

        assert_eq!(first.markers.len(), 10);
        assert_eq!(first.markers, second.markers);
        assert_eq!(first.markers[0].position, Vec2::new(0.10, 0.20));
        for marker in &first.markers {
            assert!(marker.position.x > 0.0 && marker.position.x < 1.0);
            assert!(marker.position.y > 0.0 && marker.position.y < 1.0);
        }
    }

    #[test]
    fn empty_overlay_has_no_markers() {
        assert!(compose_overlay(&ProgressState::from_count(0))
            .markers
            .is_empty());
    }
}
