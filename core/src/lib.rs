#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pledge Lungs visualiser.
//!
//! Everything in this crate is a pure function of its inputs. Adapters feed
//! a pledge count into [`ProgressState::from_count`] to obtain the derived
//! fill state, and sample [`breathing_transform`] once per frame to animate
//! the lungs model. Neither computation depends on a rendering context.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of pledges required to completely fill the lungs.
pub const PLEDGE_GOAL: u32 = 200;

/// Number of 3D markers emitted when the lungs are completely filled.
pub const MAX_ASSET_MARKERS: u32 = 50;

/// Number of overlay markers emitted when the lungs are completely filled.
pub const MAX_OVERLAY_MARKERS: u32 = 10;

/// Angular frequency of the breathing scale oscillation, in radians per second.
pub const BREATHING_FREQUENCY: f32 = 0.5;

/// Peak deviation of the breathing scale from the rest size.
pub const BREATHING_AMPLITUDE: f32 = 0.1;

/// Angular frequency of the sway rotation around the vertical axis.
pub const SWAY_FREQUENCY: f32 = 0.2;

/// Peak sway rotation around the vertical axis, in radians.
pub const SWAY_AMPLITUDE: f32 = 0.1;

/// Discrete status bucket derived from the fill ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Fill ratio below one quarter.
    Starting,
    /// Fill ratio in `0.25..0.5`.
    Growing,
    /// Fill ratio in `0.5..0.75`.
    Halfway,
    /// Fill ratio in `0.75..1.0`.
    AlmostFull,
    /// Goal reached.
    Complete,
}

impl Tier {
    /// Every tier ordered from empty to full.
    pub const ALL: [Tier; 5] = [
        Tier::Starting,
        Tier::Growing,
        Tier::Halfway,
        Tier::AlmostFull,
        Tier::Complete,
    ];

    /// Selects the tier for a fill ratio. Boundaries are closed-open except the top one.
    #[must_use]
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio < 0.25 {
            Self::Starting
        } else if ratio < 0.5 {
            Self::Growing
        } else if ratio < 0.75 {
            Self::Halfway
        } else if ratio < 1.0 {
            Self::AlmostFull
        } else {
            Self::Complete
        }
    }
}

/// Fill state derived from a pledge count.
///
/// Only [`ProgressState::from_count`] builds values, so the derived fields
/// always agree with `count`. The type serialises for reports but never
/// deserialises:
///
/// ```compile_fail
/// fn requires_deserialize<T: serde::de::DeserializeOwned>() {}
/// requires_deserialize::<pledge_lungs_core::ProgressState>();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProgressState {
    count: u32,
    ratio: f32,
    percentage: u8,
    tier: Tier,
}

impl ProgressState {
    /// Derives the fill state for the provided pledge count.
    #[must_use]
    pub fn from_count(count: u32) -> Self {
        let ratio = if count >= PLEDGE_GOAL {
            1.0
        } else {
            count as f32 / PLEDGE_GOAL as f32
        };
        // Integer half-up rounding; f32 misses exact halves such as 26.5%.
        let filled = count.min(PLEDGE_GOAL);
        let percentage = ((filled * 100 + PLEDGE_GOAL / 2) / PLEDGE_GOAL) as u8;

        Self {
            count,
            ratio,
            percentage,
            tier: Tier::from_ratio(ratio),
        }
    }

    /// Derives the fill state from an untrusted numeric count.
    ///
    /// Negative and non-finite values are treated as zero; fractional values
    /// are truncated towards zero.
    #[must_use]
    pub fn from_fractional_count(count: f64) -> Self {
        let count = if count.is_finite() && count > 0.0 {
            count.min(f64::from(u32::MAX)).floor() as u32
        } else {
            0
        };
        Self::from_count(count)
    }

    /// Pledge count the state was derived from.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Normalised fill ratio in `0.0..=1.0`.
    #[must_use]
    pub const fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Fill ratio rounded to a whole percentage in `0..=100`.
    #[must_use]
    pub const fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Status bucket selected by the fill ratio.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Number of 3D markers scattered around the lungs model.
    #[must_use]
    pub fn asset_marker_count(&self) -> u32 {
        markers_for_ratio(self.ratio, MAX_ASSET_MARKERS)
    }

    /// Number of decorative markers floating over the overlay.
    #[must_use]
    pub fn overlay_marker_count(&self) -> u32 {
        markers_for_ratio(self.ratio, MAX_OVERLAY_MARKERS)
    }
}

fn markers_for_ratio(ratio: f32, max: u32) -> u32 {
    (ratio.clamp(0.0, 1.0) * max as f32).floor() as u32
}

/// Applies a signed adjustment to a pledge count, saturating at both ends.
#[must_use]
pub fn adjust_pledges(count: u32, delta: i32) -> u32 {
    count.saturating_add_signed(delta)
}

/// Transform applied to the lungs model as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetTransform {
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation around the vertical axis, in radians.
    pub rotation_y: f32,
}

impl AssetTransform {
    /// Transform that leaves the model untouched.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation_y: 0.0,
    };
}

impl Default for AssetTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Uniform breathing scale at `elapsed` time since the animation started.
#[must_use]
pub fn breathing_scale(elapsed: Duration) -> f32 {
    1.0 + (elapsed.as_secs_f32() * BREATHING_FREQUENCY).sin() * BREATHING_AMPLITUDE
}

/// Sway rotation around the vertical axis at `elapsed` time since the animation started.
#[must_use]
pub fn sway_rotation(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * SWAY_FREQUENCY).sin() * SWAY_AMPLITUDE
}

/// Samples the breathing animation.
///
/// The result depends only on `elapsed`, so the animation can be restarted
/// from any point without accumulating drift.
#[must_use]
pub fn breathing_transform(elapsed: Duration) -> AssetTransform {
    AssetTransform {
        scale: breathing_scale(elapsed),
        rotation_y: sway_rotation(elapsed),
    }
}
