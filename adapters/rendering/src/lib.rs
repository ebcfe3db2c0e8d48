#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Pledge Lungs adapters.
//!
//! The types in this crate describe *what* should appear on screen without
//! committing to a graphics library. Backends implement [`RenderingBackend`]
//! and translate a [`Frame`] into draw calls once per rendered frame.

pub mod asset;
pub mod lighting;
pub mod overlay;
pub mod scene;

use anyhow::Result as AnyResult;
use glam::Vec3;
use std::time::Duration;

pub use asset::{
    AssetCache, AssetError, AssetSource, BuiltinAssetSource, DefaultAssetSource, GltfAssetSource,
    MeshData, ModelData, SceneHandle, BUILTIN_LUNGS,
};
pub use overlay::{compose_overlay, Overlay, OverlayMarker, ProgressBar, TierMessage};
pub use scene::{compose_scene, Camera, LightingRig, Marker, Scene, SceneAsset, SurfaceStyle};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates a color from hue (degrees), saturation and lightness (both 0.0..=1.0).
    #[must_use]
    pub fn from_hsla(hue_degrees: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let sector = hue_degrees.rem_euclid(360.0) / 60.0;
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let secondary = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (red, green, blue) = match sector as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };
        let offset = lightness - chroma * 0.5;

        Self::new(red + offset, green + offset, blue + offset, alpha)
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Linearly interpolates every channel towards `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: f32, to: f32| from + (to - from) * t;

        Self {
            red: mix(self.red, other.red),
            green: mix(self.green, other.green),
            blue: mix(self.blue, other.blue),
            alpha: mix(self.alpha, other.alpha),
        }
    }

    /// RGB channels as a vector, discarding alpha.
    #[must_use]
    pub fn rgb(self) -> Vec3 {
        Vec3::new(self.red, self.green, self.blue)
    }

    /// Builds a color from an RGB vector, clamping each channel.
    #[must_use]
    pub fn from_rgb_vec(rgb: Vec3, alpha: f32) -> Self {
        let rgb = rgb.clamp(Vec3::ZERO, Vec3::ONE);
        Self::new(rgb.x, rgb.y, rgb.z, alpha)
    }
}

/// Vertical two-stop gradient painted behind the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    /// Color at the top edge of the render region.
    pub top: Color,
    /// Color at the bottom edge of the render region.
    pub bottom: Color,
}

impl Gradient {
    /// Background used by the visualiser.
    pub const NIGHT_SKY: Self = Self {
        top: Color::from_rgb_u8(0x0f, 0x17, 0x2a),
        bottom: Color::from_rgb_u8(0x1e, 0x3a, 0x5f),
    };

    /// Color at the normalised height `t` measured from the top edge.
    #[must_use]
    pub fn color_at(&self, t: f32) -> Color {
        self.top.lerp(self.bottom, t)
    }
}

/// Input snapshot gathered by adapters before updating the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Signed pledge adjustment requested during this frame.
    pub pledge_delta: i32,
}

/// Everything a backend draws on a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// 3D scene containing the lungs model and markers.
    pub scene: Scene,
    /// Screen-space overlay drawn above the scene.
    pub overlay: Overlay,
}

impl Frame {
    /// Creates a new frame descriptor.
    #[must_use]
    pub fn new(scene: Scene, overlay: Overlay) -> Self {
        Self { scene, overlay }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window width in pixels; the render region follows the window width.
    pub window_width: u32,
    /// Fixed height of the render region in pixels.
    pub window_height: u32,
    /// Gradient painted before each frame.
    pub background: Gradient,
    /// Frame content that should be displayed first.
    pub frame: Frame,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        window_width: u32,
        window_height: u32,
        background: Gradient,
        frame: Frame,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_width,
            window_height,
            background,
            frame,
        }
    }
}

/// Rendering backend capable of presenting Pledge Lungs frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_frame` closure receives the time elapsed since the
    /// loop started and per-frame input captured by the adapter, and may
    /// replace or mutate the frame before it is drawn.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Frame) + 'static;
}
