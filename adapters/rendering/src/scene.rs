//! Scene composition for the lungs model and its fill markers.

use glam::{Mat4, Vec3};
use log::debug;
use pledge_lungs_core::{AssetTransform, ProgressState};
use rand::Rng;

use crate::{asset::SceneHandle, Color};

/// Half extents of the volume markers are scattered in, centred on the origin.
pub const MARKER_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.75, 0.25);

/// Perspective camera looking at the lungs model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position in world units.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
}

impl Camera {
    /// Fixed camera used by every composed scene.
    pub const FIXED: Self = Self {
        position: Vec3::new(0.0, 0.0, 5.0),
        target: Vec3::ZERO,
        fov_y_degrees: 50.0,
    };
}

/// Uniform light applied to every surface regardless of orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    /// Light color.
    pub color: Color,
    /// Scalar multiplier applied to the color.
    pub intensity: f32,
}

/// Light arriving from an infinitely distant source along `position -> origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Position the light shines from; only its direction matters.
    pub position: Vec3,
    /// Light color.
    pub color: Color,
    /// Scalar multiplier applied to the color.
    pub intensity: f32,
}

/// Omnidirectional light emitted from a single position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    /// Light position in world units.
    pub position: Vec3,
    /// Tint of the emitted light.
    pub color: Color,
    /// Scalar multiplier applied to the color.
    pub intensity: f32,
}

/// Preset hemispheric fill light approximating an environment map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvironmentPreset {
    /// Cool sky above, warm ground below.
    City,
}

impl EnvironmentPreset {
    /// Color contributed to surfaces facing straight up.
    #[must_use]
    pub const fn sky_color(self) -> Color {
        match self {
            Self::City => Color::from_rgb_u8(0xbf, 0xd4, 0xf2),
        }
    }

    /// Color contributed to surfaces facing straight down.
    #[must_use]
    pub const fn ground_color(self) -> Color {
        match self {
            Self::City => Color::from_rgb_u8(0x5a, 0x4e, 0x44),
        }
    }

    /// Scalar multiplier applied to the hemispheric fill.
    #[must_use]
    pub const fn intensity(self) -> f32 {
        match self {
            Self::City => 0.3,
        }
    }
}

/// Fixed lighting arrangement surrounding the model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingRig {
    /// Uniform fill light.
    pub ambient: AmbientLight,
    /// Key light.
    pub directional: DirectionalLight,
    /// Tinted rim light placed behind and below the model.
    pub point: PointLight,
    /// Environment fill preset.
    pub environment: EnvironmentPreset,
}

impl LightingRig {
    /// Lighting used by every composed scene.
    pub const STUDIO: Self = Self {
        ambient: AmbientLight {
            color: Color::WHITE,
            intensity: 0.5,
        },
        directional: DirectionalLight {
            position: Vec3::new(10.0, 10.0, 5.0),
            color: Color::WHITE,
            intensity: 1.0,
        },
        point: PointLight {
            position: Vec3::new(-10.0, -10.0, -10.0),
            color: Color::from_rgb_u8(0x4a, 0xde, 0x80),
            intensity: 0.5,
        },
        environment: EnvironmentPreset::City,
    };
}

/// Material applied to every surface of the lungs model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceStyle {
    /// Hue in degrees.
    pub hue_degrees: f32,
    /// Saturation in 0.0..=1.0.
    pub saturation: f32,
    /// Lightness in 0.0..=1.0.
    pub lightness: f32,
    /// Opacity in 0.0..=1.0.
    pub opacity: f32,
    /// Whether surfaces are blended with what lies behind them.
    pub translucent: bool,
}

impl SurfaceStyle {
    /// Saturation shared by every fill level.
    pub const SATURATION: f32 = 0.7;

    /// Derives the surface material for a fill ratio. The hue moves from green
    /// (120°) to cyan (180°) and the surface brightens as the lungs fill up.
    #[must_use]
    pub fn from_ratio(ratio: f32) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);

        Self {
            hue_degrees: 120.0 + ratio * 60.0,
            saturation: Self::SATURATION,
            lightness: (40.0 + ratio * 20.0) / 100.0,
            opacity: 0.8 + ratio * 0.2,
            translucent: true,
        }
    }

    /// Unlit base color including opacity.
    #[must_use]
    pub fn color(&self) -> Color {
        Color::from_hsla(
            self.hue_degrees,
            self.saturation,
            self.lightness,
            self.opacity,
        )
    }
}

/// Small emissive sphere scattered around the model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Centre of the sphere in world units.
    pub position: Vec3,
}

/// Appearance shared by every 3D marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Sphere radius in world units.
    pub radius: f32,
    /// Emitted color; markers ignore scene lighting.
    pub color: Color,
}

impl MarkerStyle {
    /// Style used by every composed scene.
    pub const GLOW: Self = Self {
        radius: 0.02,
        color: Color::from_rgb_u8(0x86, 0xef, 0xac),
    };
}

/// The lungs model together with its material and animated transform.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneAsset {
    /// Shared handle to the loaded model.
    pub handle: SceneHandle,
    /// Material applied to every surface.
    pub style: SurfaceStyle,
    /// Current animation transform.
    pub transform: AssetTransform,
}

impl SceneAsset {
    /// Model matrix for the current transform.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        transform_matrix(self.transform)
    }
}

/// Converts an animation transform into a model matrix.
#[must_use]
pub fn transform_matrix(transform: AssetTransform) -> Mat4 {
    Mat4::from_rotation_y(transform.rotation_y) * Mat4::from_scale(Vec3::splat(transform.scale))
}

/// Renderable 3D scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewpoint.
    pub camera: Camera,
    /// Lights illuminating the model.
    pub lighting: LightingRig,
    /// Lungs model.
    pub asset: SceneAsset,
    /// Markers scattered around the model; regenerated on every composition.
    pub markers: Vec<Marker>,
    /// Appearance shared by every marker.
    pub marker_style: MarkerStyle,
}

/// Composes the scene for a fill state.
///
/// Marker positions are drawn from `rng` on every call, so two compositions
/// of the same state only agree on the marker count.
pub fn compose_scene<R>(progress: &ProgressState, asset: SceneHandle, rng: &mut R) -> Scene
where
    R: Rng + ?Sized,
{
    let markers = scatter_markers(progress.asset_marker_count(), rng);
    debug!(
        "composed scene for {} pledges with {} markers",
        progress.count(),
        markers.len()
    );

    Scene {
        camera: Camera::FIXED,
        lighting: LightingRig::STUDIO,
        asset: SceneAsset {
            handle: asset,
            style: SurfaceStyle::from_ratio(progress.ratio()),
            transform: AssetTransform::IDENTITY,
        },
        markers,
        marker_style: MarkerStyle::GLOW,
    }
}

/// Places `count` markers uniformly inside the marker volume.
pub fn scatter_markers<R>(count: u32, rng: &mut R) -> Vec<Marker>
where
    R: Rng + ?Sized,
{
    let extents = MARKER_HALF_EXTENTS;
    (0..count)
        .map(|_| Marker {
            position: Vec3::new(
                rng.gen_range(-extents.x..=extents.x),
                rng.gen_range(-extents.y..=extents.y),
                rng.gen_range(-extents.z..=extents.z),
            ),
        })
        .collect()
}
