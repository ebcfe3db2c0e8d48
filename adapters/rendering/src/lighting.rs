//! CPU evaluation of the scene lighting rig.
//!
//! Backends without a lighting pipeline shade vertices with [`shade`] before
//! submitting them.

use glam::Vec3;

use crate::{scene::LightingRig, Color};

/// Lit color of a surface point with the provided base color.
///
/// `position` and `normal` are expressed in world space. The base alpha is
/// preserved so translucent surfaces stay translucent.
#[must_use]
pub fn shade(rig: &LightingRig, base: Color, position: Vec3, normal: Vec3) -> Color {
    let normal = normal.normalize_or_zero();
    let mut light = rig.ambient.color.rgb() * rig.ambient.intensity;

    let key_direction = rig.directional.position.normalize_or_zero();
    light += rig.directional.color.rgb() * rig.directional.intensity * lambert(normal, key_direction);

    let to_point = (rig.point.position - position).normalize_or_zero();
    light += rig.point.color.rgb() * rig.point.intensity * lambert(normal, to_point);

    let environment = rig.environment;
    let up = normal.y * 0.5 + 0.5;
    let hemisphere = environment
        .ground_color()
        .lerp(environment.sky_color(), up)
        .rgb();
    light += hemisphere * environment.intensity();

    Color::from_rgb_vec(base.rgb() * light, base.alpha)
}

fn lambert(normal: Vec3, to_light: Vec3) -> f32 {
    normal.dot(to_light).max(0.0)
}
