//! Conversion of the lungs model into Macroquad meshes.
//!
//! Macroquad has no lighting pipeline and its meshes use 16-bit indices, so
//! the model is transformed and shaded on the CPU every frame, then split into
//! batches that fit the index range.

use glam::Vec3;
use macroquad::{
    math::{vec2, vec3},
    models::{Mesh, Vertex},
};
use pledge_lungs_rendering::{lighting::shade, Color, LightingRig, SceneAsset};

use crate::to_macroquad_color;

/// Largest vertex count addressable by a single Macroquad mesh, rounded down to whole triangles.
pub(crate) const MAX_BATCH_VERTICES: usize = (u16::MAX as usize / 3) * 3;

/// World-space vertex with its lit color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShadedVertex {
    pub(crate) position: Vec3,
    pub(crate) color: Color,
}

/// Flattens the model into a lit, world-space triangle list.
pub(crate) fn shade_asset(asset: &SceneAsset, rig: &LightingRig) -> Vec<ShadedVertex> {
    let matrix = asset.model_matrix();
    let base = asset.style.color();
    let model = asset.handle.model();
    let mut vertices = Vec::with_capacity(model.triangle_count() * 3);

    for mesh in &model.meshes {
        for triangle in mesh.indices.chunks_exact(3) {
            let corners = [triangle[0], triangle[1], triangle[2]].map(|index| index as usize);
            if corners
                .iter()
                .any(|&index| index >= mesh.positions.len() || index >= mesh.normals.len())
            {
                continue;
            }

            for index in corners {
                let position = matrix.transform_point3(mesh.positions[index]);
                let normal = matrix.transform_vector3(mesh.normals[index]);
                vertices.push(ShadedVertex {
                    position,
                    color: shade(rig, base, position, normal),
                });
            }
        }
    }

    vertices
}

/// Packs a triangle list into meshes that respect Macroquad's index range.
pub(crate) fn batch_meshes(vertices: &[ShadedVertex]) -> Vec<Mesh> {
    vertices
        .chunks(MAX_BATCH_VERTICES)
        .map(|batch| Mesh {
            vertices: batch
                .iter()
                .map(|vertex| Vertex {
                    position: vec3(vertex.position.x, vertex.position.y, vertex.position.z),
                    uv: vec2(0.0, 0.0),
                    color: to_macroquad_color(vertex.color),
                })
                .collect(),
            indices: (0..batch.len() as u16).collect(),
            texture: None,
        })
        .collect()
}
