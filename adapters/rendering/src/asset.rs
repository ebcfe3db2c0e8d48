//! Loading and caching of the lungs model.
//!
//! The composer only sees [`SceneHandle`] values obtained through an
//! [`AssetSource`]. Handles are reference counted, so mounting the same model
//! in several scenes never copies vertex data.

use std::{
    collections::HashMap,
    f32::consts::{PI, TAU},
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::{Mat3, Mat4, Vec3};
use log::{debug, info, warn};
use thiserror::Error;

/// Reserved path resolving to the procedurally generated lungs model.
pub const BUILTIN_LUNGS: &str = "builtin:lungs";

/// Prefix shared by every reserved builtin path.
const BUILTIN_PREFIX: &str = "builtin:";

/// Errors reported while fetching a model.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The glTF importer rejected the file.
    #[error("failed to import model from {}", path.display())]
    Import {
        /// Path that failed to import.
        path: PathBuf,
        /// Underlying importer error.
        #[source]
        source: gltf::Error,
    },
    /// The file imported successfully but contained no triangles.
    #[error("model at {} contains no triangle meshes", path.display())]
    Empty {
        /// Path of the empty model.
        path: PathBuf,
    },
    /// A `builtin:` path named a model that does not exist.
    #[error("unknown builtin model `{name}`")]
    UnknownBuiltin {
        /// Name following the `builtin:` prefix.
        name: String,
    },
}

/// Triangle mesh with per-vertex normals, expressed in model space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit normals, one per position.
    pub normals: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of complete triangles described by the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Every mesh of a loaded model with node transforms already applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    /// Meshes in traversal order.
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Total triangle count across all meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }
}

/// Cheaply cloneable handle to a loaded model.
#[derive(Clone)]
pub struct SceneHandle {
    model: Arc<ModelData>,
}

impl SceneHandle {
    /// Wraps loaded model data in a shareable handle.
    #[must_use]
    pub fn new(model: ModelData) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Model data behind the handle.
    #[must_use]
    pub fn model(&self) -> &ModelData {
        &self.model
    }

    /// Returns `true` when both handles refer to the same loaded model.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }
}

impl PartialEq for SceneHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneHandle")
            .field("meshes", &self.model.meshes.len())
            .field("triangles", &self.model.triangle_count())
            .finish()
    }
}

/// Fetches a model by path.
pub trait AssetSource {
    /// Loads the model stored at `path`.
    fn fetch(&self, path: &Path) -> Result<SceneHandle, AssetError>;
}

/// Memoises an [`AssetSource`] by path.
#[derive(Debug)]
pub struct AssetCache<S> {
    source: S,
    entries: HashMap<PathBuf, SceneHandle>,
}

impl<S> AssetCache<S>
where
    S: AssetSource,
{
    /// Creates an empty cache in front of `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached handle for `path`, loading it from the source on first use.
    pub fn fetch(&mut self, path: impl AsRef<Path>) -> Result<SceneHandle, AssetError> {
        let path = path.as_ref();
        if let Some(handle) = self.entries.get(path) {
            debug!("asset cache hit for {}", path.display());
            return Ok(handle.clone());
        }

        let handle = self.source.fetch(path)?;
        let _ = self.entries.insert(path.to_path_buf(), handle.clone());
        Ok(handle)
    }

    /// Number of distinct paths loaded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads `.glb` and `.gltf` files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct GltfAssetSource;

impl AssetSource for GltfAssetSource {
    fn fetch(&self, path: &Path) -> Result<SceneHandle, AssetError> {
        let (document, buffers, _images) =
            gltf::import(path).map_err(|source| AssetError::Import {
                path: path.to_path_buf(),
                source,
            })?;

        let mut meshes = Vec::new();
        let roots: Vec<gltf::Node<'_>> = match document
            .default_scene()
            .or_else(|| document.scenes().next())
        {
            Some(scene) => scene.nodes().collect(),
            None => document.nodes().collect(),
        };
        for node in &roots {
            collect_node(node, Mat4::IDENTITY, &buffers, &mut meshes);
        }

        let model = ModelData { meshes };
        if model.triangle_count() == 0 {
            return Err(AssetError::Empty {
                path: path.to_path_buf(),
            });
        }

        info!(
            "loaded {} ({} meshes, {} triangles)",
            path.display(),
            model.meshes.len(),
            model.triangle_count()
        );
        Ok(SceneHandle::new(model))
    }
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "skipping primitive {} of mesh {}: unsupported mode {:?}",
                    primitive.index(),
                    mesh.index(),
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| {
                buffers
                    .get(buffer.index())
                    .map(|data| data.0.as_slice())
            });
            let positions: Vec<Vec3> = reader
                .read_positions()
                .map(|iter| {
                    iter.map(|position| world.transform_point3(Vec3::from(position)))
                        .collect()
                })
                .unwrap_or_default();
            if positions.is_empty() {
                continue;
            }

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());
            let normals: Vec<Vec3> = match reader.read_normals() {
                Some(iter) => iter
                    .map(|normal| (normal_matrix * Vec3::from(normal)).normalize_or_zero())
                    .collect(),
                None => compute_vertex_normals(&positions, &indices),
            };

            meshes.push(MeshData {
                positions,
                normals,
                indices,
            });
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, meshes);
    }
}

/// Area-weighted smooth normals for an indexed triangle list.
#[must_use]
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|index| index as usize);
        let (Some(&pa), Some(&pb), Some(&pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let face = (pb - pa).cross(pc - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|normal| normal.normalize_or_zero()).collect()
}

/// Procedurally generated models addressed by `builtin:` paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAssetSource;

impl AssetSource for BuiltinAssetSource {
    fn fetch(&self, path: &Path) -> Result<SceneHandle, AssetError> {
        let name = path.to_string_lossy();
        match name.strip_prefix(BUILTIN_PREFIX) {
            Some("lungs") => {
                let model = builtin_lungs();
                debug!("generated builtin lungs ({} triangles)", model.triangle_count());
                Ok(SceneHandle::new(model))
            }
            Some(other) => Err(AssetError::UnknownBuiltin {
                name: other.to_owned(),
            }),
            None => Err(AssetError::UnknownBuiltin {
                name: name.into_owned(),
            }),
        }
    }
}

/// Resolves `builtin:` paths procedurally and everything else through glTF.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAssetSource {
    builtin: BuiltinAssetSource,
    files: GltfAssetSource,
}

impl AssetSource for DefaultAssetSource {
    fn fetch(&self, path: &Path) -> Result<SceneHandle, AssetError> {
        if path.to_string_lossy().starts_with(BUILTIN_PREFIX) {
            self.builtin.fetch(path)
        } else {
            self.files.fetch(path)
        }
    }
}

fn builtin_lungs() -> ModelData {
    const RINGS: u32 = 24;
    const SEGMENTS: u32 = 32;

    ModelData {
        meshes: vec![
            ellipsoid(Vec3::new(-0.55, -0.1, 0.0), Vec3::new(0.45, 0.75, 0.3), RINGS, SEGMENTS),
            ellipsoid(Vec3::new(0.55, -0.1, 0.0), Vec3::new(0.42, 0.7, 0.3), RINGS, SEGMENTS),
            ellipsoid(Vec3::new(0.0, 0.75, 0.0), Vec3::new(0.08, 0.4, 0.08), 8, 16),
        ],
    }
}

fn ellipsoid(center: Vec3, radii: Vec3, rings: u32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let inverse_radii_squared = (radii * radii).recip();

    for ring in 0..=rings {
        let polar = PI * ring as f32 / rings as f32;
        for segment in 0..=segments {
            let azimuth = TAU * segment as f32 / segments as f32;
            let unit = Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            );
            let local = unit * radii;
            mesh.positions.push(center + local);
            mesh.normals
                .push((local * inverse_radii_squared).normalize_or_zero());
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let top = ring * stride + segment;
            let bottom = top + stride;
            mesh.indices
                .extend_from_slice(&[top, top + 1, bottom, top + 1, bottom + 1, bottom]);
        }
    }

    mesh
}
