use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use glam::Vec3;
use pledge_lungs_rendering::{AssetError, AssetSource, DefaultAssetSource, GltfAssetSource};
use tempfile::TempDir;

const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;

/// Quaternion for a quarter turn around +Y, in glTF `[x, y, z, w]` order.
const QUARTER_TURN_Y: &str = "[0.0, 0.70710677, 0.0, 0.70710677]";

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

fn vec3_bytes(values: &[[f32; 3]]) -> Vec<u8> {
    values
        .iter()
        .flatten()
        .flat_map(|component| component.to_le_bytes())
        .collect()
}

fn vec3_accessor(view: usize, min: [f32; 3], max: [f32; 3]) -> String {
    format!(
        r#"{{ "bufferView": {view}, "componentType": {FLOAT}, "count": 3, "type": "VEC3",
              "min": {min:?}, "max": {max:?} }}"#
    )
}

fn buffer_view(offset: usize, length: usize) -> String {
    format!(r#"{{ "buffer": 0, "byteOffset": {offset}, "byteLength": {length} }}"#)
}

/// Writes a single-mesh `.gltf` with its buffer embedded as a data URI.
fn write_gltf(
    dir: &TempDir,
    name: &str,
    buffer: &[u8],
    buffer_views: &[String],
    accessors: &[String],
    primitive: &str,
    nodes: &str,
) -> PathBuf {
    let document = format!(
        r#"{{
            "asset": {{ "version": "2.0" }},
            "scene": 0,
            "scenes": [{{ "nodes": [0] }}],
            "nodes": {nodes},
            "meshes": [{{ "primitives": [{primitive}] }}],
            "buffers": [{{
                "byteLength": {length},
                "uri": "data:application/octet-stream;base64,{encoded}"
            }}],
            "bufferViews": [{views}],
            "accessors": [{accessors}]
        }}"#,
        length = buffer.len(),
        encoded = STANDARD.encode(buffer),
        views = buffer_views.join(", "),
        accessors = accessors.join(", "),
    );

    let path = dir.path().join(name);
    std::fs::write(&path, document).expect("gltf document written");
    path
}

fn assert_vec3_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-5,
        "expected {expected:?}, got {actual:?}",
    );
}

#[test]
fn indexed_triangle_bakes_nested_node_transforms() {
    let dir = TempDir::new().expect("temp dir");
    let mut buffer = vec3_bytes(&TRIANGLE);
    buffer.extend(vec3_bytes(&[[0.0, 0.0, 1.0]; 3]));
    buffer.extend([0_u16, 1, 2].iter().flat_map(|index| index.to_le_bytes()));
    buffer.extend([0, 0]);

    let path = write_gltf(
        &dir,
        "lungs.gltf",
        &buffer,
        &[buffer_view(0, 36), buffer_view(36, 36), buffer_view(72, 6)],
        &[
            vec3_accessor(0, [0.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
            vec3_accessor(1, [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
            format!(
                r#"{{ "bufferView": 2, "componentType": {UNSIGNED_SHORT}, "count": 3, "type": "SCALAR" }}"#
            ),
        ],
        r#"{ "attributes": { "POSITION": 0, "NORMAL": 1 }, "indices": 2 }"#,
        &format!(
            r#"[
                {{ "translation": [1.0, 2.0, 3.0], "children": [1] }},
                {{ "mesh": 0, "rotation": {QUARTER_TURN_Y}, "scale": [2.0, 2.0, 2.0] }}
            ]"#
        ),
    );

    let handle = GltfAssetSource.fetch(&path).expect("triangle imports");
    let model = handle.model();

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.triangle_count(), 1);
    let mesh = &model.meshes[0];
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_vec3_close(mesh.positions[0], Vec3::new(1.0, 2.0, 3.0));
    assert_vec3_close(mesh.positions[1], Vec3::new(1.0, 2.0, 1.0));
    assert_vec3_close(mesh.positions[2], Vec3::new(1.0, 4.0, 3.0));
    for normal in &mesh.normals {
        assert_vec3_close(*normal, Vec3::X);
    }
}

#[test]
fn missing_normals_and_indices_are_derived() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_gltf(
        &dir,
        "bare.gltf",
        &vec3_bytes(&TRIANGLE),
        &[buffer_view(0, 36)],
        &[vec3_accessor(0, [0.0, 0.0, 0.0], [1.0, 1.0, 0.0])],
        r#"{ "attributes": { "POSITION": 0 } }"#,
        r#"[{ "mesh": 0, "translation": [0.0, 0.0, 2.0] }]"#,
    );

    let handle = DefaultAssetSource::default()
        .fetch(&path)
        .expect("non-indexed triangle imports");
    let mesh = &handle.model().meshes[0];

    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_vec3_close(mesh.positions[1], Vec3::new(1.0, 0.0, 2.0));
    assert_eq!(mesh.normals.len(), 3);
    for normal in &mesh.normals {
        assert_vec3_close(*normal, Vec3::Z);
    }
}

#[test]
fn point_clouds_are_rejected_as_empty() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_gltf(
        &dir,
        "points.gltf",
        &vec3_bytes(&TRIANGLE),
        &[buffer_view(0, 36)],
        &[vec3_accessor(0, [0.0, 0.0, 0.0], [1.0, 1.0, 0.0])],
        r#"{ "attributes": { "POSITION": 0 }, "mode": 0 }"#,
        r#"[{ "mesh": 0 }]"#,
    );

    let error = GltfAssetSource
        .fetch(&path)
        .expect_err("points carry no triangles");

    assert!(
        matches!(&error, AssetError::Empty { path: empty } if empty == &path),
        "unexpected error {error:?}",
    );
}

#[test]
fn malformed_documents_report_an_import_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.gltf");
    std::fs::write(&path, "{ not json").expect("broken document written");

    let error = GltfAssetSource
        .fetch(Path::new(&path))
        .expect_err("invalid json cannot import");

    assert!(matches!(error, AssetError::Import { .. }));
}
