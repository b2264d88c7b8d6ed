//! # Object Records
//!
//! The JSON document handed to the host application: one record per
//! object, with rounded vertex coordinates, faces as bare index arrays and
//! the indices of faces whose winding the host must invert.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use config::constants::round_to_precision;
use glam::DVec3;
use loft_mesh::{Face, Mesh};
use serde::Serialize;
use tracing::info;

use crate::error::GenResult;

/// One named object in the output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectRecord {
    /// Display name.
    pub name: String,
    /// Vertex positions rounded to the output precision.
    pub verts: Vec<[f64; 3]>,
    /// Loose edges. Vessels never carry any.
    pub edges: Vec<[u32; 2]>,
    /// Triangles and quads.
    pub faces: Vec<Face>,
    /// Object origin in the host scene.
    pub location: [f64; 3],
    /// Faces whose winding the host inverts.
    #[serde(rename = "flipFaces")]
    pub flip_faces: Vec<usize>,
}

impl ObjectRecord {
    /// Builds a record, rounding every coordinate exactly once.
    pub fn from_mesh(
        name: impl Into<String>,
        mesh: &Mesh,
        location: DVec3,
        flip_faces: impl IntoIterator<Item = usize>,
    ) -> Self {
        let verts = mesh
            .vertices()
            .iter()
            .map(|v| {
                [
                    round_to_precision(v.x),
                    round_to_precision(v.y),
                    round_to_precision(v.z),
                ]
            })
            .collect();
        Self {
            name: name.into(),
            verts,
            edges: Vec::new(),
            faces: mesh.faces().to_vec(),
            location: location.to_array(),
            flip_faces: flip_faces.into_iter().collect(),
        }
    }

    /// Number of faces in the record.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Serializes records as a JSON array.
pub fn to_json(records: &[ObjectRecord]) -> GenResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Writes records as a JSON array to `writer`.
pub fn write_records<W: Write>(records: &[ObjectRecord], writer: W) -> GenResult<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Writes records to a file, replacing any previous content.
pub fn write_records_to_path(records: &[ObjectRecord], path: impl AsRef<Path>) -> GenResult<()> {
    let path = path.as_ref();
    write_records(records, File::create(path)?)?;
    info!(path = %path.display(), objects = records.len(), "wrote object records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loft_mesh::{EdgeLoop, MeshBuilder};
    use serde_json::Value;

    fn two_squares() -> Mesh {
        let square = |z: f64| {
            EdgeLoop::new(vec![
                DVec3::new(0.0, 0.0, z),
                DVec3::new(1.0, 0.0, z),
                DVec3::new(1.0, 1.0, z),
                DVec3::new(0.0, 1.0, z),
            ])
        };
        let mut builder = MeshBuilder::new();
        builder.add_loop(square(0.0)).add_loop(square(1.000000004));
        builder.build().unwrap()
    }

    #[test]
    fn test_from_mesh_rounds_once() {
        let record = ObjectRecord::from_mesh("Box", &two_squares(), DVec3::ZERO, 0..1);
        assert_eq!(record.verts.len(), 8);
        assert_eq!(record.verts[4][2], 1.0);
        assert!(record.edges.is_empty());
        assert_eq!(record.flip_faces, vec![0]);
    }

    #[test]
    fn test_json_field_names() {
        let record = ObjectRecord::from_mesh("Box", &two_squares(), DVec3::X, Vec::new());
        let json: Value = serde_json::from_str(&to_json(&[record]).unwrap()).unwrap();
        let object = &json[0];
        assert_eq!(object["name"], "Box");
        assert!(object.get("flipFaces").is_some());
        assert!(object.get("flip_faces").is_none());
        assert_eq!(object["location"], serde_json::json!([1.0, 0.0, 0.0]));
        assert_eq!(object["faces"][0], serde_json::json!([0, 1, 2, 3]));
        assert_eq!(object["faces"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_write_records_to_writer() {
        let record = ObjectRecord::from_mesh("Box", &two_squares(), DVec3::ZERO, 0..1);
        let mut out = Vec::new();
        write_records(&[record], &mut out).unwrap();
        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
    }
}
