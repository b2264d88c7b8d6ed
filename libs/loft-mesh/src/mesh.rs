//! # Mesh
//!
//! Quad-dominant mesh produced by stitching loops: vertex positions, faces
//! and the openings collected from loop annotations.

use config::constants::MAX_VERTICES;
use glam::DVec3;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{MeshError, MeshResult};

// =============================================================================
// FACE
// =============================================================================

/// A triangle or quad, by vertex index.
///
/// Serializes as a plain 3- or 4-element index array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Face {
    /// Pole fan triangle.
    Tri([u32; 3]),
    /// Bridge quad.
    Quad([u32; 4]),
}

impl Face {
    /// Vertex indices in winding order.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        match self {
            Face::Tri(i) => i,
            Face::Quad(i) => i,
        }
    }

    /// Returns the face with every index passed through `f`.
    pub fn map(self, mut f: impl FnMut(u32) -> u32) -> Self {
        match self {
            Face::Tri([a, b, c]) => Face::Tri([f(a), f(b), f(c)]),
            Face::Quad([a, b, c, d]) => Face::Quad([f(a), f(b), f(c), f(d)]),
        }
    }

    /// Returns the face shifted by `offset`.
    #[inline]
    pub fn offset(self, offset: u32) -> Self {
        self.map(|i| i + offset)
    }
}

// =============================================================================
// OPENING
// =============================================================================

/// A named boundary ring used to weld two meshes together.
///
/// Position `p` holds the global vertex index of rim vertex `p`, once it has
/// been registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    id: String,
    slots: Vec<Option<u32>>,
}

impl Opening {
    /// Creates an empty opening with `total` positions.
    pub fn new(id: impl Into<String>, total: usize) -> Self {
        Self {
            id: id.into(),
            slots: vec![None; total],
        }
    }

    /// Opening identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared number of rim positions.
    #[inline]
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Number of positions that have a vertex.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true once every position is filled.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub(crate) fn fill(&mut self, position: usize, index: u32) -> MeshResult<()> {
        let total = self.slots.len();
        let slot = self.slots.get_mut(position).ok_or_else(|| {
            MeshError::invalid_input(format!(
                "opening '{}' position {position} out of {total}",
                self.id
            ))
        })?;
        *slot = Some(index);
        Ok(())
    }

    /// Rim vertex indices in position order.
    ///
    /// # Errors
    ///
    /// [`MeshError::IncompleteOpening`] if any position is unfilled.
    pub fn indices(&self) -> MeshResult<Vec<u32>> {
        self.slots
            .iter()
            .copied()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MeshError::incomplete_opening(&self.id, self.filled(), self.total()))
    }

    pub(crate) fn offset(&self, offset: u32) -> Self {
        Self {
            id: self.id.clone(),
            slots: self.slots.iter().map(|s| s.map(|i| i + offset)).collect(),
        }
    }
}

// =============================================================================
// MESH
// =============================================================================

/// Output of the loop stitcher.
///
/// # Example
///
/// ```rust
/// use loft_mesh::{EdgeLoop, MeshBuilder};
/// use glam::DVec3;
///
/// let square = |z: f64| EdgeLoop::new(vec![
///     DVec3::new(0.0, 0.0, z),
///     DVec3::new(1.0, 0.0, z),
///     DVec3::new(1.0, 1.0, z),
///     DVec3::new(0.0, 1.0, z),
/// ]);
/// let mut builder = MeshBuilder::new();
/// builder.add_loop(square(0.0));
/// builder.add_loop(square(1.0));
/// let mesh = builder.build().unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.face_count(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    faces: Vec<Face>,
    openings: BTreeMap<String, Opening>,
}

impl Mesh {
    /// A mesh with no vertices, faces or openings.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        vertices: Vec<DVec3>,
        faces: Vec<Face>,
        openings: BTreeMap<String, Opening>,
    ) -> Self {
        Self {
            vertices,
            faces,
            openings,
        }
    }

    /// Vertex count, after culling.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Face count.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when no vertex survived.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Positions in global index order.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Faces in stitch order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Registered openings, keyed by id.
    #[inline]
    pub fn openings(&self) -> &BTreeMap<String, Opening> {
        &self.openings
    }

    /// Looks up one opening.
    pub fn opening(&self, id: &str) -> Option<&Opening> {
        self.openings.get(id)
    }

    pub(crate) fn into_parts(self) -> (Vec<DVec3>, Vec<Face>, BTreeMap<String, Opening>) {
        (self.vertices, self.faces, self.openings)
    }

    /// Lowest and highest corner over all vertices; both zero when empty.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some(first) = self.vertices.first() else {
            return Default::default();
        };
        self.vertices[1..]
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Checks the vertex ceiling, that every face index is in range and
    /// that no face names a vertex twice.
    pub fn validate(&self) -> MeshResult<()> {
        if self.vertices.len() > MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                count: self.vertices.len(),
                max: MAX_VERTICES,
            });
        }
        let count = self.vertices.len() as u32;
        for (n, face) in self.faces.iter().enumerate() {
            let idx = face.indices();
            if idx.iter().any(|&i| i >= count) {
                return Err(MeshError::invalid_input(format!(
                    "face {n} references a vertex outside 0..{count}"
                )));
            }
            for (k, a) in idx.iter().enumerate() {
                if idx[k + 1..].contains(a) {
                    return Err(MeshError::invalid_input(format!(
                        "face {n} repeats vertex {a}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_indices() {
        assert_eq!(Face::Quad([0, 1, 2, 3]).indices(), &[0, 1, 2, 3]);
        assert_eq!(Face::Tri([4, 5, 6]).indices(), &[4, 5, 6]);
    }

    #[test]
    fn test_face_offset() {
        assert_eq!(Face::Tri([0, 1, 2]).offset(10), Face::Tri([10, 11, 12]));
    }

    #[test]
    fn test_opening_completion() {
        let mut opening = Opening::new("spout", 3);
        assert!(!opening.is_complete());
        opening.fill(0, 7).unwrap();
        opening.fill(2, 9).unwrap();
        assert_eq!(opening.filled(), 2);
        assert!(matches!(
            opening.indices(),
            Err(MeshError::IncompleteOpening { filled: 2, total: 3, .. })
        ));
        opening.fill(1, 8).unwrap();
        assert_eq!(opening.indices().unwrap(), vec![7, 8, 9]);
        assert!(opening.fill(3, 1).is_err());
    }

    #[test]
    fn test_bounding_box() {
        let mesh = Mesh::from_parts(
            vec![DVec3::new(-1.0, 2.0, 0.0), DVec3::new(3.0, -4.0, 5.0)],
            Vec::new(),
            BTreeMap::new(),
        );
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -4.0, 0.0));
        assert_eq!(max, DVec3::new(3.0, 2.0, 5.0));
        let empty = Mesh::from_parts(Vec::new(), Vec::new(), BTreeMap::new());
        assert_eq!(empty.bounding_box(), (DVec3::ZERO, DVec3::ZERO));
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let verts = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let ok = Mesh::from_parts(verts.clone(), vec![Face::Tri([0, 1, 2])], BTreeMap::new());
        assert!(ok.validate().is_ok());
        let out_of_range =
            Mesh::from_parts(verts.clone(), vec![Face::Tri([0, 1, 3])], BTreeMap::new());
        assert!(out_of_range.validate().is_err());
        let repeated = Mesh::from_parts(verts, vec![Face::Tri([0, 1, 1])], BTreeMap::new());
        assert!(repeated.validate().is_err());
    }
}
