//! # Vertex Culler
//!
//! Removes culled slots after stitching. Faces touching a culled slot are
//! dropped and the surviving indices are compacted.

use glam::DVec3;
use tracing::debug;

use crate::edge_loop::{OpeningTag, VertexSlot};
use crate::mesh::Face;

/// Compacted vertices, tags and faces.
#[derive(Debug, Clone, Default)]
pub struct CulledMesh {
    /// Live vertex positions.
    pub vertices: Vec<DVec3>,
    /// Opening annotations, parallel to `vertices`.
    pub tags: Vec<OpeningTag>,
    /// Faces with remapped indices.
    pub faces: Vec<Face>,
}

/// Stateless culling pass.
pub struct VertexCuller;

impl VertexCuller {
    /// Drops culled slots and every face that references one.
    ///
    /// A surviving index `i` becomes `i - k`, where `k` is the number of
    /// culled slots before it.
    pub fn cull(slots: Vec<VertexSlot>, tags: Vec<OpeningTag>, faces: Vec<Face>) -> CulledMesh {
        let mut remap = Vec::with_capacity(slots.len());
        let mut vertices = Vec::with_capacity(slots.len());
        let mut kept_tags = Vec::with_capacity(tags.len());
        for (slot, tag) in slots.into_iter().zip(tags) {
            match slot {
                VertexSlot::Present(p) => {
                    remap.push(Some(vertices.len() as u32));
                    vertices.push(p);
                    kept_tags.push(tag);
                }
                VertexSlot::Culled => remap.push(None),
            }
        }

        let culled = remap.len() - vertices.len();
        if culled == 0 {
            return CulledMesh {
                vertices,
                tags: kept_tags,
                faces,
            };
        }

        let before = faces.len();
        let faces: Vec<Face> = faces
            .into_iter()
            .filter_map(|face| {
                let live = face
                    .indices()
                    .iter()
                    .all(|&i| matches!(remap.get(i as usize), Some(Some(_))));
                live.then(|| face.map(|i| remap[i as usize].unwrap_or(i)))
            })
            .collect();
        debug!(
            culled,
            dropped_faces = before - faces.len(),
            "culled vertices"
        );

        CulledMesh {
            vertices,
            tags: kept_tags,
            faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(n: usize) -> Vec<VertexSlot> {
        (0..n)
            .map(|i| VertexSlot::Present(DVec3::new(i as f64, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_no_culling_is_identity() {
        let faces = vec![Face::Quad([0, 1, 2, 3])];
        let out = VertexCuller::cull(slots(4), vec![OpeningTag::Boundary; 4], faces.clone());
        assert_eq!(out.vertices.len(), 4);
        assert_eq!(out.faces, faces);
    }

    #[test]
    fn test_culled_indices_are_compacted() {
        let mut s = slots(6);
        s[1] = VertexSlot::Culled;
        s[3] = VertexSlot::Culled;
        let faces = vec![
            Face::Tri([0, 1, 2]),
            Face::Tri([0, 2, 4]),
            Face::Quad([2, 4, 5, 0]),
            Face::Tri([3, 4, 5]),
        ];
        let out = VertexCuller::cull(s, vec![OpeningTag::Boundary; 6], faces);
        assert_eq!(out.vertices.len(), 4);
        assert_eq!(out.vertices[2], DVec3::new(4.0, 0.0, 0.0));
        assert_eq!(
            out.faces,
            vec![Face::Tri([0, 1, 2]), Face::Quad([1, 2, 3, 0])]
        );
    }

    #[test]
    fn test_no_face_references_removed_or_out_of_range() {
        let mut s = slots(10);
        for i in [0, 4, 9] {
            s[i] = VertexSlot::Culled;
        }
        let faces: Vec<Face> = (0..9)
            .map(|i| Face::Tri([i, (i + 1) % 10, (i + 2) % 10]))
            .collect();
        let out = VertexCuller::cull(s, vec![OpeningTag::Boundary; 10], faces);
        let count = out.vertices.len() as u32;
        assert_eq!(count, 7);
        for face in &out.faces {
            assert!(face.indices().iter().all(|&i| i < count));
        }
    }

    #[test]
    fn test_tags_follow_their_vertices() {
        let mut s = slots(3);
        s[0] = VertexSlot::Culled;
        let tags = vec![
            OpeningTag::Boundary,
            OpeningTag::Opening {
                id: "rim".into(),
                position: 0,
                total: 1,
            },
            OpeningTag::Boundary,
        ];
        let out = VertexCuller::cull(s, tags, Vec::new());
        assert!(matches!(out.tags[0], OpeningTag::Opening { .. }));
        assert_eq!(out.tags.len(), 2);
    }
}
