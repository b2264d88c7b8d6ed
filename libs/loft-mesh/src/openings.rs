//! # Openings
//!
//! Openings are named boundary rings recorded on vertices while loops are
//! built. After stitching they are collected into index lists, and two
//! meshes can be welded by bridging matching openings with quads.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::edge_loop::OpeningTag;
use crate::error::{MeshError, MeshResult};
use crate::mesh::{Face, Mesh, Opening};

// =============================================================================
// REGISTRY
// =============================================================================

/// Collects opening annotations into [`Opening`]s.
pub struct OpeningRegistry;

impl OpeningRegistry {
    /// Builds one opening per id from per-vertex tags.
    ///
    /// `tags[i]` annotates global vertex `i`. Positions that no vertex
    /// claims stay empty, which makes the opening incomplete.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidInput`] if one id is declared with two different
    /// totals or a position lies outside its total.
    pub fn collect(tags: &[OpeningTag]) -> MeshResult<BTreeMap<String, Opening>> {
        let mut openings: BTreeMap<String, Opening> = BTreeMap::new();
        for (index, tag) in tags.iter().enumerate() {
            let OpeningTag::Opening {
                id,
                position,
                total,
            } = tag
            else {
                continue;
            };
            let opening = openings
                .entry(id.clone())
                .or_insert_with(|| Opening::new(id.clone(), *total));
            if opening.total() != *total {
                return Err(MeshError::invalid_input(format!(
                    "opening '{id}' declared with totals {} and {total}",
                    opening.total()
                )));
            }
            opening.fill(*position, index as u32)?;
        }
        for opening in openings.values().filter(|o| !o.is_complete()) {
            debug!(
                id = opening.id(),
                filled = opening.filled(),
                total = opening.total(),
                "opening left incomplete"
            );
        }
        Ok(openings)
    }
}

// =============================================================================
// JOINER
// =============================================================================

/// One opening to weld: its id, and whether host and guest swap roles in
/// the bridging quads (flips the winding of the seam).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSpec<'a> {
    /// Opening id present on both meshes.
    pub id: &'a str,
    /// Swap host and guest when emitting the seam quads.
    pub reversed: bool,
}

impl<'a> JoinSpec<'a> {
    /// Seam with host-to-guest winding.
    pub fn new(id: &'a str) -> Self {
        Self {
            id,
            reversed: false,
        }
    }

    /// Seam with guest-to-host winding.
    pub fn reversed(id: &'a str) -> Self {
        Self { id, reversed: true }
    }
}

/// Welds meshes along shared openings.
pub struct MeshJoiner;

impl MeshJoiner {
    /// Appends `guest` to `host` and bridges each listed opening.
    ///
    /// Guest indices and openings are shifted by the host's vertex count. For
    /// every rim position `j` one quad `(A[j], A[j+1], B[j+1], B[j])` is
    /// emitted, with `A` the host rim and `B` the guest rim (swapped when the
    /// spec is reversed). Consumed openings are removed from the result;
    /// the rest are kept.
    ///
    /// # Errors
    ///
    /// - [`MeshError::IncompleteOpening`] if an opening is missing or unfilled
    /// - [`MeshError::ShapeMismatch`] if the two rims differ in size
    pub fn join(host: Mesh, guest: &Mesh, specs: &[JoinSpec<'_>]) -> MeshResult<Mesh> {
        let shift = host.vertex_count() as u32;
        let (mut vertices, mut faces, mut openings) = host.into_parts();

        let mut seams = Vec::with_capacity(specs.len());
        for spec in specs {
            let host_rim = rim(&openings, spec.id)?;
            let guest_rim: Vec<u32> = rim(guest.openings(), spec.id)?
                .into_iter()
                .map(|i| i + shift)
                .collect();
            if host_rim.len() != guest_rim.len() {
                return Err(MeshError::shape_mismatch(
                    host_rim.len(),
                    guest_rim.len(),
                    format!("opening '{}' differs between meshes", spec.id),
                ));
            }
            seams.push(if spec.reversed {
                (guest_rim, host_rim)
            } else {
                (host_rim, guest_rim)
            });
        }

        vertices.extend_from_slice(guest.vertices());
        faces.extend(guest.faces().iter().map(|f| f.offset(shift)));
        for (id, opening) in guest.openings() {
            openings.insert(id.clone(), opening.offset(shift));
        }

        let mut seam_quads = 0;
        for (a, b) in &seams {
            let n = a.len();
            for j in 0..n {
                let k = (j + 1) % n;
                faces.push(Face::Quad([a[j], a[k], b[k], b[j]]));
            }
            seam_quads += n;
        }
        for spec in specs {
            openings.remove(spec.id);
        }

        info!(
            seams = specs.len(),
            seam_quads,
            vertices = vertices.len(),
            faces = faces.len(),
            "joined meshes"
        );
        Ok(Mesh::from_parts(vertices, faces, openings))
    }
}

fn rim(openings: &BTreeMap<String, Opening>, id: &str) -> MeshResult<Vec<u32>> {
    openings
        .get(id)
        .ok_or_else(|| MeshError::incomplete_opening(id, 0, 0))?
        .indices()
}
