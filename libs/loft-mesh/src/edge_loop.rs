//! # Edge Loops
//!
//! An edge loop is an ordered ring (or open polyline) of vertex slots at one
//! station of a loft. Slots may be culled, may carry an opening annotation,
//! and the loop may restrict bridging to a contiguous sub-range.

use crate::error::{MeshError, MeshResult};
use config::constants::EPSILON;
use glam::DVec3;
use std::ops::Range;

// =============================================================================
// VERTEX SLOTS
// =============================================================================

/// A vertex position, or the marker left by a vertex that will be removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexSlot {
    /// A live vertex.
    Present(DVec3),
    /// Removed after stitching; faces touching it are dropped.
    Culled,
}

impl VertexSlot {
    /// Returns the position if the slot is live.
    #[inline]
    pub fn point(&self) -> Option<DVec3> {
        match self {
            VertexSlot::Present(p) => Some(*p),
            VertexSlot::Culled => None,
        }
    }

    /// Returns true for culled slots.
    #[inline]
    pub fn is_culled(&self) -> bool {
        matches!(self, VertexSlot::Culled)
    }
}

/// Per-vertex opening annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpeningTag {
    /// Ordinary vertex.
    #[default]
    Boundary,
    /// Vertex `position` of `total` on the rim of opening `id`.
    Opening {
        id: String,
        position: usize,
        total: usize,
    },
}

// =============================================================================
// PARTIAL RANGE
// =============================================================================

/// Contiguous `[start, end)` vertex range that participates in bridging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialRange {
    start: usize,
    end: usize,
}

impl PartialRange {
    /// Creates a range, rejecting empty or inverted bounds.
    pub fn new(start: usize, end: usize) -> MeshResult<Self> {
        if start >= end {
            return Err(MeshError::invalid_input(format!(
                "partial range {start}..{end} is empty"
            )));
        }
        Ok(Self { start, end })
    }

    /// First participating index.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last participating index.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of participating vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; empty ranges cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

// =============================================================================
// EDGE LOOP
// =============================================================================

/// One ring of a loft.
///
/// # Example
///
/// ```rust
/// use loft_mesh::EdgeLoop;
/// use glam::DVec3;
///
/// let ring = EdgeLoop::new(vec![
///     DVec3::new(0.0, 0.0, 1.0),
///     DVec3::new(1.0, 0.0, 1.0),
///     DVec3::new(1.0, 1.0, 1.0),
///     DVec3::new(0.0, 1.0, 1.0),
/// ]);
/// assert_eq!(ring.len(), 4);
/// assert!(ring.is_closed());
/// assert_eq!(ring.z(), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLoop {
    slots: Vec<VertexSlot>,
    tags: Vec<OpeningTag>,
    closed: bool,
    range: Option<PartialRange>,
}

impl EdgeLoop {
    /// Creates a closed loop of live vertices.
    pub fn new(points: Vec<DVec3>) -> Self {
        Self::from_slots(points.into_iter().map(VertexSlot::Present).collect())
    }

    /// Creates an open loop (polyline) of live vertices.
    pub fn open(points: Vec<DVec3>) -> Self {
        Self {
            closed: false,
            ..Self::new(points)
        }
    }

    /// Creates a closed loop from explicit slots.
    pub fn from_slots(slots: Vec<VertexSlot>) -> Self {
        let tags = vec![OpeningTag::Boundary; slots.len()];
        Self {
            slots,
            tags,
            closed: true,
            range: None,
        }
    }

    /// Restricts bridging to `range`.
    pub fn with_range(mut self, range: PartialRange) -> MeshResult<Self> {
        if range.end() > self.slots.len() {
            return Err(MeshError::invalid_input(format!(
                "partial range {}..{} exceeds loop of {} vertices",
                range.start(),
                range.end(),
                self.slots.len()
            )));
        }
        self.range = Some(range);
        Ok(self)
    }

    /// Marks every vertex as position `i` of the opening `id`.
    ///
    /// The loop itself becomes the rim: position `i` is vertex `i` and the
    /// opening's total is the loop length.
    pub fn with_opening(mut self, id: &str) -> Self {
        let total = self.slots.len();
        for (position, tag) in self.tags.iter_mut().enumerate() {
            *tag = OpeningTag::Opening {
                id: id.to_string(),
                position,
                total,
            };
        }
        self
    }

    /// Sets the opening annotation of a single vertex.
    pub fn set_tag(&mut self, index: usize, tag: OpeningTag) -> MeshResult<()> {
        let len = self.slots.len();
        let slot = self
            .tags
            .get_mut(index)
            .ok_or_else(|| MeshError::invalid_input(format!("tag index {index} out of {len}")))?;
        *slot = tag;
        Ok(())
    }

    /// Marks a vertex for removal.
    pub fn cull(&mut self, index: usize) -> MeshResult<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| MeshError::invalid_input(format!("cull index {index} out of {len}")))?;
        *slot = VertexSlot::Culled;
        Ok(())
    }

    /// Culls every slot outside the partial range.
    pub(crate) fn cull_outside_range(&mut self) {
        let keep = self.participating();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if !keep.contains(&i) {
                *slot = VertexSlot::Culled;
            }
        }
    }

    /// Number of slots, culled ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the loop has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true unless the loop was created open.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The partial range, if one was set.
    #[inline]
    pub fn range(&self) -> Option<PartialRange> {
        self.range
    }

    /// Indices that take part in bridging.
    pub fn participating(&self) -> Range<usize> {
        match self.range {
            Some(r) => r.start()..r.end(),
            None => 0..self.slots.len(),
        }
    }

    /// All slots in loop order.
    #[inline]
    pub fn slots(&self) -> &[VertexSlot] {
        &self.slots
    }

    /// All opening annotations in loop order.
    #[inline]
    pub fn tags(&self) -> &[OpeningTag] {
        &self.tags
    }

    /// Position of vertex `index`, if present and live.
    #[inline]
    pub fn point(&self, index: usize) -> Option<DVec3> {
        self.slots.get(index).and_then(VertexSlot::point)
    }

    /// Live positions, skipping culled slots.
    pub fn points(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.slots.iter().filter_map(VertexSlot::point)
    }

    /// Height of the first live vertex.
    pub fn z(&self) -> Option<f64> {
        self.points().next().map(|p| p.z)
    }

    /// Returns true if every live vertex shares the same height.
    pub fn is_flat(&self) -> bool {
        match self.z() {
            Some(z) => self.points().all(|p| (p.z - z).abs() < EPSILON),
            None => true,
        }
    }

    /// Centroid of the live vertices.
    pub fn centroid(&self) -> Option<DVec3> {
        let (sum, count) = self
            .points()
            .fold((DVec3::ZERO, 0usize), |(sum, count), p| (sum + p, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Returns a copy with every live vertex mapped through `f`.
    ///
    /// Closedness, range and annotations are kept.
    pub fn map_points(&self, mut f: impl FnMut(usize, DVec3) -> DVec3) -> Self {
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                VertexSlot::Present(p) => VertexSlot::Present(f(i, *p)),
                VertexSlot::Culled => VertexSlot::Culled,
            })
            .collect();
        Self {
            slots,
            tags: self.tags.clone(),
            closed: self.closed,
            range: self.range,
        }
    }

    /// Returns a translated copy.
    pub fn translate(&self, offset: DVec3) -> Self {
        self.map_points(|_, p| p + offset)
    }

    /// Returns a copy with vertex order reversed.
    pub fn reversed(&self) -> Self {
        let mut slots = self.slots.clone();
        let mut tags = self.tags.clone();
        slots.reverse();
        tags.reverse();
        Self {
            slots,
            tags,
            closed: self.closed,
            range: None,
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<VertexSlot>, Vec<OpeningTag>) {
        (self.slots, self.tags)
    }
}

/// Interpolates a loop between `from` and `to`.
///
/// `mu = 0` reproduces `from`, `mu = 1` reproduces `to`. Annotations are not
/// carried over; the result is a plain loop with `from`'s closedness.
pub fn lerp_loop(from: &EdgeLoop, to: &EdgeLoop, mu: f64) -> MeshResult<EdgeLoop> {
    if from.len() != to.len() {
        return Err(MeshError::shape_mismatch(
            from.len(),
            to.len(),
            "interpolated loops need equal cardinality",
        ));
    }
    let slots = from
        .slots()
        .iter()
        .zip(to.slots())
        .map(|(a, b)| match (a.point(), b.point()) {
            (Some(a), Some(b)) => VertexSlot::Present(a.lerp(b, mu)),
            _ => VertexSlot::Culled,
        })
        .collect();
    let mut out = EdgeLoop::from_slots(slots);
    out.closed = from.closed;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(z: f64) -> EdgeLoop {
        EdgeLoop::new(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(1.0, 1.0, z),
            DVec3::new(0.0, 1.0, z),
        ])
    }

    #[test]
    fn test_partial_range_rejects_empty() {
        assert!(PartialRange::new(3, 3).is_err());
        assert!(PartialRange::new(4, 2).is_err());
        assert_eq!(PartialRange::new(1, 4).map(|r| r.len()).ok(), Some(3));
    }

    #[test]
    fn test_with_range_checks_bounds() {
        let range = PartialRange::new(1, 5).unwrap();
        assert!(square(0.0).with_range(range).is_err());
        let range = PartialRange::new(1, 3).unwrap();
        let ring = square(0.0).with_range(range).unwrap();
        assert_eq!(ring.participating(), 1..3);
    }

    #[test]
    fn test_cull_keeps_length() {
        let mut ring = square(0.0);
        ring.cull(2).unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.points().count(), 3);
        assert!(ring.point(2).is_none());
        assert!(ring.cull(9).is_err());
    }

    #[test]
    fn test_with_opening_tags_every_vertex() {
        let ring = square(0.0).with_opening("knob");
        for (i, tag) in ring.tags().iter().enumerate() {
            assert_eq!(
                tag,
                &OpeningTag::Opening {
                    id: "knob".to_string(),
                    position: i,
                    total: 4
                }
            );
        }
    }

    #[test]
    fn test_translate_and_flatness() {
        let ring = square(1.0).translate(DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(ring.z(), Some(3.0));
        assert!(ring.is_flat());
    }

    #[test]
    fn test_centroid() {
        let c = square(2.0).centroid().unwrap();
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
        assert_relative_eq!(c.z, 2.0);
    }

    #[test]
    fn test_lerp_loop_midpoint() {
        let mid = lerp_loop(&square(0.0), &square(2.0), 0.5).unwrap();
        assert_eq!(mid.z(), Some(1.0));
        assert!(lerp_loop(&square(0.0), &EdgeLoop::new(vec![DVec3::ZERO]), 0.5).is_err());
    }

    #[test]
    fn test_cull_outside_range() {
        let range = PartialRange::new(1, 3).unwrap();
        let mut ring = square(0.0).with_range(range).unwrap();
        ring.cull_outside_range();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.points().count(), 2);
        assert!(ring.slots()[0].is_culled() && ring.slots()[3].is_culled());

        let mut full = square(0.0);
        full.cull_outside_range();
        assert_eq!(full.points().count(), 4);
    }

    #[test]
    fn test_reversed_drops_range() {
        let range = PartialRange::new(0, 2).unwrap();
        let ring = square(0.0).with_range(range).unwrap().reversed();
        assert_eq!(ring.range(), None);
        assert_eq!(ring.point(0), Some(DVec3::new(0.0, 1.0, 0.0)));
    }
}
