//! # Loop Bridge
//!
//! Emits the faces joining two consecutive loops. Loop `a` occupies global
//! indices `offset..offset + a.len()`, loop `b` the indices right after it.
//!
//! ## Decision Table
//!
//! | Situation                                   | Faces                         |
//! |---------------------------------------------|-------------------------------|
//! | either loop has a partial range             | open quad strip               |
//! | single vertex next to an 8-vertex loop      | 4 corner quads (cap centre)   |
//! | single vertex next to any other loop        | triangle fan (pole)           |
//! | equal sizes                                 | `n` quads (`n - 1` if open)   |
//! | sizes `4p` and `4q`, `p - q` even and >= 2  | corner-aware quads            |
//! | anything else                               | [`MeshError::ShapeMismatch`]  |
//!
//! ## Corner-Aware Path
//!
//! Both loops are four-sided with `p` and `q` edges per side. Each corner of
//! the larger loop gets one quad of three large vertices and the matching
//! small corner; each side then pairs large and small edges one for one,
//! spending any surplus large edges on extra fan quads spread along the side.
//!
//! ```text
//!   L[c-1]   L[c]   L[c+1]  L[c+2]
//!      o------o------o-------o
//!       \  corner    |  side |
//!        \   quad    |  quad |
//!         o----------o-------o
//!               S[s]      S[s+1]
//! ```
//!
//! With `p - q = 2` this emits `4p - 4` quads, i.e. `bigger - 4`.

use crate::edge_loop::EdgeLoop;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Face;

/// Which side of a bridge holds the pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoleSide {
    /// The pole starts the stack (first loop).
    Opening,
    /// The pole ends the stack (second loop).
    Closing,
}

/// Faces joining `a` (starting at global index `offset`) to `b`.
pub fn bridge(a: &EdgeLoop, b: &EdgeLoop, offset: usize) -> MeshResult<Vec<Face>> {
    let (la, lb) = (a.len(), b.len());
    let b_offset = offset + la;

    if a.range().is_some() || b.range().is_some() {
        return strip(a, b, offset, b_offset);
    }

    match (la, lb) {
        (0, _) | (_, 0) => Err(MeshError::shape_mismatch(la, lb, "empty loop")),
        (1, 1) => Err(MeshError::shape_mismatch(la, lb, "two single vertices")),
        (1, n) | (n, 1) if n < 3 => {
            Err(MeshError::shape_mismatch(la, lb, "pole needs a ring of at least 3 vertices"))
        }
        (1, 8) => Ok(corner_aware(8, b_offset, 1, offset)),
        (8, 1) => Ok(corner_aware(8, offset, 1, b_offset)),
        (1, n) => Ok(pole_fan(offset, b_offset, n, PoleSide::Opening)),
        (n, 1) => Ok(pole_fan(b_offset, offset, n, PoleSide::Closing)),
        (n, m) if n == m => Ok(equal(offset, b_offset, n, a.is_closed() && b.is_closed())),
        (n, m) => {
            if !a.is_closed() || !b.is_closed() {
                return Err(MeshError::shape_mismatch(n, m, "open loops of different sizes"));
            }
            if n % 4 != 0 || m % 4 != 0 {
                return Err(MeshError::shape_mismatch(n, m, "sizes are not multiples of 4"));
            }
            let diff = n.abs_diff(m) / 4;
            if diff < 2 || diff % 2 != 0 {
                return Err(MeshError::shape_mismatch(
                    n,
                    m,
                    "per-side edge counts must differ by an even number",
                ));
            }
            Ok(if n > m {
                corner_aware(n, offset, m, b_offset)
            } else {
                corner_aware(m, b_offset, n, offset)
            })
        }
    }
}

#[inline]
fn quad(a: usize, b: usize, c: usize, d: usize) -> Face {
    Face::Quad([a as u32, b as u32, c as u32, d as u32])
}

/// `n` quads around two equal loops, or `n - 1` when not closed.
fn equal(a: usize, b: usize, n: usize, closed: bool) -> Vec<Face> {
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| {
            let j = (i + 1) % n;
            quad(a + i, a + j, b + j, b + i)
        })
        .collect()
}

/// Triangles from a single pole vertex to each edge of a ring.
fn pole_fan(pole: usize, ring: usize, n: usize, side: PoleSide) -> Vec<Face> {
    (0..n)
        .map(|i| {
            let (r0, r1) = (ring + i, ring + (i + 1) % n);
            let tri = match side {
                PoleSide::Opening => [pole, r0, r1],
                PoleSide::Closing => [r0, r1, pole],
            };
            Face::Tri(tri.map(|v| v as u32))
        })
        .collect()
}

/// Quads between a large and a small four-sided loop.
///
/// A single-vertex `small` loop is treated as a loop with zero edges per
/// side whose every index is the centre.
fn corner_aware(big: usize, big_base: usize, small: usize, small_base: usize) -> Vec<Face> {
    let p = big / 4;
    let q = if small == 1 { 0 } else { small / 4 };
    let fans = (p - q - 2) / 2;
    let steps = q + fans;
    let l = |i: usize| big_base + i % big;
    let s = |i: usize| small_base + if small == 1 { 0 } else { i % small };

    let mut faces = Vec::with_capacity(4 * (1 + steps));
    for side in 0..4 {
        let c = side * p;
        let sc = side * q;
        faces.push(quad(l(c + big - 1), l(c), l(c + 1), s(sc)));

        let (mut li, mut si) = (c + 1, sc);
        for k in 0..steps {
            let fan = fans > 0 && (k + 1) * fans / steps > k * fans / steps;
            if fan {
                faces.push(quad(l(li), l(li + 1), l(li + 2), s(si)));
                li += 2;
            } else {
                faces.push(quad(l(li), l(li + 1), s(si + 1), s(si)));
                li += 1;
                si += 1;
            }
        }
    }
    faces
}

/// Open strip over the participating ranges.
///
/// Equal participating counts pair vertex for vertex. Otherwise the narrower
/// side must carry a partial range whose start also offsets into the wider
/// loop.
fn strip(a: &EdgeLoop, b: &EdgeLoop, a_base: usize, b_base: usize) -> MeshResult<Vec<Face>> {
    let (ra, rb) = (a.participating(), b.participating());
    let (ia, ib): (Vec<usize>, Vec<usize>) = if ra.len() == rb.len() {
        (ra.collect(), rb.collect())
    } else {
        let (narrow, narrow_range, wide_len) = if ra.len() < rb.len() {
            (a, ra.clone(), b.len())
        } else {
            (b, rb.clone(), a.len())
        };
        let Some(range) = narrow.range() else {
            return Err(MeshError::shape_mismatch(
                ra.len(),
                rb.len(),
                "only the narrower loop may carry a partial range",
            ));
        };
        if range.end() > wide_len {
            return Err(MeshError::shape_mismatch(
                ra.len(),
                rb.len(),
                "partial range runs past the wider loop",
            ));
        }
        let wide: Vec<usize> = narrow_range.clone().collect();
        let narrow_idx: Vec<usize> = narrow_range.collect();
        if ra.len() < rb.len() {
            (narrow_idx, wide)
        } else {
            (wide, narrow_idx)
        }
    };

    Ok((0..ia.len().saturating_sub(1))
        .map(|i| {
            quad(
                a_base + ia[i],
                a_base + ia[i + 1],
                b_base + ib[i + 1],
                b_base + ib[i],
            )
        })
        .collect())
}
