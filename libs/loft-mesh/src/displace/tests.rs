//! Tests for displacement, signals and embossing.

use super::*;
use crate::shapes::{LoopFactory, LoopShape};
use approx::{assert_abs_diff_eq, assert_relative_eq};

fn column(n: usize) -> Vec<EdgeLoop> {
    let factory = LoopFactory::new(LoopShape::Circle { radius: 10.0 });
    (0..n)
        .map(|z| factory.emit_loop(16, z as f64).unwrap())
        .collect()
}

struct Constant(f64);

impl DisplacementSignal for Constant {
    fn strength(&self, _: &SamplePoint) -> f64 {
        self.0
    }
}

// =============================================================================
// NORMAL FRAME
// =============================================================================

#[test]
fn test_frame_restores_height() {
    let frame = NormalFrame {
        before: DVec3::new(1.0, 0.0, 4.0),
        adjacent: DVec3::new(0.0, 1.0, 4.0),
        after: DVec3::new(1.0, 1.0, 6.0),
    };
    let p = DVec3::new(1.0, 1.0, 5.0);
    let dir = frame.direction(p, DisplaceDirection::Outward).unwrap();
    assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-12);
    let moved = frame.offset(p, DisplaceDirection::Outward, 0.0);
    assert_eq!(moved, p);
}

#[test]
fn test_frame_directions_differ() {
    let frame = NormalFrame {
        before: DVec3::new(1.0, 0.0, 0.0),
        adjacent: DVec3::new(0.0, 1.0, 0.0),
        after: DVec3::new(1.0, 1.0, 1.0),
    };
    let p = DVec3::new(0.5, 0.5, 0.5);
    let out = frame.direction(p, DisplaceDirection::Outward).unwrap();
    let inward = frame.direction(p, DisplaceDirection::Inward).unwrap();
    assert!((out - inward).length() > 1e-6);
}

#[test]
fn test_degenerate_frame_keeps_point() {
    let p = DVec3::new(0.0, 0.0, 3.0);
    let frame = NormalFrame {
        before: p,
        adjacent: p,
        after: p,
    };
    assert!(frame.direction(p, DisplaceDirection::Outward).is_none());
    assert_eq!(frame.offset(p, DisplaceDirection::Outward, 2.0), p);
}

// =============================================================================
// SPAN DISPLACEMENT
// =============================================================================

#[test]
fn test_span_anchors_untouched() {
    let span = column(6);
    let out = DisplacementEngine::new(&Constant(1.0), 0.3)
        .displace_span(&span)
        .unwrap();
    assert_eq!(out.len(), 6);
    assert_eq!(out[0], span[0]);
    assert_eq!(out[5], span[5]);
    assert_ne!(out[2], span[2]);
}

#[test]
fn test_zero_signal_is_identity() {
    let span = column(4);
    let out = DisplacementEngine::new(&Constant(0.0), 5.0)
        .displace_span(&span)
        .unwrap();
    for (a, b) in out.iter().zip(&span) {
        for (p, q) in a.points().zip(b.points()) {
            assert_abs_diff_eq!(p.distance(q), 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_displacement_magnitude_matches_depth() {
    let span = column(3);
    let out = DisplacementEngine::new(&Constant(0.5), 2.0)
        .displace_span(&span)
        .unwrap();
    for (p, q) in out[1].points().zip(span[1].points()) {
        assert_relative_eq!(p.distance(q), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_short_span_unchanged() {
    let span = column(2);
    let out = DisplacementEngine::new(&Constant(1.0), 1.0)
        .displace_span(&span)
        .unwrap();
    assert_eq!(out, span);
}

#[test]
fn test_span_mismatch_is_error() {
    let mut span = column(3);
    span[2] = LoopFactory::new(LoopShape::Circle { radius: 1.0 })
        .emit_loop(8, 2.0)
        .unwrap();
    assert!(matches!(
        DisplacementEngine::new(&Constant(1.0), 1.0).displace_span(&span),
        Err(MeshError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_arc_positions_normalized() {
    let along = arc_positions(&column(5));
    assert_eq!(along.len(), 5);
    assert_relative_eq!(along[0], 0.0);
    assert_relative_eq!(along[2], 0.5, epsilon = 1e-12);
    assert_relative_eq!(along[4], 1.0, epsilon = 1e-12);
}

// =============================================================================
// SIGNALS
// =============================================================================

#[test]
fn test_sample_grid_lightness() {
    let grid = SampleGrid::new(2, 1, vec![[255, 0, 0], [255, 255, 255]]).unwrap();
    assert_relative_eq!(grid.lightness(0.0, 0.0), 0.5);
    assert_relative_eq!(grid.lightness(1.0, 0.0), 1.0);
}

#[test]
fn test_sample_grid_rejects_wrong_size() {
    assert!(SampleGrid::new(2, 2, vec![[0, 0, 0]; 3]).is_err());
    assert!(SampleGrid::from_gray(0, 1, &[]).is_err());
}

#[test]
fn test_grid_signal_dark_pushes_deepest() {
    let grid = SampleGrid::from_gray(2, 1, &[0, 255]).unwrap();
    let signal = GridSignal::new(
        &grid,
        GridProjection::Planar {
            min: DVec2::ZERO,
            max: DVec2::new(1.0, 1.0),
        },
    );
    let at = |x: f64| SamplePoint {
        position: DVec3::new(x, 0.0, 0.0),
        along: 0.0,
        around: 0.0,
    };
    assert_relative_eq!(signal.strength(&at(0.0)), 1.0);
    assert_relative_eq!(signal.strength(&at(1.0)), 0.0);
}

#[test]
fn test_grid_signal_wrap_reverses_around() {
    let grid = SampleGrid::from_gray(2, 1, &[0, 255]).unwrap();
    let signal = GridSignal::new(&grid, GridProjection::Wrap);
    let at = |around: f64| SamplePoint {
        position: DVec3::ZERO,
        along: 0.0,
        around,
    };
    assert_relative_eq!(signal.strength(&at(0.0)), 0.0);
    assert_relative_eq!(signal.strength(&at(1.0)), 1.0);
}

#[test]
fn test_data_curve_normalizes_and_sorts() {
    let curve = DataCurve::new(vec![(3.0, 10.0), (1.0, 0.0), (2.0, 20.0)]).unwrap();
    assert_relative_eq!(curve.value_at(0.0), 0.0);
    assert_relative_eq!(curve.value_at(0.5), 1.0);
    assert_relative_eq!(curve.value_at(1.0), 0.5);
    assert_relative_eq!(curve.value_at(-3.0), 0.0);
    assert_relative_eq!(curve.value_at(7.0), 0.5);
}

#[test]
fn test_data_curve_rejects_bad_input() {
    assert!(DataCurve::new(vec![(0.0, 1.0)]).is_err());
    assert!(DataCurve::new(vec![(1.0, 1.0), (1.0, 2.0)]).is_err());
    assert!(DataCurve::new(vec![(0.0, f64::NAN), (1.0, 2.0)]).is_err());
}

#[test]
fn test_data_curve_resample() {
    let curve = DataCurve::new(vec![(0.0, 0.0), (1.0, 4.0)]).unwrap();
    let values = curve.resample(5);
    assert_eq!(values.len(), 5);
    assert_relative_eq!(values[1], 0.25, epsilon = 1e-12);
    assert!(curve.resample(0).is_empty());
}

// =============================================================================
// EMBOSS
// =============================================================================

#[test]
fn test_emboss_only_above_min_z() {
    let grid = SampleGrid::from_gray(1, 1, &[0]).unwrap();
    let loops = column(3);
    let bounds = (DVec2::splat(-10.0), DVec2::splat(10.0));
    let out = emboss_z(&loops, &grid, bounds, 0.5, 1.5);
    assert_eq!(out[0], loops[0]);
    assert_eq!(out[1], loops[1]);
    assert_relative_eq!(out[2].z().unwrap(), 2.5, epsilon = 1e-12);
}
