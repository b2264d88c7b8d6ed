//! End-to-end tests for stitching complete loop stacks.

use glam::{DVec2, DVec3};
use loft_mesh::{
    cap_face_count, cap_loop, resample_loops, DataCurve, DisplacementEngine, EdgeLoop, Face,
    JoinSpec, LoopFactory, LoopShape, Mesh, MeshBuilder, MeshError, MeshJoiner, OpeningTag,
};
use std::collections::HashMap;

/// Counts how often each undirected edge is used.
fn edge_uses(mesh: &Mesh) -> HashMap<(u32, u32), usize> {
    let mut uses = HashMap::new();
    for face in mesh.faces() {
        let idx = face.indices();
        for k in 0..idx.len() {
            let (a, b) = (idx[k], idx[(k + 1) % idx.len()]);
            *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    uses
}

fn is_closed_manifold(mesh: &Mesh) -> bool {
    edge_uses(mesh).values().all(|&n| n == 2)
}

#[test]
fn test_capped_cylinder_is_closed() {
    let factory = LoopFactory::new(LoopShape::Ellipse {
        radius_x: 20.0,
        radius_y: 15.0,
    });
    let mut builder = MeshBuilder::new();
    builder.add_loops(factory.emit_cap(32, 0.0, false).unwrap());
    for z in 1..5 {
        builder.add_loop(factory.emit_loop(32, z as f64 * 10.0).unwrap());
    }
    builder.add_loops(factory.emit_cap(32, 50.0, true).unwrap());
    let mesh = builder.build().unwrap();

    assert!(mesh.validate().is_ok());
    assert!(is_closed_manifold(&mesh));
    assert!(mesh.faces().iter().all(|f| matches!(f, Face::Quad(_))));
    // Two caps plus four bridges of 32 quads each
    assert_eq!(mesh.face_count(), 2 * cap_face_count(32) + 5 * 32);
}

#[test]
fn test_bowl_with_poles_is_closed() {
    let factory = LoopFactory::new(LoopShape::Circle { radius: 10.0 });
    let mut builder = MeshBuilder::new();
    builder.add_loop(EdgeLoop::new(vec![DVec3::ZERO]));
    builder.add_loop(factory.emit_loop(111, 2.0).unwrap());
    builder.add_loop(factory.emit_loop(111, 8.0).unwrap());
    builder.add_loop(EdgeLoop::new(vec![DVec3::new(0.0, 0.0, 10.0)]));
    let mesh = builder.build().unwrap();
    assert_eq!(mesh.vertex_count(), 224);
    assert_eq!(mesh.face_count(), 111 * 3);
    assert!(is_closed_manifold(&mesh));
}

#[test]
fn test_profile_caps_around_resampled_wall() {
    let profile = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(0.0, 1.0),
    ];
    let factory = LoopFactory::new(LoopShape::Profile {
        points: profile,
        width: 40.0,
        height: 30.0,
    });
    let anchors: Vec<EdgeLoop> = [0.0, 5.0, 20.0, 30.0]
        .iter()
        .map(|&z| factory.emit_loop(48, z).unwrap())
        .collect();
    let wall = resample_loops(&anchors, 12).unwrap();

    let mut builder = MeshBuilder::new();
    builder.add_loops(factory.emit_cap(48, 0.0, false).unwrap());
    builder.add_loops(wall.into_iter().skip(1));
    builder.add_loops(factory.emit_cap(48, 30.0, true).unwrap().into_iter().skip(1));
    let mesh = builder.build().unwrap();
    assert!(mesh.validate().is_ok());
    assert!(is_closed_manifold(&mesh));
}

#[test]
fn test_displaced_and_solidified_vessel() {
    let factory = LoopFactory::new(LoopShape::Circle { radius: 25.0 });
    let mut builder = MeshBuilder::new();
    builder.add_loops(factory.emit_cap(32, 0.0, false).unwrap());
    let wall: Vec<EdgeLoop> = (0..8)
        .map(|z| factory.emit_loop(32, z as f64 * 5.0).unwrap())
        .collect();
    let curve = DataCurve::new(vec![(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]).unwrap();
    let relief = DisplacementEngine::new(&curve, 1.0)
        .displace_span(&wall)
        .unwrap();
    builder.add_loops(relief);
    builder.solidify(2.0).unwrap();
    let mesh = builder.build().unwrap();

    assert!(mesh.validate().is_ok());
    assert!(is_closed_manifold(&mesh));
}

#[test]
fn test_culled_window_joined_to_spout() {
    let factory = LoopFactory::new(LoopShape::Circle { radius: 30.0 });
    let mut wall: Vec<EdgeLoop> = (0..5)
        .map(|z| factory.emit_loop(32, z as f64 * 10.0).unwrap())
        .collect();

    // Cull the interior of a 2 x 2 window on loops 1..=3, columns 4..=6
    // and annotate its 8 rim vertices in a four-sided order.
    wall[2].cull(5).unwrap();
    let rim = [
        (1, 4),
        (1, 5),
        (1, 6),
        (2, 6),
        (3, 6),
        (3, 5),
        (3, 4),
        (2, 4),
    ];
    for (position, &(row, col)) in rim.iter().enumerate() {
        wall[row]
            .set_tag(
                col,
                OpeningTag::Opening {
                    id: "spout".into(),
                    position,
                    total: rim.len(),
                },
            )
            .unwrap();
    }
    let mut body = MeshBuilder::new();
    body.add_loops(factory.emit_cap(32, 0.0, false).unwrap());
    body.add_loops(wall.iter().skip(1).cloned());
    body.add_loops(factory.emit_cap(32, 40.0, true).unwrap());
    let body = body.build().unwrap();
    assert!(body.opening("spout").unwrap().is_complete());

    let rim_points: Vec<DVec3> = rim
        .iter()
        .map(|&(row, col)| wall[row].point(col).unwrap())
        .collect();
    let base = EdgeLoop::new(rim_points.iter().map(|p| *p * 1.1).collect());
    let mut spout = MeshBuilder::new();
    spout.add_loop(base.clone().with_opening("spout"));
    let tip = EdgeLoop::new(rim_points.iter().map(|p| *p * 1.5).collect());
    spout.add_loop(tip.clone());
    spout.add_loops(cap_loop(&tip, true).unwrap().into_iter().skip(1));
    let spout = spout.build().unwrap();

    let (bv, sv) = (body.vertex_count(), spout.vertex_count());
    let (bf, sf) = (body.face_count(), spout.face_count());
    let joined = MeshJoiner::join(body, &spout, &[JoinSpec::new("spout")]).unwrap();
    assert_eq!(joined.vertex_count(), bv + sv);
    assert_eq!(joined.face_count(), bf + sf + 8);
    assert!(joined.validate().is_ok());
    assert!(is_closed_manifold(&joined));
}

#[test]
fn test_unsupported_neighbours_fail_loudly() {
    let mut builder = MeshBuilder::new();
    builder
        .add_loop(EdgeLoop::new(vec![DVec3::ZERO; 4]))
        .add_loop(EdgeLoop::new(vec![DVec3::Z; 8]));
    assert!(matches!(
        builder.build(),
        Err(MeshError::ShapeMismatch { left: 4, right: 8, .. })
    ));
}
