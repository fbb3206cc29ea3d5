//! End-to-end runs of the whole pipeline over small hand-built networks.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use geom::{Angle, Distance, LonLat, EPSILON_DIST};
use linear_features::{
    AbandonReason, Edge, EdgeFlag, IntersectionGenerator, MultiSegment, Network, NodeID, Options,
    Quadrant, TexInfo, TexMethod, WalkOutcome,
};

const M: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

/// Meters east and north of (0, 0)
fn pt(x: f64, y: f64) -> LonLat {
    LonLat::new(x / M, y / M)
}

fn materials(feature_type: u32, cap: bool) -> Result<TexInfo> {
    if feature_type != 1 {
        bail!("unsupported feature type {}", feature_type);
    }
    Ok(TexInfo {
        material: if cap { "cap.png" } else { "centerline.png" }.to_string(),
        u_start: 0.0,
        u_end: 0.5,
        v_start: 0.0,
        v_end: 1.0,
        v_repeat: Distance::meters(10.0),
    })
}

type Materials = fn(u32, bool) -> Result<TexInfo>;

fn generator(opts: Options) -> IntersectionGenerator<Materials> {
    abstutil::logger::setup();
    IntersectionGenerator::new(opts, materials as Materials)
}

fn find_edge(net: &Network, src: LonLat, dst: LonLat) -> &Edge {
    net.all_edges()
        .iter()
        .find(|e| e.src_pt.approx_eq(src, EPSILON_DIST) && e.dst_pt.approx_eq(dst, EPSILON_DIST))
        .unwrap()
}

fn assert_pts(got: &[LonLat], want: &[LonLat]) {
    assert_eq!(got.len(), want.len(), "{:?} vs {:?}", got, want);
    for (g, w) in got.iter().zip(want) {
        assert!(g.approx_eq(*w, Distance::meters(0.05)), "{} vs {}", g, w);
    }
}

fn assert_each_edge_textured_once(net: &Network, edges: impl Iterator<Item = usize>) {
    let mut seen = BTreeSet::new();
    for id in edges {
        assert!(seen.insert(id), "Edge #{} textured twice", id);
    }
    assert_eq!(seen.len(), net.all_edges().len());
    for edge in net.all_edges() {
        assert!(edge.flags.contains(EdgeFlag::Textured));
    }
}

#[test]
fn empty_network() {
    let mut gen = generator(Options::default());
    let results = gen.execute(false).unwrap();
    assert!(results.polygons.is_empty());
    assert!(results.failed_verification.is_empty());
    assert!(results.walks.is_empty());
}

#[test]
fn straight_chain_keeps_v_continuous() {
    let mut gen = generator(Options::default());
    for i in 0..3 {
        let y = 100.0 * i as f64;
        gen.insert(pt(0.0, y), pt(0.0, y + 100.0), Distance::meters(1.0), 1);
    }
    let results = gen.execute(false).unwrap();
    let net = gen.network();

    // Two caps were split off
    assert_eq!(net.all_edges().len(), 5);
    assert!(results.failed_verification.is_empty());
    // Passing straight through a node isn't a failed walk
    assert!(!results.walks.is_empty());
    for walk in &results.walks {
        assert_eq!(walk.outcome, WalkOutcome::NotMultiSegment, "{:?}", walk);
    }
    assert_each_edge_textured_once(net, results.polygons.iter().map(|p| p.edge.0));

    let (caps, mut lines): (Vec<_>, Vec<_>) = results
        .polygons
        .iter()
        .partition(|p| p.constant_attribute == 1);
    assert_eq!(caps.len(), 2);
    for cap in caps {
        assert_eq!(cap.method, TexMethod::Atlas1x1);
        assert_eq!(cap.material, "cap.png");
        assert_eq!(cap.limits.v_start, 0.0);
        assert_eq!(cap.limits.v_end, 1.0);
    }

    assert_eq!(lines.len(), 3);
    lines.sort_by(|a, b| a.params.anchor.y().total_cmp(&b.params.anchor.y()));
    assert_eq!(lines[0].limits.v_start, 0.0);
    for pair in lines.windows(2) {
        let gap = (pair[1].limits.v_start - pair[0].limits.v_end).rem_euclid(1.0);
        assert!(gap < 1e-6 || gap > 1.0 - 1e-6, "V jumps by {}", gap);
    }
    for line in &lines {
        assert!(line.params.heading.approx_eq(Angle::degrees(0.0), 0.01));
        let repeats = line.limits.v_end - line.limits.v_start;
        let expected = line.params.length.inner_meters() / 10.0;
        assert!((repeats - expected).abs() < 1e-6);
    }
}

#[test]
fn symmetric_y_has_no_multi_segment_junction() {
    let mut gen = generator(Options::default());
    let center = pt(0.0, 0.0);
    for deg in [0.0, 120.0, 240.0] {
        gen.insert(
            center,
            center.project_away(Distance::meters(100.0), Angle::degrees(deg)),
            Distance::meters(10.0),
            1,
        );
    }
    let results = gen.execute(false).unwrap();
    let net = gen.network();

    assert!(results.failed_verification.is_empty());
    assert!(!results
        .walks
        .iter()
        .any(|w| matches!(w.outcome, WalkOutcome::Committed { .. })));
    assert_eq!(
        results
            .walks
            .iter()
            .filter(|w| w.node == NodeID(0))
            .filter(|w| w.outcome == WalkOutcome::NotMultiSegment)
            .count(),
        3
    );
    assert_each_edge_textured_once(net, results.polygons.iter().map(|p| p.edge.0));

    // Each arm's ribbon closes at the center
    for edge in net.all_edges().iter().filter(|e| e.src == NodeID(0)) {
        assert!(edge
            .left_contour
            .last()
            .unwrap()
            .approx_eq(center, EPSILON_DIST));
    }
}

#[test]
fn sharp_fork_resolves_across_nodes() {
    let a = pt(0.0, 0.0);
    let b = a.project_away(Distance::meters(3.0), Angle::degrees(10.0));
    let tip = b.project_away(Distance::meters(100.0), Angle::degrees(10.0));

    let mut gen = generator(Options::default());
    let width = Distance::meters(10.0);
    gen.insert(a, pt(0.0, 100.0), width, 1);
    gen.insert(a, b, width, 1);
    gen.insert(b, tip, width, 1);
    gen.insert(a, pt(0.0, -100.0), width, 1);
    let results = gen.execute(false).unwrap();
    let net = gen.network();

    let long_x = find_edge(net, a, pt(0.0, 99.5));
    let short = find_edge(net, a, b);
    let walk = results
        .walks
        .iter()
        .find(|w| w.cur == long_x.id && w.next == short.id)
        .unwrap();
    assert_eq!(walk.node, NodeID(0));
    assert_eq!(walk.outcome, WalkOutcome::Committed { hops: 2 });

    let bend = pt(0.2625, 3.0);
    let meets_side = pt(5.0, 57.15);
    assert_pts(
        &long_x.right_contour,
        &[a, bend, meets_side, pt(5.0, 99.5)],
    );
    // Points where the boundary bends on the right are carried over to the left side
    assert_pts(
        &long_x.left_contour,
        &[
            pt(-5.0, 99.5),
            pt(-5.0, 57.15),
            pt(-5.0, 3.0),
            pt(-5.0, 0.0),
            a,
        ],
    );

    // The branch past the short edge picks up the same crossing point on its far side
    let long_z = find_edge(
        net,
        b,
        b.project_away(Distance::meters(99.5), Angle::degrees(10.0)),
    );
    assert_eq!(long_z.right_contour.len(), 3);
    let along = long_z.skeleton().decompose(long_z.right_contour[1]).0;
    assert!((along.inner_meters() - 54.15).abs() < 0.1);

    assert_eq!(results.polygons.len(), net.all_edges().len());
    assert_each_edge_textured_once(net, results.polygons.iter().map(|p| p.edge.0));
}

#[test]
fn fork_into_a_dead_end_discards_the_walk() {
    let a = pt(0.0, 0.0);
    let b = a.project_away(Distance::meters(3.0), Angle::degrees(10.0));

    let mut gen = generator(Options::default());
    let width = Distance::meters(10.0);
    gen.insert(a, pt(0.0, 100.0), width, 1);
    gen.insert(a, b, width, 1);
    gen.insert(a, pt(0.0, -100.0), width, 1);
    let results = gen.execute(false).unwrap();
    let net = gen.network();

    let long_x = find_edge(net, a, pt(0.0, 99.5));
    let short = find_edge(
        net,
        a,
        a.project_away(Distance::meters(2.5), Angle::degrees(10.0)),
    );
    let walk = results
        .walks
        .iter()
        .find(|w| w.cur == long_x.id && w.next == short.id)
        .unwrap();
    assert_eq!(walk.node, NodeID(0));
    // The bisector passes the short edge and its cap, then finds nothing past the dead-end
    assert_eq!(
        walk.outcome,
        WalkOutcome::Abandoned {
            hops: 2,
            reason: AbandonReason::NoNeighbor
        }
    );

    for edge in net.all_edges() {
        for q in Quadrant::ALL {
            assert_eq!(edge.multi_segment(q), &MultiSegment::Unset, "{} {:?}", edge.id, q);
        }
    }
    // Both ribbons fall back to the corners from the junction's bisectors
    for edge in [long_x, short] {
        let right: Vec<LonLat> = [Quadrant::BottomRight, Quadrant::TopRight]
            .into_iter()
            .filter_map(|q| edge.corner(q))
            .collect();
        let mut left: Vec<LonLat> = [Quadrant::TopLeft, Quadrant::BottomLeft]
            .into_iter()
            .filter_map(|q| edge.corner(q))
            .collect();
        left.push(a);
        assert_pts(&edge.right_contour, &right);
        assert_pts(&edge.left_contour, &left);
    }
    assert_each_edge_textured_once(net, results.polygons.iter().map(|p| p.edge.0));
}

#[test]
fn unsplit_caps_span_the_cap_length() {
    let opts = Options {
        add_cap_edges: false,
        ..Default::default()
    };
    let cap_length = opts.cap_length;
    let mut gen = generator(opts);
    gen.insert(pt(0.0, 0.0), pt(0.0, 100.0), Distance::meters(4.0), 1);
    let results = gen.execute(false).unwrap();

    assert_eq!(gen.network().all_edges().len(), 1);
    assert_eq!(results.polygons.len(), 1);
    let cap = &results.polygons[0];
    assert_eq!(cap.constant_attribute, 1);
    assert_eq!(cap.method, TexMethod::Atlas1x1);
    assert_eq!(cap.params.length, cap_length);
    assert_eq!(cap.params.width, Distance::meters(4.0));
}

#[test]
fn malformed_segments_are_skipped() {
    let opts = Options {
        add_cap_edges: false,
        ..Default::default()
    };
    let mut gen = generator(opts);
    let width = Distance::meters(2.0);
    gen.insert(LonLat::new(f64::NAN, 0.0), pt(0.0, 100.0), width, 1);
    gen.insert(pt(0.0, 0.0), LonLat::new(0.0, f64::INFINITY), width, 1);
    gen.insert(pt(10.0, 0.0), pt(10.0, 100.0), Distance::ZERO, 1);
    gen.insert(pt(20.0, 0.0), pt(20.0, 100.0), Distance::meters(-1.0), 1);
    gen.insert(pt(30.0, 0.0), pt(30.0, 100.0), width, 1);
    assert_eq!(gen.num_segments(), 5);

    let results = gen.execute(false).unwrap();
    let net = gen.network();
    assert_eq!(net.all_edges().len(), 1);
    find_edge(net, pt(30.0, 0.0), pt(30.0, 100.0));
    assert_eq!(results.polygons.len(), 1);
    assert!(results.failed_verification.is_empty());

    // Nothing usable at all still isn't an error
    let mut gen = generator(Options::default());
    gen.insert(LonLat::new(f64::NAN, f64::NAN), pt(0.0, 1.0), width, 1);
    assert!(gen.execute(true).unwrap().polygons.is_empty());
}

#[test]
fn unsupported_feature_type_aborts() {
    let mut gen = generator(Options::default());
    gen.insert(pt(0.0, 0.0), pt(0.0, 100.0), Distance::meters(1.0), 1);
    gen.insert(pt(0.0, 100.0), pt(50.0, 150.0), Distance::meters(1.0), 7);
    let err = gen.execute(false).unwrap_err();
    assert!(format!("{:#}", err).contains("unsupported feature type 7"));
}

#[test]
fn clean_drops_duplicates_and_splits_t_junctions() {
    let opts = Options {
        add_cap_edges: false,
        ..Default::default()
    };
    let mut gen = generator(opts);
    let width = Distance::meters(2.0);
    gen.insert(pt(0.0, 0.0), pt(0.0, 100.0), width, 1);
    gen.insert(pt(0.0, 100.0), pt(0.0, 0.0), width, 1);
    gen.insert(pt(0.0, 50.0), pt(50.0, 50.0), width, 1);
    // Zero-length segments are always skipped
    gen.insert(pt(20.0, 20.0), pt(20.0, 20.0), width, 1);

    let results = gen.execute(true).unwrap();
    let net = gen.network();
    assert_eq!(net.all_edges().len(), 3);
    let junction = net
        .all_nodes()
        .iter()
        .find(|n| n.pos.approx_eq(pt(0.0, 50.0), EPSILON_DIST))
        .unwrap();
    assert_eq!(junction.degree(), 3);
    assert_eq!(results.polygons.len(), 3);
    assert!(results.failed_verification.is_empty());

    // Without cleaning, the duplicate stays and nothing is split
    let results = gen.execute(false).unwrap();
    let net = gen.network();
    assert_eq!(net.all_edges().len(), 3);
    assert!(net
        .all_nodes()
        .iter()
        .all(|n| !n.pos.approx_eq(pt(0.0, 50.0), EPSILON_DIST) || n.degree() == 1));
    assert!(results.polygons.len() <= 3);
}

#[test]
fn debug_layers_are_written() {
    let root = std::env::temp_dir().join(format!("linear_features_debug_{}", std::process::id()));
    let opts = Options {
        debug_root: Some(root.display().to_string()),
        ..Default::default()
    };
    let mut gen = generator(opts);
    let center = pt(0.0, 0.0);
    for deg in [0.0, 90.0, 200.0] {
        gen.insert(
            center,
            center.project_away(Distance::meters(40.0), Angle::degrees(deg)),
            Distance::meters(4.0),
            1,
        );
    }
    gen.execute(false).unwrap();

    let dirs = fs_err::read_dir(&root).unwrap().count();
    assert!(dirs > 0);
    fs_err::remove_dir_all(&root).unwrap();
}

#[test]
fn random_networks_dont_panic() {
    let mut rng = XorShiftRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut gen = generator(Options::default());
        let num_segments = rng.gen_range(1..15);
        for _ in 0..num_segments {
            let start = pt(
                20.0 * rng.gen_range(0..6) as f64,
                20.0 * rng.gen_range(0..6) as f64,
            );
            let end = pt(
                20.0 * rng.gen_range(0..6) as f64,
                20.0 * rng.gen_range(0..6) as f64,
            );
            gen.insert(start, end, Distance::meters(rng.gen_range(1.0..8.0)), 1);
        }
        let clean = rng.gen_bool(0.5);
        let results = gen.execute(clean).unwrap();
        assert!(results.polygons.len() <= gen.network().all_edges().len());
        for polygon in &results.polygons {
            assert!(polygon.limits.v_end >= polygon.limits.v_start);
        }
    }
}
