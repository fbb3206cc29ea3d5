//! When two edges converge at a sharp angle, the boundary between their ribbons can run past the
//! far end of one of them, through more nodes. Starting at a junction, walk the bisector between
//! a pair of angularly adjacent edges, hopping onto the next edge in the chain whenever the
//! bisector passes an edge's far end, until it reaches both side lines.

use std::mem;

use serde::{Deserialize, Serialize};

use abstutil::wraparound_get;
use geom::{Distance, LonLat, Ray};

use crate::{DebugLayers, EdgeID, EdgeInfo, Network, NodeID, Quadrant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkOutcome {
    /// The bisector reached both sides before either far end, or never reaches the far ends at
    /// all. The ordinary corners from the junction's bisectors stand.
    NotMultiSegment,
    /// `hops` counts the positions the bisector was cast from, including the junction.
    Committed { hops: usize },
    /// Everything proposed along the way was discarded.
    Abandoned { hops: usize, reason: AbandonReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbandonReason {
    /// The bisector never reaches one of the far-end constraints.
    MissedFarConstraint,
    /// No edge at the far node shares the bisector crossing.
    NoNeighbor,
    /// The walk would visit more positions than there are edges.
    HopLimit,
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Next,
    Prev,
}

/// Walk from every junction, once per pair of angularly adjacent edges.
pub fn complete_multi_segment_intersections(
    network: &mut Network,
    tolerance: Distance,
    debug: &mut DebugLayers,
) -> Vec<(NodeID, EdgeID, EdgeID, WalkOutcome)> {
    let mut results = Vec::new();
    for idx in 0..network.all_nodes().len() {
        let node = &network.all_nodes()[idx];
        if node.degree() < 2 {
            continue;
        }
        let id = node.id;
        let pairs: Vec<(EdgeInfo, EdgeInfo)> = (0..node.degree())
            .map(|i| (node.edges()[i], node.neighbors(i).1))
            .collect();
        for (cur, next) in pairs {
            let outcome = walk_bisector(network, id, cur, next, tolerance, debug);
            if let WalkOutcome::Committed { hops } = outcome {
                info!(
                    "Multi-segment intersection between {} and {} from {} spans {} hops",
                    cur.edge, next.edge, id, hops
                );
            }
            results.push((id, cur.edge, next.edge, outcome));
        }
    }
    results
}

/// Walk the bisector between `cur` and the edge clockwise after it, `next`, starting from the
/// node they share. Only slots that aren't committed yet are touched, so walking again over an
/// already resolved junction changes nothing.
pub fn walk_bisector(
    network: &mut Network,
    node: NodeID,
    mut ce: EdgeInfo,
    mut ne: EdgeInfo,
    tolerance: Distance,
    debug: &mut DebugLayers,
) -> WalkOutcome {
    let max_hops = network.all_edges().len();
    let mut pos = network.get_n(node).pos;

    let mut ce_pts: Vec<LonLat> = Vec::new();
    let mut ne_pts: Vec<LonLat> = Vec::new();
    let mut ce_project: Vec<LonLat> = Vec::new();
    let mut ne_project: Vec<LonLat> = Vec::new();
    let mut touched: Vec<EdgeID> = Vec::new();

    let mut iteration = 0;
    let outcome = loop {
        if iteration >= max_hops {
            warn!(
                "Walking from {} between {} and {} didn't finish after {} hops",
                node, ce.edge, ne.edge, iteration
            );
            break WalkOutcome::Abandoned {
                hops: iteration,
                reason: AbandonReason::HopLimit,
            };
        }

        let (ce_edge, ne_edge) = (network.get_e(ce.edge), network.get_e(ne.edge));
        let bisector = Ray::new(
            pos,
            ce_edge
                .heading(ce.originating)
                .bisect_clockwise(ne_edge.heading(ne.originating)),
        );
        ce_pts.push(pos);
        ne_pts.push(pos);
        if debug.enabled() {
            let label = format!("walk from {} iter {}", node, iteration);
            debug.add_ray(ce.edge, "multiseg_bisectors", &label, &bisector);
            debug.add_ray(ne.edge, "multiseg_bisectors", &label, &bisector);
        }

        let ce_end = ce_edge
            .constraint(Quadrant::far_right(ce.originating))
            .and_then(|ray| bisector.intersection_ray(&ray));
        let ne_end = ne_edge
            .constraint(Quadrant::far_left(ne.originating))
            .and_then(|ray| bisector.intersection_ray(&ray));
        let (ce_end, ne_end) = match (ce_end, ne_end) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                debug!(
                    "Bisector from {} doesn't reach the far ends of {} and {}",
                    pos, ce.edge, ne.edge
                );
                break missed_far_constraint(iteration);
            }
        };
        let ce_end_dist = pos.gps_dist(ce_end);
        let ne_end_dist = pos.gps_dist(ne_end);
        if ce_end_dist <= Distance::ZERO || ne_end_dist <= Distance::ZERO {
            break missed_far_constraint(iteration);
        }

        let ce_side = bisector
            .intersection_infinite(&ce_edge.right_side(ce.originating).infinite())
            .filter(|pt| pos.gps_dist(*pt) < ce_end_dist);
        let ne_side = bisector
            .intersection_infinite(&ne_edge.left_side(ne.originating).infinite())
            .filter(|pt| pos.gps_dist(*pt) < ne_end_dist);
        if let (Some(ce_side), Some(ne_side)) = (ce_side, ne_side) {
            if iteration == 0 {
                break WalkOutcome::NotMultiSegment;
            }
            ce_pts.push(ce_side);
            ce_project.push(ce_side);
            ne_pts.push(ne_side);
            ne_project.push(ne_side);
            network.mut_edge(ce.edge).propose_right(
                ce.originating,
                mem::take(&mut ce_pts),
                mem::take(&mut ce_project),
            );
            network.mut_edge(ne.edge).propose_left(
                ne.originating,
                mem::take(&mut ne_pts),
                mem::take(&mut ne_project),
            );
            touched.push(ce.edge);
            touched.push(ne.edge);
            break WalkOutcome::Committed {
                hops: iteration + 1,
            };
        }

        // Finish whichever edge ends first along the bisector and move onto the next one
        if ce_end_dist < ne_end_dist {
            pos = ce_end;
            ce_pts.push(pos);
            ne_project.push(pos);

            let far = ce_edge.far_node(ce.originating);
            match find_edge_sharing_bisector(
                network,
                far,
                ce.edge,
                &bisector,
                pos,
                Direction::Next,
                tolerance,
            ) {
                Some(next) => {
                    network.mut_edge(ce.edge).propose_right(
                        ce.originating,
                        mem::take(&mut ce_pts),
                        mem::take(&mut ce_project),
                    );
                    touched.push(ce.edge);
                    ce = next;
                }
                None => {
                    break WalkOutcome::Abandoned {
                        hops: iteration + 1,
                        reason: AbandonReason::NoNeighbor,
                    };
                }
            }
        } else {
            pos = ne_end;
            ne_pts.push(pos);
            ce_project.push(pos);

            let far = ne_edge.far_node(ne.originating);
            match find_edge_sharing_bisector(
                network,
                far,
                ne.edge,
                &bisector,
                pos,
                Direction::Prev,
                tolerance,
            ) {
                Some(prev) => {
                    network.mut_edge(ne.edge).propose_left(
                        ne.originating,
                        mem::take(&mut ne_pts),
                        mem::take(&mut ne_project),
                    );
                    touched.push(ne.edge);
                    ne = prev;
                }
                None => {
                    break WalkOutcome::Abandoned {
                        hops: iteration + 1,
                        reason: AbandonReason::NoNeighbor,
                    };
                }
            }
        }

        iteration += 1;
    };

    let commit = matches!(outcome, WalkOutcome::Committed { .. });
    for id in touched {
        network.mut_edge(id).apply_multi_segments(commit);
    }
    outcome
}

/// Missing the far ends straight from the junction is the ordinary case, like a bend through a
/// degree-2 node. Nothing has been proposed yet.
fn missed_far_constraint(iteration: usize) -> WalkOutcome {
    if iteration == 0 {
        WalkOutcome::NotMultiSegment
    } else {
        WalkOutcome::Abandoned {
            hops: iteration + 1,
            reason: AbandonReason::MissedFarConstraint,
        }
    }
}

/// Look around a node, starting beside `from` and going in one direction, for an edge whose near
/// constraint meets the bisector at `pos`. The edge continuing a chain shares its constraint ray
/// with the edge just finished.
fn find_edge_sharing_bisector(
    network: &Network,
    node: NodeID,
    from: EdgeID,
    bisector: &Ray,
    pos: LonLat,
    direction: Direction,
    tolerance: Distance,
) -> Option<EdgeInfo> {
    let node = network.get_n(node);
    let start = node.find(from)? as isize;
    let step = if direction == Direction::Next { 1 } else { -1 };

    for i in 1..node.degree() as isize {
        let candidate = *wraparound_get(node.edges(), start + step * i);
        let edge = network.get_e(candidate.edge);
        let quadrants = match direction {
            Direction::Next => [
                Quadrant::near_right(candidate.originating),
                Quadrant::near_left(candidate.originating),
            ],
            Direction::Prev => [
                Quadrant::near_left(candidate.originating),
                Quadrant::near_right(candidate.originating),
            ],
        };
        for q in quadrants {
            if let Some(ray) = edge.constraint(q) {
                if let Some(hit) = bisector.intersection_ray(&ray) {
                    if hit.approx_eq(pos, tolerance) {
                        return Some(candidate);
                    }
                }
            }
        }
    }
    None
}
