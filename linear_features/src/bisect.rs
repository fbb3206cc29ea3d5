//! Every node contributes one constraint ray to each quadrant of its incident edges that touches
//! it. Intersecting those rays with the edge sides gives the ribbon corners.

use geom::Ray;

use crate::{DebugLayers, EdgeFlag, Network, NodeID, Quadrant};

/// Edges shorter than this are suspicious, but still handled.
const SHORT_EDGE_METERS: f64 = 0.5;

/// Build constraint rays at every node, handling lower degree nodes first.
pub fn constrain_nodes(network: &mut Network) {
    let mut order: Vec<(usize, NodeID)> = network
        .all_nodes()
        .iter()
        .map(|n| (n.degree(), n.id))
        .collect();
    order.sort();

    for (degree, id) in order {
        match degree {
            0 => {}
            1 => generate_cap_rays(network, id),
            _ => generate_bisect_rays(network, id),
        }
    }
}

/// A dead-end gets rays perpendicular to its only edge.
fn generate_cap_rays(network: &mut Network, id: NodeID) {
    let node = network.get_n(id);
    let pos = node.pos;
    let info = node.edges()[0];
    let heading = info.geodesy_heading(network);

    let left = Ray::new(pos, heading.rotate_degs(-90.0));
    let right = Ray::new(pos, heading.rotate_degs(90.0));
    let edge = network.mut_edge(info.edge);
    edge.set_constraint(Quadrant::near_right(info.originating), right);
    edge.set_constraint(Quadrant::near_left(info.originating), left);
}

/// At a junction, the rays bisect the gaps between angularly adjacent edges. Turning clockwise
/// from an edge's heading, the first gap is on its right.
fn generate_bisect_rays(network: &mut Network, id: NodeID) {
    let node = network.get_n(id);
    let pos = node.pos;
    let mut rays = Vec::new();
    for (idx, cur) in node.edges().iter().enumerate() {
        let (prev, next) = node.neighbors(idx);
        let toward_prev = Ray::new(pos, prev.heading.bisect_clockwise(cur.heading));
        let toward_next = Ray::new(pos, cur.heading.bisect_clockwise(next.heading));

        let length = network.get_e(cur.edge).length();
        if length.inner_meters() < SHORT_EDGE_METERS {
            debug!("{} is only {} long", cur.edge, length);
        }
        rays.push((*cur, toward_prev, toward_next));
    }

    for (cur, toward_prev, toward_next) in rays {
        let edge = network.mut_edge(cur.edge);
        edge.set_constraint(Quadrant::near_right(cur.originating), toward_next);
        edge.set_constraint(Quadrant::near_left(cur.originating), toward_prev);
    }
}

/// Find every edge's corners. Failures are logged and dumped, and leave the corner unset.
pub fn intersect_constraints_and_sides(network: &mut Network, debug: &mut DebugLayers) {
    for edge in network.all_edges_mut() {
        for q in Quadrant::ALL {
            let corner = match edge.constraint(q) {
                Some(ray) => {
                    let hit = ray.intersection_infinite(&edge.side(q).infinite());
                    if hit.is_none() {
                        warn!(
                            "{}'s {:?} constraint {} doesn't meet its side {}",
                            edge.id,
                            q,
                            ray,
                            edge.side(q)
                        );
                        debug.add_ray(edge.id, "failed_corners", &format!("{:?}", q), &ray);
                        debug.add_line(edge.id, "failed_corners", "side", edge.side(q));
                    }
                    hit
                }
                None => {
                    warn!("{} has no {:?} constraint", edge.id, q);
                    None
                }
            };
            edge.set_corner(q, corner);
        }

        if edge.corner(Quadrant::BottomLeft).is_some()
            && edge.corner(Quadrant::BottomRight).is_some()
        {
            edge.flags.insert(EdgeFlag::BottomResolved);
        }
        if edge.corner(Quadrant::TopLeft).is_some() && edge.corner(Quadrant::TopRight).is_some() {
            edge.flags.insert(EdgeFlag::TopResolved);
        }
    }
}
