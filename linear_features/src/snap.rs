use rstar::{RTree, RTreeObject, AABB};

use geom::{Angle, Distance, LonLat};

use crate::NodeID;

struct SnapPoint {
    pt: LonLat,
    node: NodeID,
}

impl RTreeObject for SnapPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.pt.x(), self.pt.y()])
    }
}

/// Maps positions to nodes, so that segments sharing an endpoint (within some tolerance) share
/// a node.
pub struct PointSnapper {
    tree: RTree<SnapPoint>,
    tolerance: Distance,
}

impl PointSnapper {
    pub fn new(tolerance: Distance) -> PointSnapper {
        PointSnapper {
            tree: RTree::new(),
            tolerance,
        }
    }

    /// The closest known node within the tolerance.
    pub fn find(&self, pt: LonLat) -> Option<NodeID> {
        // Pad the search box a bit; the exact distance check below decides
        let pad = self.tolerance * 1.5;
        let dlat = (pt.project_away(pad, Angle::ZERO).y() - pt.y()).abs();
        let dlon = (pt.project_away(pad, Angle::degrees(90.0)).x() - pt.x()).abs();
        let envelope = AABB::from_corners(
            [pt.x() - dlon, pt.y() - dlat],
            [pt.x() + dlon, pt.y() + dlat],
        );

        self.tree
            .locate_in_envelope(&envelope)
            .map(|snap| (snap.pt.gps_dist(pt), snap.node))
            .filter(|(dist, _)| *dist <= self.tolerance)
            .min()
            .map(|(_, node)| node)
    }

    pub fn insert(&mut self, pt: LonLat, node: NodeID) {
        self.tree.insert(SnapPoint { pt, node });
    }

    /// Returns the existing node near this point, or calls `make_node` and remembers the result.
    pub fn find_or_insert<F: FnOnce(LonLat) -> NodeID>(
        &mut self,
        pt: LonLat,
        make_node: F,
    ) -> NodeID {
        if let Some(node) = self.find(pt) {
            return node;
        }
        let node = make_node(pt);
        self.insert(pt, node);
        node
    }
}
