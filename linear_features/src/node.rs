use std::fmt;

use serde::{Deserialize, Serialize};

use abstutil::wraparound_get;
use geom::{Angle, LonLat};

use crate::{Edge, EdgeID, Network};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeID(pub usize);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node #{}", self.0)
    }
}

/// One edge, as seen from one of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeInfo {
    pub edge: EdgeID,
    /// True if the node holding this info is the edge's `src`.
    pub originating: bool,
    /// The course from the node holding this info toward the edge's other endpoint.
    pub heading: Angle,
}

impl EdgeInfo {
    pub fn new(edge: &Edge, originating: bool) -> EdgeInfo {
        EdgeInfo {
            edge: edge.id,
            originating,
            heading: edge.heading(originating),
        }
    }

    /// Recompute the course from the edge's current endpoints, instead of using the one cached
    /// when this info was made.
    pub fn geodesy_heading(&self, network: &Network) -> Angle {
        network.get_e(self.edge).heading(self.originating)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureState {
    Untextured,
    PartiallyTextured,
    Complete,
}

/// A place where one or more edges meet or end.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeID,
    pub pos: LonLat,
    /// Ascending by heading
    edges: Vec<EdgeInfo>,
}

impl Node {
    pub(crate) fn new(id: NodeID, pos: LonLat) -> Node {
        Node {
            id,
            pos,
            edges: Vec::new(),
        }
    }

    pub fn edges(&self) -> &[EdgeInfo] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn is_cap(&self) -> bool {
        self.edges.len() == 1
    }

    /// The position of an edge in the angular order, if it touches this node.
    pub fn find(&self, edge: EdgeID) -> Option<usize> {
        self.edges.iter().position(|info| info.edge == edge)
    }

    pub fn get_info(&self, edge: EdgeID) -> Option<EdgeInfo> {
        self.find(edge).map(|idx| self.edges[idx])
    }

    /// The angularly adjacent edge infos, `(previous, next)`, wrapping around.
    pub fn neighbors(&self, idx: usize) -> (EdgeInfo, EdgeInfo) {
        let idx = idx as isize;
        (
            *wraparound_get(&self.edges, idx - 1),
            *wraparound_get(&self.edges, idx + 1),
        )
    }

    pub(crate) fn add_edge(&mut self, info: EdgeInfo) {
        let heading = info.heading.normalized_degrees();
        let idx = self
            .edges
            .partition_point(|other| other.heading.normalized_degrees() <= heading);
        self.edges.insert(idx, info);
    }

    pub(crate) fn remove_edge(&mut self, edge: EdgeID) {
        if let Some(idx) = self.find(edge) {
            self.edges.remove(idx);
        } else {
            warn!("{} doesn't have {} to remove", self.id, edge);
        }
    }
}
