use serde::{Deserialize, Serialize};

use geom::{Distance, LonLat};

use crate::{Edge, EdgeID, EdgeInfo, Node, NodeID, TextureState};

/// Arenas of nodes and edges. IDs are indices and never change once handed out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    side_extension: Distance,
}

impl Network {
    pub fn new(side_extension: Distance) -> Network {
        Network {
            nodes: Vec::new(),
            edges: Vec::new(),
            side_extension,
        }
    }

    pub fn all_nodes(&self) -> &Vec<Node> {
        &self.nodes
    }

    pub fn all_edges(&self) -> &Vec<Edge> {
        &self.edges
    }

    pub fn get_n(&self, id: NodeID) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_e(&self, id: EdgeID) -> &Edge {
        &self.edges[id.0]
    }

    pub(crate) fn mut_edge(&mut self, id: EdgeID) -> &mut Edge {
        &mut self.edges[id.0]
    }

    pub(crate) fn all_edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    pub fn add_node(&mut self, pos: LonLat) -> NodeID {
        let id = NodeID(self.nodes.len());
        self.nodes.push(Node::new(id, pos));
        id
    }

    pub fn add_edge(
        &mut self,
        src: NodeID,
        dst: NodeID,
        width: Distance,
        feature_type: u32,
    ) -> EdgeID {
        let id = EdgeID(self.edges.len());
        let edge = Edge::new(
            id,
            src,
            dst,
            self.nodes[src.0].pos,
            self.nodes[dst.0].pos,
            width,
            feature_type,
            self.side_extension,
        );
        self.nodes[src.0].add_edge(EdgeInfo::new(&edge, true));
        self.nodes[dst.0].add_edge(EdgeInfo::new(&edge, false));
        self.edges.push(edge);
        id
    }

    /// Split an edge at a new node. `originating` describes the edge from the endpoint that
    /// stays attached: if true, `src` stays and the edge now ends at `new_node`, otherwise `dst`
    /// stays and the edge now starts at `new_node`. A new edge covers the remainder, keeping the
    /// original direction, and is returned.
    pub fn split_edge(&mut self, id: EdgeID, originating: bool, new_node: NodeID) -> EdgeID {
        let (old_node, width, feature_type) = {
            let edge = &self.edges[id.0];
            (
                edge.far_node(originating),
                edge.width,
                edge.feature_type,
            )
        };

        self.nodes[old_node.0].remove_edge(id);
        let pos = self.nodes[new_node.0].pos;
        let side_extension = self.side_extension;
        // The edge loses the end that's not staying attached
        self.edges[id.0].set_endpoint(!originating, new_node, pos, side_extension);

        // The staying endpoint's heading may have shifted slightly
        let stay = self.edges[id.0].other_node(new_node);
        self.nodes[stay.0].remove_edge(id);
        self.nodes[stay.0].add_edge(EdgeInfo::new(&self.edges[id.0], originating));
        self.nodes[new_node.0].add_edge(EdgeInfo::new(&self.edges[id.0], !originating));

        if originating {
            self.add_edge(new_node, old_node, width, feature_type)
        } else {
            self.add_edge(old_node, new_node, width, feature_type)
        }
    }

    /// Give every dead-end a short edge of its own, so the end can be textured differently.
    pub fn add_cap_edges(&mut self, cap_length: Distance, min_length_to_split: Distance) {
        for idx in 0..self.nodes.len() {
            let node = &self.nodes[idx];
            if !node.is_cap() {
                continue;
            }
            let info = node.edges()[0];
            let pos = node.pos;
            let length = self.edges[info.edge.0].length();
            if length <= min_length_to_split {
                continue;
            }
            let new_node = self.add_node(pos.project_away(cap_length, info.heading));
            let new_edge = self.split_edge(info.edge, info.originating, new_node);
            debug!(
                "Capped {} at {}; {} covers the rest",
                info.edge, self.nodes[idx].id, new_edge
            );
        }
    }

    pub fn texture_state(&self, id: NodeID) -> TextureState {
        let node = &self.nodes[id.0];
        let done = node
            .edges()
            .iter()
            .filter(|info| self.edges[info.edge.0].traversed)
            .count();
        if done == 0 {
            TextureState::Untextured
        } else if done < node.degree() {
            TextureState::PartiallyTextured
        } else {
            TextureState::Complete
        }
    }
}
