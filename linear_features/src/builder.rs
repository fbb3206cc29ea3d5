use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use geom::{Distance, LonLat};

use crate::texture::texture_network;
use crate::{
    bisect, multiseg, DebugLayers, Edge, EdgeFlag, EdgeID, Network, NodeID, Options,
    PointSnapper, Quadrant, TextureInfo, TexturedPolygon, WalkOutcome,
};

/// One input segment, as given to `insert`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Segment {
    start: LonLat,
    end: LonLat,
    width: Distance,
    feature_type: u32,
}

impl Segment {
    /// Why this segment can't become an edge, if it can't.
    fn problem(&self) -> Option<String> {
        for pt in [self.start, self.end] {
            if !pt.x().is_finite() || !pt.y().is_finite() {
                return Some(format!("{} isn't a finite position", pt));
            }
        }
        if self.width <= Distance::ZERO {
            return Some(format!("its width is {}", self.width));
        }
        None
    }
}

/// The result of walking the bisector between two edges adjacent at a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkRecord {
    pub node: NodeID,
    pub cur: EdgeID,
    pub next: EdgeID,
    pub outcome: WalkOutcome,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Results {
    /// One per edge that could be textured, ordered by edge
    pub polygons: Vec<TexturedPolygon>,
    /// Edges missing corners or texture. They're still reported in `polygons` when possible.
    pub failed_verification: Vec<EdgeID>,
    pub walks: Vec<WalkRecord>,
}

/// Collects segments, then turns them into textured ribbons.
pub struct IntersectionGenerator<T: TextureInfo> {
    opts: Options,
    tex_info: T,
    segments: Vec<Segment>,
    network: Network,
    debug: DebugLayers,
}

impl<T: TextureInfo> IntersectionGenerator<T> {
    pub fn new(opts: Options, tex_info: T) -> IntersectionGenerator<T> {
        let debug = DebugLayers::new(opts.debug_root.clone());
        let network = Network::new(opts.side_extension);
        IntersectionGenerator {
            opts,
            tex_info,
            segments: Vec::new(),
            network,
            debug,
        }
    }

    /// Add one segment of a linear feature. Nothing is computed until `execute`.
    pub fn insert(&mut self, start: LonLat, end: LonLat, width: Distance, feature_type: u32) {
        self.segments.push(Segment {
            start,
            end,
            width,
            feature_type,
        });
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// The network built by the last call to `execute`.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Run the whole pipeline over everything inserted so far. The network is rebuilt from the
    /// segments each time. In `clean` mode, duplicate segments are dropped and nodes lying in the
    /// middle of an edge split it.
    pub fn execute(&mut self, clean: bool) -> Result<Results> {
        self.debug = DebugLayers::new(self.opts.debug_root.clone());
        self.network = self.build_network(clean);
        if self.network.all_edges().is_empty() {
            info!("No segments to process");
            return Ok(Results {
                polygons: Vec::new(),
                failed_verification: Vec::new(),
                walks: Vec::new(),
            });
        }
        if clean {
            self.split_t_junctions();
        }
        if self.opts.add_cap_edges {
            self.network
                .add_cap_edges(self.opts.cap_length, self.opts.min_cap_split_length);
        }
        info!(
            "Built a network with {} nodes and {} edges",
            self.network.all_nodes().len(),
            self.network.all_edges().len()
        );

        bisect::constrain_nodes(&mut self.network);
        bisect::intersect_constraints_and_sides(&mut self.network, &mut self.debug);

        let walks = multiseg::complete_multi_segment_intersections(
            &mut self.network,
            self.opts.point_tolerance,
            &mut self.debug,
        )
        .into_iter()
        .map(|(node, cur, next, outcome)| WalkRecord {
            node,
            cur,
            next,
            outcome,
        })
        .collect();

        for idx in 0..self.network.all_edges().len() {
            let (src, dst) = {
                let edge = &self.network.all_edges()[idx];
                (edge.src, edge.dst)
            };
            let src_degree = self.network.get_n(src).degree();
            let dst_degree = self.network.get_n(dst).degree();
            self.network.mut_edge(EdgeID(idx)).complete(
                src_degree,
                dst_degree,
                self.opts.point_tolerance,
            );
        }
        if self.debug.enabled() {
            for edge in self.network.all_edges() {
                dump_contours(edge, &mut self.debug);
            }
        }

        let mut failed = BTreeSet::new();
        for edge in self.network.all_edges() {
            if !edge.verify(
                EdgeFlag::BottomResolved | EdgeFlag::TopResolved,
                &mut self.debug,
            ) {
                failed.insert(edge.id);
            }
        }

        let mut polygons = texture_network(
            &mut self.network,
            &self.tex_info,
            self.opts.v_repeat_ratio,
            self.opts.cap_length,
        )?;
        polygons.sort_by_key(|p| p.edge);
        for edge in self.network.all_edges() {
            if !edge.verify(EdgeFlag::Textured.into(), &mut self.debug) {
                failed.insert(edge.id);
            }
        }
        if !failed.is_empty() {
            warn!("{} edges failed verification", failed.len());
        }

        if self.debug.enabled() {
            self.debug.write().context("writing debug layers")?;
        }

        Ok(Results {
            polygons,
            failed_verification: failed.into_iter().collect(),
            walks,
        })
    }

    fn build_network(&self, clean: bool) -> Network {
        let mut network = Network::new(self.opts.side_extension);
        let mut snapper = PointSnapper::new(self.opts.snap_tolerance);
        let mut seen: BTreeSet<(NodeID, NodeID)> = BTreeSet::new();

        for seg in &self.segments {
            if let Some(problem) = seg.problem() {
                warn!(
                    "Skipping a segment from {} to {}; {}",
                    seg.start, seg.end, problem
                );
                continue;
            }
            let src = snapper.find_or_insert(seg.start, |pt| network.add_node(pt));
            let dst = snapper.find_or_insert(seg.end, |pt| network.add_node(pt));
            if src == dst {
                warn!(
                    "Skipping a segment from {} to {}; its ends are the same node",
                    seg.start, seg.end
                );
                continue;
            }
            if clean && !seen.insert((src.min(dst), src.max(dst))) {
                debug!("Dropping a duplicate segment between {} and {}", src, dst);
                continue;
            }
            network.add_edge(src, dst, seg.width, seg.feature_type);
        }
        network
    }

    /// Wherever a node sits on some other edge, split that edge there.
    fn split_t_junctions(&mut self) {
        let tolerance = self.opts.snap_tolerance;
        for n in 0..self.network.all_nodes().len() {
            let node = NodeID(n);
            if self.network.get_n(node).degree() == 0 {
                continue;
            }
            let pos = self.network.get_n(node).pos;
            for e in 0..self.network.all_edges().len() {
                let edge = self.network.get_e(EdgeID(e));
                if edge.src == node || edge.dst == node {
                    continue;
                }
                if edge.skeleton().contains_pt(pos, tolerance) {
                    let new_edge = self.network.split_edge(EdgeID(e), true, node);
                    debug!("Split {} at {}; {} covers the rest", EdgeID(e), node, new_edge);
                }
            }
        }
    }
}

fn dump_contours(edge: &Edge, debug: &mut DebugLayers) {
    for q in Quadrant::ALL {
        if let Some(pt) = edge.corner(q) {
            debug.add_pt(edge.id, "contours", &format!("{:?}", q), pt);
        }
    }
    debug.add_path(edge.id, "contours", "right", &edge.right_contour);
    debug.add_path(edge.id, "contours", "left", &edge.left_contour);
}
