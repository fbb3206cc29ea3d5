//! Turns networks of linear features (taxiway centerlines, painted lines, runway edges), given as
//! width-tagged segments between geodetic points, into closed ribbon polygons with texture
//! parameters.
//!
//! The pipeline, run by [`IntersectionGenerator::execute`]:
//!
//! 1. Snap segment endpoints into shared [`Node`]s and build an arena of [`Edge`]s.
//! 2. Optionally clean the network and add short cap edges at dead-ends.
//! 3. At every node, build constraint rays: perpendiculars at caps, bisectors between angularly
//!    adjacent edges at junctions.
//! 4. Intersect each constraint with the edge side it bounds to find the ribbon corners.
//! 5. Where edges converge so sharply that the boundary between them spans more than one node,
//!    walk the bisector through the chain of nodes and replace the simple corners.
//! 6. Assemble left and right contours per edge, verify them, then walk chains of edges to assign
//!    continuous texture coordinates.

#[macro_use]
extern crate log;

mod bisect;
mod builder;
mod constraints;
mod contour;
mod debug;
mod edge;
mod multiseg;
mod network;
mod node;
mod options;
mod snap;
mod texture;
mod verify;

pub use crate::builder::{IntersectionGenerator, Results, WalkRecord};
pub use crate::constraints::{MultiSegment, Quadrant};
pub use crate::debug::DebugLayers;
pub use crate::edge::{Edge, EdgeFlag, EdgeID};
pub use crate::multiseg::{AbandonReason, WalkOutcome};
pub use crate::network::Network;
pub use crate::node::{EdgeInfo, Node, NodeID, TextureState};
pub use crate::options::Options;
pub use crate::snap::PointSnapper;
pub use crate::texture::{
    TexInfo, TexLimits, TexMethod, TexParams, TextureInfo, TexturedPolygon,
};
