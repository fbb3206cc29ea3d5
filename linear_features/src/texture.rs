//! Assign texture coordinates by walking chains of edges, so V keeps counting up along a chain
//! and markings line up across nodes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use geom::{Angle, Distance, LonLat};

use crate::{EdgeFlag, EdgeID, EdgeInfo, Network, NodeID, TextureState};

/// What the texture callback says about one feature type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexInfo {
    pub material: String,
    /// Bounds of this feature's image within the atlas
    pub u_start: f64,
    pub u_end: f64,
    pub v_start: f64,
    pub v_end: f64,
    /// Distance along the feature covered by one full repeat of the image
    pub v_repeat: Distance,
}

/// Supplies material and atlas parameters per feature type. Returning an error for an unknown
/// type aborts the whole run.
pub trait TextureInfo {
    fn tex_info(&self, feature_type: u32, cap: bool) -> Result<TexInfo>;
}

impl<F: Fn(u32, bool) -> Result<TexInfo>> TextureInfo for F {
    fn tex_info(&self, feature_type: u32, cap: bool) -> Result<TexInfo> {
        self(feature_type, cap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TexMethod {
    /// Project along the edge, clipping U to a range and letting V run.
    TpsClipU { min_u: f64, max_u: f64 },
    /// Map the whole polygon onto a single atlas cell.
    Atlas1x1,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexParams {
    /// The texture origin
    pub anchor: LonLat,
    pub width: Distance,
    pub length: Distance,
    pub heading: Angle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexLimits {
    pub u_start: f64,
    pub v_start: f64,
    pub u_end: f64,
    pub v_end: f64,
}

/// A finished ribbon, ready for triangulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexturedPolygon {
    pub edge: EdgeID,
    pub feature_type: u32,
    /// The right contour followed by the left contour
    pub ring: Vec<LonLat>,
    pub material: String,
    pub method: TexMethod,
    pub params: TexParams,
    pub limits: TexLimits,
    /// 1 for caps, 0 otherwise
    pub constant_attribute: u8,
}

impl TexturedPolygon {
    pub fn to_geojson(&self) -> geojson::Feature {
        let mut coords: Vec<Vec<f64>> = self.ring.iter().map(|pt| vec![pt.x(), pt.y()]).collect();
        if self.ring.first() != self.ring.last() {
            if let Some(first) = coords.first().cloned() {
                coords.push(first);
            }
        }
        let mut feature = geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Polygon(vec![coords]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("edge", self.edge.0);
        feature.set_property("type", self.feature_type);
        feature.set_property("material", self.material.clone());
        feature.set_property("v_start", self.limits.v_start);
        feature.set_property("v_end", self.limits.v_end);
        feature
    }
}

/// Texture every edge exactly once. Dead-ends start chains; a chain continues through a node
/// onto the untextured edge heading most nearly straight on, and restarts V whenever it has to
/// backtrack. Caps always span `cap_length`, whatever their real length.
pub fn texture_network(
    network: &mut Network,
    tex_info: &dyn TextureInfo,
    v_repeat_ratio: f64,
    cap_length: Distance,
) -> Result<Vec<TexturedPolygon>> {
    let mut polygons = Vec::new();
    let mut stack: Vec<NodeID> = Vec::new();
    let mut v_end = 0.0;
    let max_iterations = 2 * network.all_edges().len() + network.all_nodes().len();
    let mut iterations = 0;

    while let Some(start) = pick_start_node(network) {
        let mut current = untraversed_edge(network, start, None).map(|info| (start, info));
        let mut reset_v = true;

        while let Some((node, info)) = current {
            iterations += 1;
            if iterations > max_iterations {
                warn!("Texturing didn't finish after {} steps", max_iterations);
                return Ok(polygons);
            }

            if reset_v {
                v_end = 0.0;
            }
            if let Some(polygon) =
                texture_edge(network, info, tex_info, v_repeat_ratio, cap_length, &mut v_end)?
            {
                polygons.push(polygon);
            }

            if network.texture_state(node) != TextureState::Complete {
                stack.push(node);
            }

            let far = network.get_e(info.edge).far_node(info.originating);
            if network.texture_state(far) == TextureState::Complete || network.get_n(far).is_cap()
            {
                current = None;
                while let Some(node) = stack.pop() {
                    if let Some(info) = untraversed_edge(network, node, None) {
                        current = Some((node, info));
                        break;
                    }
                }
                reset_v = true;
            } else {
                current = untraversed_edge(network, far, Some(info.heading)).map(|i| (far, i));
                reset_v = false;
            }
        }
    }

    Ok(polygons)
}

/// Dead-ends first, then anything left over.
fn pick_start_node(network: &Network) -> Option<NodeID> {
    let unfinished = |id: &NodeID| network.texture_state(*id) != TextureState::Complete;
    let nodes = network.all_nodes();
    nodes
        .iter()
        .filter(|n| n.is_cap())
        .map(|n| n.id)
        .find(unfinished)
        .or_else(|| {
            nodes
                .iter()
                .filter(|n| n.degree() > 0)
                .map(|n| n.id)
                .find(unfinished)
        })
}

/// An untextured edge at a node. If traveling along some heading, prefer going straight.
fn untraversed_edge(network: &Network, node: NodeID, heading: Option<Angle>) -> Option<EdgeInfo> {
    let candidates = network
        .get_n(node)
        .edges()
        .iter()
        .filter(|info| !network.get_e(info.edge).traversed);
    match heading {
        Some(heading) => candidates.min_by(|a, b| {
            let turn_a = heading.shortest_rotation_towards(a.heading).abs();
            let turn_b = heading.shortest_rotation_towards(b.heading).abs();
            turn_a.total_cmp(&turn_b)
        }),
        None => candidates.min_by_key(|info| info.edge),
    }
    .cloned()
}

fn texture_edge(
    network: &mut Network,
    info: EdgeInfo,
    tex_info: &dyn TextureInfo,
    v_repeat_ratio: f64,
    cap_length: Distance,
    v_end: &mut f64,
) -> Result<Option<TexturedPolygon>> {
    let cap = {
        let edge = network.get_e(info.edge);
        network.get_n(edge.src).is_cap() || network.get_n(edge.dst).is_cap()
    };
    let edge = network.mut_edge(info.edge);
    edge.traversed = true;

    if edge.right_contour.is_empty() || edge.left_contour.is_empty() {
        error!("Can't texture {}; it has no contours", edge.id);
        return Ok(None);
    }

    let tex = tex_info
        .tex_info(edge.feature_type, cap)
        .with_context(|| format!("texturing {}", edge.id))?;
    let anchor = if info.originating {
        edge.bot_left
    } else {
        edge.top_right
    };
    let heading = edge.heading(info.originating);

    let (method, params, limits, constant_attribute) = if cap {
        (
            TexMethod::Atlas1x1,
            TexParams {
                anchor,
                width: edge.width,
                length: cap_length,
                heading,
            },
            TexLimits {
                u_start: tex.u_start,
                v_start: tex.v_start,
                u_end: tex.u_end,
                v_end: tex.v_end,
            },
            1,
        )
    } else {
        let length = edge.length();
        let repeat = (tex.v_repeat * v_repeat_ratio).inner_meters();
        let v_start = v_end.rem_euclid(1.0);
        *v_end = if repeat > 0.0 {
            v_start + length.inner_meters() / repeat
        } else {
            warn!("{} has a V repeat of {}m; not advancing V", edge.id, repeat);
            v_start
        };
        (
            TexMethod::TpsClipU {
                min_u: -1.0,
                max_u: 1.0,
            },
            TexParams {
                anchor,
                width: edge.width,
                length,
                heading,
            },
            TexLimits {
                u_start: tex.u_start,
                v_start,
                u_end: tex.u_end,
                v_end: *v_end,
            },
            0,
        )
    };

    edge.flags.insert(EdgeFlag::Textured);
    Ok(Some(TexturedPolygon {
        edge: edge.id,
        feature_type: edge.feature_type,
        ring: edge.polygon(),
        material: tex.material,
        method,
        params,
        limits,
        constant_attribute,
    }))
}
