use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use geom::{Distance, EPSILON_DIST};

/// Tunable parameters. Every field has a default, so a JSON file only needs to list overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// If set, write GeoJSON debug layers under this directory.
    pub debug_root: Option<String>,
    /// Segment endpoints this close together become one node.
    pub snap_tolerance: Distance,
    /// Two computed points this close together are the same point.
    pub point_tolerance: Distance,
    /// How far edge side lines extend past the endpoints in debug output.
    pub side_extension: Distance,
    /// Split a short cap edge off every dead-end.
    pub add_cap_edges: bool,
    pub cap_length: Distance,
    /// Dead-end edges this short or shorter aren't split.
    pub min_cap_split_length: Distance,
    /// Scales the V repeat distance from the texture callback.
    pub v_repeat_ratio: f64,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            debug_root: None,
            snap_tolerance: EPSILON_DIST,
            point_tolerance: EPSILON_DIST,
            side_extension: Distance::const_meters(10.0),
            add_cap_edges: true,
            cap_length: Distance::const_meters(0.5),
            min_cap_split_length: Distance::const_meters(1.0),
            v_repeat_ratio: 1.0,
        }
    }
}

impl Options {
    pub fn load(path: &str) -> Result<Options> {
        abstutil::read_json(path).with_context(|| format!("loading options from {}", path))
    }
}
