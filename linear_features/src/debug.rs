use std::collections::BTreeMap;

use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use geom::{Distance, Line, LonLat, Ray};

use crate::EdgeID;

/// How long to draw rays.
const RAY_LENGTH: Distance = Distance::const_meters(50.0);

/// Named GeoJSON layers describing what happened to each edge. Only collected when a root
/// directory is configured; otherwise every method is a no-op.
pub struct DebugLayers {
    root: Option<String>,
    layers: BTreeMap<(EdgeID, String), Vec<Feature>>,
}

impl DebugLayers {
    pub fn new(root: Option<String>) -> DebugLayers {
        DebugLayers {
            root,
            layers: BTreeMap::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.root.is_some()
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn add_ray(&mut self, edge: EdgeID, layer: &str, label: &str, ray: &Ray) {
        self.add(edge, layer, label, ray.to_line(RAY_LENGTH).to_geojson());
    }

    pub fn add_pt(&mut self, edge: EdgeID, layer: &str, label: &str, pt: LonLat) {
        self.add(edge, layer, label, pt.to_geojson());
    }

    pub fn add_line(&mut self, edge: EdgeID, layer: &str, label: &str, line: &Line) {
        self.add(edge, layer, label, line.to_geojson());
    }

    pub fn add_path(&mut self, edge: EdgeID, layer: &str, label: &str, pts: &[LonLat]) {
        if pts.len() < 2 {
            return;
        }
        let coords = pts.iter().map(|pt| vec![pt.x(), pt.y()]).collect();
        self.add(edge, layer, label, Geometry::new(Value::LineString(coords)));
    }

    fn add(&mut self, edge: EdgeID, layer: &str, label: &str, geometry: Geometry) {
        if !self.enabled() {
            return;
        }
        let mut feature = Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("label", label);
        feature.set_property("edge", edge.0);
        self.layers
            .entry((edge, layer.to_string()))
            .or_insert_with(Vec::new)
            .push(feature);
    }

    /// Write every layer to `<root>/edge_<id>/<layer>.geojson`.
    pub fn write(&self) -> Result<()> {
        let root = match self.root {
            Some(ref root) => root,
            None => return Ok(()),
        };
        for ((edge, layer), features) in &self.layers {
            let gj = GeoJson::FeatureCollection(FeatureCollection {
                bbox: None,
                features: features.clone(),
                foreign_members: None,
            });
            let path = format!("{}/edge_{:04}/{}.geojson", root, edge.0, layer);
            abstutil::write_json(&path, &gj)?;
        }
        info!("Wrote {} debug layers to {}", self.layers.len(), root);
        Ok(())
    }
}
