use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use geojson::{FeatureCollection, GeoJson};
use serde::Deserialize;

use geom::{Distance, LonLat};
use linear_features::{IntersectionGenerator, Options, TexInfo, TextureInfo};

#[derive(Deserialize)]
struct Input {
    segments: Vec<Segment>,
    /// Keyed by feature type
    materials: BTreeMap<u32, Material>,
}

#[derive(Deserialize)]
struct Segment {
    /// [longitude, latitude]
    start: [f64; 2],
    end: [f64; 2],
    width: Distance,
    feature_type: u32,
}

#[derive(Clone, Deserialize)]
struct Material {
    line: TexInfo,
    cap: TexInfo,
}

struct Materials(BTreeMap<u32, Material>);

impl TextureInfo for Materials {
    fn tex_info(&self, feature_type: u32, cap: bool) -> Result<TexInfo> {
        let material = self
            .0
            .get(&feature_type)
            .ok_or_else(|| anyhow!("no material for feature type {}", feature_type))?;
        Ok(if cap {
            material.cap.clone()
        } else {
            material.line.clone()
        })
    }
}

pub fn run(input: String, output: String, opts: Options, clean: bool) -> Result<()> {
    let input: Input = abstutil::read_json(&input)?;
    let mut gen = IntersectionGenerator::new(opts, Materials(input.materials));
    for seg in input.segments {
        gen.insert(
            LonLat::new(seg.start[0], seg.start[1]),
            LonLat::new(seg.end[0], seg.end[1]),
            seg.width,
            seg.feature_type,
        );
    }
    info!("Processing {} segments", gen.num_segments());

    let results = gen.execute(clean).context("generating linear features")?;
    if !results.failed_verification.is_empty() {
        warn!(
            "{} edges failed verification: {:?}",
            results.failed_verification.len(),
            results.failed_verification
        );
    }

    let gj = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: results.polygons.iter().map(|p| p.to_geojson()).collect(),
        foreign_members: None,
    });
    abstutil::write_json(&output, &gj)?;
    println!("Wrote {} polygons to {}", results.polygons.len(), output);
    Ok(())
}
