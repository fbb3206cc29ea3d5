use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{cross, Angle, Distance, LonLat};

/// A line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(LonLat, LonLat);

impl Line {
    pub fn new(pt1: LonLat, pt2: LonLat) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> LonLat {
        self.0
    }

    pub fn pt2(&self) -> LonLat {
        self.1
    }

    pub fn length(&self) -> Distance {
        self.0.gps_dist(self.1)
    }

    /// The course from the first point to the second.
    pub fn angle(&self) -> Angle {
        self.0.course_to(self.1)
    }

    pub fn infinite(&self) -> InfiniteLine {
        InfiniteLine(self.0, self.1)
    }

    /// Splits the vector from the first point to `pt` into the distance along the segment's
    /// direction and the signed distance to the right of it.
    pub fn decompose(&self, pt: LonLat) -> (Distance, Distance) {
        let d = self.1.offset_from(self.0);
        let len = (d[0] * d[0] + d[1] * d[1]).sqrt();
        if len == 0.0 {
            return (Distance::ZERO, self.0.gps_dist(pt));
        }
        let v = pt.offset_from(self.0);
        let along = (d[0] * v[0] + d[1] * v[1]) / len;
        let right = -cross(d, v) / len;
        (Distance::meters(along), Distance::meters(right))
    }

    /// True if the point is within `threshold` of some point on the segment.
    pub fn contains_pt(&self, pt: LonLat, threshold: Distance) -> bool {
        let (along, right) = self.decompose(pt);
        if along < Distance::ZERO {
            return self.0.approx_eq(pt, threshold);
        }
        if along > self.length() {
            return self.1.approx_eq(pt, threshold);
        }
        right.abs() <= threshold
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::LineString(vec![
            vec![self.0.x(), self.0.y()],
            vec![self.1.x(), self.1.y()],
        ]))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Line::new(")?;
        writeln!(f, "  {},", self.0)?;
        writeln!(f, "  {},", self.1)?;
        write!(f, ")")
    }
}

/// An infinite line passing through two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfiniteLine(LonLat, LonLat);

impl InfiniteLine {
    pub fn new(pt1: LonLat, pt2: LonLat) -> InfiniteLine {
        InfiniteLine(pt1, pt2)
    }

    pub fn from_pt_angle(pt: LonLat, angle: Angle) -> InfiniteLine {
        InfiniteLine(pt, pt.project_away(Distance::meters(1.0), angle))
    }

    pub fn pt1(&self) -> LonLat {
        self.0
    }

    pub fn pt2(&self) -> LonLat {
        self.1
    }

    pub fn angle(&self) -> Angle {
        self.0.course_to(self.1)
    }

    /// None if the lines are parallel or either one is degenerate.
    pub fn intersection(&self, other: &InfiniteLine) -> Option<LonLat> {
        let d = self.1.offset_from(self.0);
        let q = other.0.offset_from(self.0);
        let q2 = other.1.offset_from(self.0);
        let e = [q2[0] - q[0], q2[1] - q[1]];
        let t = param_intersection(d, q, e)?.0;
        Some(self.0.offset_by([t * d[0], t * d[1]]))
    }

    /// Positive when the point is to the right of the line, looking from the first point toward
    /// the second.
    pub fn signed_dist(&self, pt: LonLat) -> Distance {
        Line(self.0, self.1).decompose(pt).1
    }

    pub fn contains_pt(&self, pt: LonLat, threshold: Distance) -> bool {
        self.signed_dist(pt).abs() <= threshold
    }
}

/// Solves `t * d = q + s * e` in a planar frame, returning `(t, s)`. None when `d` and `e` are
/// parallel or degenerate.
pub(crate) fn param_intersection(d: [f64; 2], q: [f64; 2], e: [f64; 2]) -> Option<(f64, f64)> {
    let denom = cross(d, e);
    let scale = (d[0] * d[0] + d[1] * d[1]).sqrt() * (e[0] * e[0] + e[1] * e[1]).sqrt();
    if scale == 0.0 || denom.abs() <= 1e-10 * scale {
        return None;
    }
    Some((cross(q, e) / denom, cross(q, d) / denom))
}
