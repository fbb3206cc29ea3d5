use std::fmt;

use serde::{Deserialize, Serialize};

use crate::line::param_intersection;
use crate::{Angle, Distance, InfiniteLine, Line, LonLat};

/// How far behind its origin (in meters) a ray still counts as hit. Absorbs floating point noise
/// when an intersection lands exactly on the origin.
const BEHIND_ORIGIN_TOLERANCE: f64 = 1e-6;

/// A half-line starting at a point and heading along a course.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    origin: LonLat,
    angle: Angle,
}

impl Ray {
    pub fn new(origin: LonLat, angle: Angle) -> Ray {
        Ray { origin, angle }
    }

    pub fn origin(&self) -> LonLat {
        self.origin
    }

    pub fn angle(&self) -> Angle {
        self.angle
    }

    /// Where this ray crosses an infinite line. None if they're parallel or the line is behind
    /// the ray.
    pub fn intersection_infinite(&self, line: &InfiniteLine) -> Option<LonLat> {
        let d = self.angle.unit_vector();
        let q = line.pt1().offset_from(self.origin);
        let q2 = line.pt2().offset_from(self.origin);
        let e = [q2[0] - q[0], q2[1] - q[1]];
        let (t, _) = param_intersection(d, q, e)?;
        if t < -BEHIND_ORIGIN_TOLERANCE {
            return None;
        }
        Some(self.pt_along(t))
    }

    /// Where two rays cross. Both have to be heading toward the crossing.
    pub fn intersection_ray(&self, other: &Ray) -> Option<LonLat> {
        let d = self.angle.unit_vector();
        let q = other.origin.offset_from(self.origin);
        let e = other.angle.unit_vector();
        let (t, s) = param_intersection(d, q, e)?;
        if t < -BEHIND_ORIGIN_TOLERANCE || s < -BEHIND_ORIGIN_TOLERANCE {
            return None;
        }
        Some(self.pt_along(t))
    }

    /// A segment from the origin along the ray, for drawing.
    pub fn to_line(&self, length: Distance) -> Line {
        Line::new(self.origin, self.origin.project_away(length, self.angle))
    }

    fn pt_along(&self, t: f64) -> LonLat {
        let d = self.angle.unit_vector();
        self.origin.offset_by([t * d[0], t * d[1]])
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ray({} toward {})", self.origin, self.angle)
    }
}
