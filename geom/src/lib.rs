//! Geodetic geometry for short linear features: points are longitude/latitude pairs, lengths are
//! meters, and directions are compass courses. Everything that needs planar math (intersecting
//! rays and lines, testing sides) works in a local equirectangular frame centered on one of the
//! inputs, which is accurate for the tens-to-hundreds of meters spanned by an airport feature.

pub use crate::angle::Angle;
pub use crate::bounds::GPSBounds;
pub use crate::distance::Distance;
pub use crate::gps::LonLat;
pub use crate::line::{InfiniteLine, Line};
pub use crate::ray::Ray;

mod angle;
mod bounds;
mod distance;
mod gps;
mod line;
mod ray;

/// About 1cm. Points closer than this are considered the same.
pub const EPSILON_DIST: Distance = Distance::const_meters(0.01);

/// Meters per degree of latitude, and of longitude along the equator.
pub(crate) const METERS_PER_DEGREE: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
pub(crate) const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Reduce the precision of an f64. This helps ensure serialization is idempotent (everything is
/// exactly the same before and after saving/loading).
pub fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Cross product of two planar vectors.
pub(crate) fn cross(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}
