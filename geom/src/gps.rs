use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, EARTH_RADIUS_METERS, METERS_PER_DEGREE};

/// longitude is x, latitude is y
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    longitude: f64,
    latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    pub fn x(self) -> f64 {
        self.longitude
    }

    pub fn y(self) -> f64 {
        self.latitude
    }

    /// Haversine distance
    pub fn gps_dist(self, other: LonLat) -> Distance {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(EARTH_RADIUS_METERS * c)
    }

    pub fn approx_eq(self, other: LonLat, threshold: Distance) -> bool {
        self.gps_dist(other) <= threshold
    }

    /// The course to travel from this point to another. Identical points yield north.
    pub fn course_to(self, other: LonLat) -> Angle {
        let [dx, dy] = other.offset_from(self);
        Angle::degrees(dx.atan2(dy).to_degrees())
    }

    /// Move some distance along a course. Negative distances travel the opposite way.
    pub fn project_away(self, dist: Distance, course: Angle) -> LonLat {
        let [ux, uy] = course.unit_vector();
        let d = dist.inner_meters();
        self.offset_by([d * ux, d * uy])
    }

    pub fn to_geojson(self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Point(vec![self.longitude, self.latitude]))
    }

    /// Meters east and north of `origin`, in a local equirectangular frame centered there.
    pub(crate) fn offset_from(self, origin: LonLat) -> [f64; 2] {
        [
            (self.longitude - origin.longitude) * origin.meters_per_degree_lon(),
            (self.latitude - origin.latitude) * METERS_PER_DEGREE,
        ]
    }

    /// The inverse of `offset_from`, using this point as the origin.
    pub(crate) fn offset_by(self, offset: [f64; 2]) -> LonLat {
        LonLat::new(
            self.longitude + offset[0] / self.meters_per_degree_lon(),
            self.latitude + offset[1] / METERS_PER_DEGREE,
        )
    }

    fn meters_per_degree_lon(self) -> f64 {
        // Features never touch the poles, but don't divide by zero there either
        (METERS_PER_DEGREE * self.latitude.to_radians().cos()).max(1e-6)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}
