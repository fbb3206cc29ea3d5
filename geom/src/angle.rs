use std::fmt;

use serde::{Deserialize, Serialize};

/// A compass course in degrees: 0 is north, 90 is east, increasing clockwise. Always normalized
/// to [0, 360).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    /// Create an angle in degrees. Any finite value is accepted and wrapped into [0, 360).
    pub fn degrees(degs: f64) -> Angle {
        if !degs.is_finite() {
            panic!("Bad Angle {}", degs);
        }
        let normalized = degs.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        Angle(if normalized >= 360.0 { 0.0 } else { normalized })
    }

    pub fn normalized_degrees(self) -> f64 {
        self.0
    }

    pub fn normalized_radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn opposite(self) -> Angle {
        Angle::degrees(self.0 + 180.0)
    }

    pub fn rotate_degs(self, degrees: f64) -> Angle {
        Angle::degrees(self.0 + degrees)
    }

    /// Degrees swept turning clockwise from this angle to `other`, in [0, 360).
    pub fn clockwise_sweep_to(self, other: Angle) -> f64 {
        (other.0 - self.0).rem_euclid(360.0)
    }

    /// The angle halfway through the clockwise sector that starts at `self` and ends at `to`.
    /// When both are equal, the sector is empty and the result is `self`.
    pub fn bisect_clockwise(self, to: Angle) -> Angle {
        self.rotate_degs(self.clockwise_sweep_to(to) / 2.0)
    }

    /// Signed rotation in degrees, in (-180, 180], to turn from this angle to `other`. Positive
    /// means clockwise.
    pub fn shortest_rotation_towards(self, other: Angle) -> f64 {
        let sweep = self.clockwise_sweep_to(other);
        if sweep > 180.0 {
            sweep - 360.0
        } else {
            sweep
        }
    }

    /// True if the two angles are within some degrees of each other, accounting for wraparound.
    pub fn approx_eq(self, other: Angle, within_degrees: f64) -> bool {
        self.shortest_rotation_towards(other).abs() <= within_degrees
    }

    /// Unit vector in a planar frame where +x is east and +y is north.
    pub(crate) fn unit_vector(self) -> [f64; 2] {
        let rads = self.normalized_radians();
        [rads.sin(), rads.cos()]
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(Angle::degrees(-90.0).normalized_degrees(), 270.0);
        assert_eq!(Angle::degrees(720.0).normalized_degrees(), 0.0);
        assert_eq!(Angle::degrees(10.0).opposite().normalized_degrees(), 190.0);
        assert!(Angle::degrees(-1e-20).normalized_degrees() < 360.0);
    }

    #[test]
    fn clockwise_bisect() {
        // Sector from 0 clockwise to 10
        assert_eq!(
            Angle::degrees(0.0)
                .bisect_clockwise(Angle::degrees(10.0))
                .normalized_degrees(),
            5.0
        );
        // The long way around, from 10 clockwise to 0
        assert_eq!(
            Angle::degrees(10.0)
                .bisect_clockwise(Angle::degrees(0.0))
                .normalized_degrees(),
            185.0
        );
        assert_eq!(
            Angle::degrees(180.0)
                .bisect_clockwise(Angle::degrees(0.0))
                .normalized_degrees(),
            270.0
        );
        assert_eq!(
            Angle::degrees(30.0)
                .bisect_clockwise(Angle::degrees(30.0))
                .normalized_degrees(),
            30.0
        );
    }

    #[test]
    fn shortest_rotation() {
        assert_eq!(
            Angle::degrees(350.0).shortest_rotation_towards(Angle::degrees(10.0)),
            20.0
        );
        assert_eq!(
            Angle::degrees(10.0).shortest_rotation_towards(Angle::degrees(350.0)),
            -20.0
        );
        assert!(Angle::degrees(359.5).approx_eq(Angle::degrees(0.2), 1.0));
        assert!(!Angle::degrees(90.0).approx_eq(Angle::degrees(270.0), 1.0));
    }
}
