//! Equatorial sky coordinates

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A position on the celestial sphere in equatorial coordinates.
///
/// Both components are stored in radians. Right ascension is measured
/// eastward and normalized to [0, 2π) by the constructors; declination is
/// positive toward the north celestial pole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    /// Right ascension in radians
    pub ra: f64,
    /// Declination in radians
    pub dec: f64,
}

impl Equatorial {
    /// Create a coordinate from right ascension and declination in degrees.
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra: ra_deg.to_radians().rem_euclid(std::f64::consts::TAU),
            dec: dec_deg.to_radians(),
        }
    }

    /// Right ascension in degrees.
    pub fn ra_degrees(&self) -> f64 {
        self.ra.to_degrees()
    }

    /// Declination in degrees.
    pub fn dec_degrees(&self) -> f64 {
        self.dec.to_degrees()
    }

    /// Convert to a Cartesian unit vector.
    ///
    /// X points toward (RA 0, Dec 0), Z toward the north celestial pole.
    pub fn unit_vector(&self) -> Vector3<f64> {
        let cos_dec = self.dec.cos();
        Vector3::new(
            cos_dec * self.ra.cos(),
            cos_dec * self.ra.sin(),
            self.dec.sin(),
        )
    }

    /// Recover equatorial coordinates from a Cartesian direction.
    ///
    /// The input does not need to be normalized. RA is wrapped to [0, 2π).
    pub fn from_unit_vector(v: &Vector3<f64>) -> Self {
        let unit = v.normalize();
        Self {
            ra: unit.y.atan2(unit.x).rem_euclid(std::f64::consts::TAU),
            dec: unit.z.asin(),
        }
    }
}
