//! Telescope pointing metadata

use crate::equatorial::Equatorial;
use log::warn;
use serde::{Deserialize, Serialize};

/// MJD span over which civil-time tables (leap seconds, UT1 offsets) are
/// trustworthy. Epochs outside this window still convert, but downstream
/// time arithmetic degrades gracefully rather than failing.
const MJD_CIVIL_MIN: f64 = 15_020.0; // 1900-01-01
const MJD_CIVIL_MAX: f64 = 88_069.0; // 2200-01-01

/// Metadata describing a single telescope pointing.
///
/// Captures everything the sky-to-detector transforms need about an
/// observation: where the boresight points, how the camera is rolled with
/// respect to celestial north, and when the exposure happens. Constructed
/// once per pointing and passed by reference into every transform call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    boresight: Equatorial,
    rotation: f64,
    mjd: f64,
}

impl Observation {
    /// Create observation metadata from a boresight coordinate, a sky
    /// rotation angle in radians, and a modified Julian date.
    ///
    /// An epoch outside the span of reliable civil-time tables logs a
    /// warning but is otherwise accepted; the geometry is unaffected.
    pub fn new(boresight: Equatorial, rotation: f64, mjd: f64) -> Self {
        if !(MJD_CIVIL_MIN..=MJD_CIVIL_MAX).contains(&mjd) {
            warn!("MJD {mjd:.1} is outside the reliable civil-time span; proceeding anyway");
        }

        Self {
            boresight,
            rotation,
            mjd,
        }
    }

    /// Create observation metadata from pointing RA/Dec and sky rotation in
    /// degrees, plus a modified Julian date.
    pub fn from_degrees(ra_deg: f64, dec_deg: f64, rotation_deg: f64, mjd: f64) -> Self {
        Self::new(
            Equatorial::from_degrees(ra_deg, dec_deg),
            rotation_deg.to_radians(),
            mjd,
        )
    }

    /// Boresight pointing direction.
    pub fn boresight(&self) -> Equatorial {
        self.boresight
    }

    /// Sky rotation angle in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sky rotation angle in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }

    /// Modified Julian date of the observation.
    pub fn mjd(&self) -> f64 {
        self.mjd
    }
}
