//! Gnomonic projection between the sky and pupil coordinates
//!
//! Pupil coordinates are tangent-plane field angles in radians, centered on
//! the boresight. They are the intermediate frame between celestial
//! positions and focal-plane geometry: the camera side only has to scale
//! them by the focal length to obtain millimeters on the focal plane.

use crate::equatorial::Equatorial;
use crate::observation::Observation;
use nalgebra::{Matrix3, Vector3};

/// A tangent-plane field angle pair in radians.
///
/// At zero sky rotation, +y points toward celestial north and +x toward
/// increasing right ascension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PupilCoord {
    /// Field angle along the camera X axis in radians
    pub x: f64,
    /// Field angle along the camera Y axis in radians
    pub y: f64,
}

/// Projects celestial coordinates onto the pupil plane of a pointed camera.
///
/// Construction computes a rotation matrix whose Z axis points at the
/// boresight, Y toward celestial north, and X completing the right-handed
/// system, then rolls the X/Y basis by the observation's sky-rotation angle.
/// The projector is immutable after construction and safe to share.
pub struct PupilProjector {
    boresight: Equatorial,
    rotation_matrix: Matrix3<f64>,
}

impl PupilProjector {
    /// Build a projector for the given observation.
    pub fn new(obs: &Observation) -> Self {
        let boresight = obs.boresight();

        // Z-axis (pointing at the boresight)
        let z = boresight.unit_vector();

        // Y-axis (towards celestial north); at a celestial pole the north
        // reference degenerates, so fall back to the +X axis there. The
        // local frame orientation at the pole is absorbed by the sky
        // rotation angle.
        let north = Vector3::new(0.0, 0.0, 1.0);
        let mut east = north.cross(&z);
        if east.norm_squared() < 1e-12 {
            east = Vector3::new(1.0, 0.0, 0.0);
        }
        let east = east.normalize();
        let y = z.cross(&east).normalize();

        // X-axis (east direction)
        let x = y.cross(&z).normalize();

        // Roll the X/Y basis about the boresight by the sky rotation angle
        let (sin_rot, cos_rot) = obs.rotation().sin_cos();
        let roll = Matrix3::new(
            cos_rot, -sin_rot, 0.0, //
            sin_rot, cos_rot, 0.0, //
            0.0, 0.0, 1.0,
        );

        let rotation_matrix = Matrix3::from_columns(&[x, y, z]) * roll;

        Self {
            boresight,
            rotation_matrix,
        }
    }

    /// Boresight this projector is centered on.
    pub fn boresight(&self) -> Equatorial {
        self.boresight
    }

    /// Project a celestial coordinate onto the pupil plane.
    ///
    /// Returns `None` for positions on the far hemisphere (behind the
    /// camera), where the tangent-plane projection is undefined.
    pub fn project(&self, sky: &Equatorial) -> Option<PupilCoord> {
        let cartesian = sky.unit_vector();

        // Transform to camera coordinates
        let camera_coords = self.rotation_matrix.transpose() * cartesian;

        if camera_coords.z <= 0.0 {
            return None;
        }

        // Gnomonic (tangent plane) projection
        Some(PupilCoord {
            x: camera_coords.x / camera_coords.z,
            y: camera_coords.y / camera_coords.z,
        })
    }

    /// Invert the projection: recover the celestial coordinate that maps to
    /// the given pupil position.
    ///
    /// Exact inverse of [`project`](Self::project) on the near hemisphere.
    pub fn deproject(&self, pupil: PupilCoord) -> Equatorial {
        let camera_coords = Vector3::new(pupil.x, pupil.y, 1.0);
        let celestial = self.rotation_matrix * camera_coords;
        Equatorial::from_unit_vector(&celestial)
    }
}
