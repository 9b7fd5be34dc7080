//! Sky-side geometry for telescope pointing
//!
//! This crate provides the coordinate types and transformations needed to
//! relate celestial positions to a pointed telescope: equatorial coordinates,
//! observation metadata (boresight, sky rotation, epoch), and the gnomonic
//! projection between the celestial sphere and pupil (field-angle)
//! coordinates.

pub mod equatorial;
pub mod observation;
pub mod pupil;

pub use equatorial::Equatorial;
pub use observation::Observation;
pub use pupil::{PupilCoord, PupilProjector};
