//! Camera-side geometry for a simulated wide-field survey telescope
//!
//! This crate models a mosaic focal plane — rafts of science sensors plus
//! corner stations of guider, wavefront, and focus sensors — and maps sky
//! coordinates onto it: which detector a position falls on, where it lands
//! in that detector's pixel frame, and where a detector's corners sit on
//! the sky. The sky side (coordinates, pointing, gnomonic projection) lives
//! in the `pointing` crate.

pub mod camera;
pub mod detector;
pub mod error;
pub mod layout;
pub mod transforms;

pub use camera::Camera;
pub use detector::{Detector, DetectorId, DetectorKind};
pub use error::{MosaicError, Result};
pub use layout::{models, CornerSensor, MosaicLayout, SensorFormat};
pub use transforms::{
    corner_pixels, corner_sky, detector_at, detector_at_sky, pixel_at, FrameSelection,
};

/// The predefined wide-survey camera model.
///
/// Built on first use and shared for the rest of the session.
pub fn load_camera() -> &'static Camera {
    &models::WIDE_SURVEY
}
