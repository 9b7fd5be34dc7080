use crate::detector::DetectorId;
use thiserror::Error;

/// Errors produced by camera construction and the sky-to-detector transforms.
#[derive(Error, Debug)]
pub enum MosaicError {
    /// Detector kind text not in the recognized set.
    #[error("unrecognized detector kind: {0:?}")]
    UnrecognizedDetectorKind(String),

    /// Detector name does not parse as `R:x,y S:i,j`.
    #[error("invalid detector name: {0:?}")]
    InvalidDetectorName(String),

    /// Named detector is not present in the camera.
    #[error("unknown detector: {0}")]
    UnknownDetector(String),

    /// Two detectors in one camera share an identifier.
    #[error("duplicate detector: {0}")]
    DuplicateDetector(DetectorId),

    /// RA and Dec input sequences differ in length.
    #[error("input length mismatch: {ra} RA values, {dec} Dec values")]
    LengthMismatch {
        /// Number of RA entries supplied.
        ra: usize,
        /// Number of Dec entries supplied.
        dec: usize,
    },

    /// Per-position detector selection does not match the input length.
    #[error("selection length mismatch: {selection} detector names for {positions} positions")]
    SelectionLengthMismatch {
        /// Number of detector names supplied.
        selection: usize,
        /// Number of sky positions supplied.
        positions: usize,
    },

    /// Layout parameters describe an unbuildable focal plane.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

/// Result type for camera and transform operations.
pub type Result<T> = std::result::Result<T, MosaicError>;
