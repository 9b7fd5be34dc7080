//! Camera detector collection and focal-plane search

use crate::detector::{Detector, DetectorId};
use crate::error::{MosaicError, Result};
use log::debug;
use pointing::PupilCoord;
use std::collections::HashMap;

/// Margin applied to each detector's bounding radius when prefiltering
/// candidate detectors for a focal-plane point.
const CANDIDATE_MARGIN: f64 = 1.1;

/// A camera: an immutable collection of detectors on a common focal plane.
///
/// Supports iteration over the detectors in layout order, indexed lookup by
/// identifier or name string, and resolution of focal-plane points to the
/// detector containing them. The point search is a two-stage test adopted
/// from large-mosaic practice: a whole-camera envelope box rejects points
/// off the focal plane, a per-detector (center, bounding-radius) table
/// prefilters candidates, and only candidates get the exact footprint test.
#[derive(Debug)]
pub struct Camera {
    name: String,
    focal_length_mm: f64,
    detectors: Vec<Detector>,
    index: HashMap<DetectorId, usize>,
    /// Per-detector (center_x, center_y, prefilter radius squared), mm.
    candidates: Vec<(f64, f64, f64)>,
    /// Envelope of all footprints `(min_x, min_y, max_x, max_y)`, mm.
    envelope_mm: (f64, f64, f64, f64),
}

impl Camera {
    /// Assemble a camera from a detector list.
    ///
    /// Fails if the list is empty, the focal length is not positive, or two
    /// detectors share an identifier. Iteration order is the list order.
    pub fn new(
        name: impl Into<String>,
        focal_length_mm: f64,
        detectors: Vec<Detector>,
    ) -> Result<Self> {
        let name = name.into();

        if detectors.is_empty() {
            return Err(MosaicError::InvalidLayout(format!(
                "camera {name:?} has no detectors"
            )));
        }
        if focal_length_mm <= 0.0 {
            return Err(MosaicError::InvalidLayout(format!(
                "focal length must be positive, got {focal_length_mm}"
            )));
        }

        let mut index = HashMap::with_capacity(detectors.len());
        for (i, det) in detectors.iter().enumerate() {
            if index.insert(det.id(), i).is_some() {
                return Err(MosaicError::DuplicateDetector(det.id()));
            }
        }

        let candidates = detectors
            .iter()
            .map(|det| {
                let (cx, cy) = det.center_mm();
                let radius = CANDIDATE_MARGIN * det.bounding_radius_mm();
                (cx, cy, radius.powi(2))
            })
            .collect();

        let mut envelope_mm = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for det in &detectors {
            let (min_x, min_y, max_x, max_y) = det.bounds_mm();
            envelope_mm.0 = envelope_mm.0.min(min_x);
            envelope_mm.1 = envelope_mm.1.min(min_y);
            envelope_mm.2 = envelope_mm.2.max(max_x);
            envelope_mm.3 = envelope_mm.3.max(max_y);
        }

        debug!(
            "camera {name:?}: {} detectors, envelope x [{:.1}, {:.1}] mm, y [{:.1}, {:.1}] mm",
            detectors.len(),
            envelope_mm.0,
            envelope_mm.2,
            envelope_mm.1,
            envelope_mm.3
        );

        Ok(Self {
            name,
            focal_length_mm,
            detectors,
            index,
            candidates,
            envelope_mm,
        })
    }

    /// Camera model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective focal length in millimeters.
    pub fn focal_length_mm(&self) -> f64 {
        self.focal_length_mm
    }

    /// Number of detectors.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Whether the camera has no detectors (never true for a built camera).
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Iterate over the detectors in layout order.
    pub fn detectors(&self) -> impl Iterator<Item = &Detector> {
        self.detectors.iter()
    }

    /// Look up a detector by identifier.
    pub fn get(&self, id: &DetectorId) -> Option<&Detector> {
        self.index.get(id).map(|&i| &self.detectors[i])
    }

    /// Look up a detector by name string.
    ///
    /// Fails with [`MosaicError::InvalidDetectorName`] on malformed names
    /// and [`MosaicError::UnknownDetector`] for well-formed names not in
    /// this camera.
    pub fn lookup(&self, name: &str) -> Result<&Detector> {
        let id: DetectorId = name.parse()?;
        self.get(&id)
            .ok_or_else(|| MosaicError::UnknownDetector(name.to_string()))
    }

    /// Convert a pupil (field-angle) coordinate to focal-plane millimeters.
    pub fn pupil_to_mm(&self, pupil: PupilCoord) -> (f64, f64) {
        (
            pupil.x * self.focal_length_mm,
            pupil.y * self.focal_length_mm,
        )
    }

    /// Convert a focal-plane point to a pupil (field-angle) coordinate.
    pub fn mm_to_pupil(&self, x_mm: f64, y_mm: f64) -> PupilCoord {
        PupilCoord {
            x: x_mm / self.focal_length_mm,
            y: y_mm / self.focal_length_mm,
        }
    }

    /// Resolve a focal-plane point to the detector containing it.
    ///
    /// Returns `None` for points in the gaps between footprints or outside
    /// the focal plane entirely. Detector footprints in one camera do not
    /// overlap, so the first hit is the only hit.
    pub fn detector_at_mm(&self, x_mm: f64, y_mm: f64) -> Option<&Detector> {
        let (min_x, min_y, max_x, max_y) = self.envelope_mm;
        if x_mm < min_x || x_mm > max_x || y_mm < min_y || y_mm > max_y {
            return None;
        }

        for (det, &(cx, cy, r_sq)) in self.detectors.iter().zip(&self.candidates) {
            let dist_sq = (x_mm - cx).powi(2) + (y_mm - cy).powi(2);
            if dist_sq < r_sq && det.contains_mm(x_mm, y_mm) {
                return Some(det);
            }
        }

        None
    }
}
