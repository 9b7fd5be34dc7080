//! Sky-to-detector and sky-to-pixel transforms
//!
//! The sequence operations take parallel RA/Dec slices in degrees and
//! always return outputs of the same length and order. Positions that miss
//! every detector are reported with an absent marker (`None` from
//! [`detector_at`]) or a NaN pair (from [`pixel_at`]), never by shrinking
//! the output.

use crate::camera::Camera;
use crate::detector::{Detector, DetectorId};
use crate::error::{MosaicError, Result};
use pointing::{Equatorial, Observation, PupilProjector};

/// Which detector frame pixel coordinates are reckoned in.
#[derive(Debug, Clone, Copy)]
pub enum FrameSelection<'a> {
    /// Resolve each position to the detector it naturally falls on.
    Resolve,
    /// Project every position onto the one named detector's frame,
    /// regardless of where it naturally falls.
    Fixed(&'a DetectorId),
    /// Use caller-supplied detector names, one per position — typically the
    /// output of a prior [`detector_at`] call. Skips the resolution pass;
    /// the result is identical to [`FrameSelection::Resolve`].
    PerPosition(&'a [Option<DetectorId>]),
}

fn check_lengths(ra_deg: &[f64], dec_deg: &[f64]) -> Result<()> {
    if ra_deg.len() != dec_deg.len() {
        return Err(MosaicError::LengthMismatch {
            ra: ra_deg.len(),
            dec: dec_deg.len(),
        });
    }
    Ok(())
}

/// Name of the detector each sky position falls on.
///
/// Positions in the gaps between detectors, off the focal plane, or on the
/// far hemisphere yield `None`. Output length and order match the input.
pub fn detector_at(
    ra_deg: &[f64],
    dec_deg: &[f64],
    camera: &Camera,
    obs: &Observation,
) -> Result<Vec<Option<DetectorId>>> {
    check_lengths(ra_deg, dec_deg)?;

    let projector = PupilProjector::new(obs);
    Ok(ra_deg
        .iter()
        .zip(dec_deg)
        .map(|(&ra, &dec)| {
            resolve(&Equatorial::from_degrees(ra, dec), camera, &projector).map(Detector::id)
        })
        .collect())
}

/// Scalar form of [`detector_at`] for a single sky position.
pub fn detector_at_sky(
    sky: &Equatorial,
    camera: &Camera,
    obs: &Observation,
) -> Option<DetectorId> {
    resolve(sky, camera, &PupilProjector::new(obs)).map(Detector::id)
}

fn resolve<'c>(
    sky: &Equatorial,
    camera: &'c Camera,
    projector: &PupilProjector,
) -> Option<&'c Detector> {
    let pupil = projector.project(sky)?;
    let (x_mm, y_mm) = camera.pupil_to_mm(pupil);
    camera.detector_at_mm(x_mm, y_mm)
}

/// Pixel coordinates of each sky position, as parallel (x, y) sequences.
///
/// The frame each position is reckoned in is controlled by `selection`; see
/// [`FrameSelection`]. Positions with no frame — gap positions under
/// `Resolve`, `None` entries under `PerPosition`, or far-hemisphere
/// positions under any selection — yield a NaN pair, keeping the outputs
/// parallel to the input.
pub fn pixel_at(
    ra_deg: &[f64],
    dec_deg: &[f64],
    camera: &Camera,
    obs: &Observation,
    selection: FrameSelection<'_>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    check_lengths(ra_deg, dec_deg)?;

    let fixed = match selection {
        FrameSelection::Fixed(id) => Some(
            camera
                .get(id)
                .ok_or_else(|| MosaicError::UnknownDetector(id.to_string()))?,
        ),
        FrameSelection::PerPosition(names) => {
            if names.len() != ra_deg.len() {
                return Err(MosaicError::SelectionLengthMismatch {
                    selection: names.len(),
                    positions: ra_deg.len(),
                });
            }
            None
        }
        FrameSelection::Resolve => None,
    };

    let projector = PupilProjector::new(obs);
    let mut x_pix = Vec::with_capacity(ra_deg.len());
    let mut y_pix = Vec::with_capacity(ra_deg.len());

    for (i, (&ra, &dec)) in ra_deg.iter().zip(dec_deg).enumerate() {
        let sky = Equatorial::from_degrees(ra, dec);
        let pupil = projector.project(&sky);

        let frame = match selection {
            FrameSelection::Fixed(_) => fixed,
            FrameSelection::Resolve => pupil.and_then(|p| {
                let (x_mm, y_mm) = camera.pupil_to_mm(p);
                camera.detector_at_mm(x_mm, y_mm)
            }),
            FrameSelection::PerPosition(names) => match &names[i] {
                Some(id) => Some(
                    camera
                        .get(id)
                        .ok_or_else(|| MosaicError::UnknownDetector(id.to_string()))?,
                ),
                None => None,
            },
        };

        match (pupil, frame) {
            (Some(p), Some(det)) => {
                let (x_mm, y_mm) = camera.pupil_to_mm(p);
                let (px, py) = det.pixel_from_mm(x_mm, y_mm);
                x_pix.push(px);
                y_pix.push(py);
            }
            _ => {
                x_pix.push(f64::NAN);
                y_pix.push(f64::NAN);
            }
        }
    }

    Ok((x_pix, y_pix))
}

/// The four physical corners of a detector in its local pixel frame.
///
/// The ordering is fixed and matches [`corner_sky`] element for element.
pub fn corner_pixels(id: &DetectorId, camera: &Camera) -> Result<[(f64, f64); 4]> {
    let det = camera
        .get(id)
        .ok_or_else(|| MosaicError::UnknownDetector(id.to_string()))?;
    Ok(det.corner_pixels())
}

/// The four physical corners of a detector projected to sky coordinates.
///
/// Entries parallel the [`corner_pixels`] ordering; they are NOT sorted by
/// minimum or maximum RA/Dec, and consumers must not assume any ordering
/// beyond that correspondence.
pub fn corner_sky(
    id: &DetectorId,
    camera: &Camera,
    obs: &Observation,
) -> Result<[Equatorial; 4]> {
    let det = camera
        .get(id)
        .ok_or_else(|| MosaicError::UnknownDetector(id.to_string()))?;

    let projector = PupilProjector::new(obs);
    Ok(det
        .corner_points_mm()
        .map(|(x_mm, y_mm)| projector.deproject(camera.mm_to_pupil(x_mm, y_mm))))
}
