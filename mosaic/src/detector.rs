//! Detector identity and footprint geometry

use crate::error::MosaicError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a sensor within the focal plane.
///
/// The set is closed: matching on it is exhaustive, so a new role added
/// here is a compile-time-visible gap in every consumer rather than a
/// silent runtime fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Imaging sensor contributing to the survey.
    Science,
    /// Out-of-focus sensor used for wavefront estimation.
    Wavefront,
    /// Fast-readout sensor used for guiding.
    Guider,
    /// Sensor dedicated to focus monitoring.
    Focus,
}

impl DetectorKind {
    /// All detector kinds, in display-table order.
    pub const ALL: [DetectorKind; 4] = [
        DetectorKind::Science,
        DetectorKind::Wavefront,
        DetectorKind::Guider,
        DetectorKind::Focus,
    ];

    /// Human-readable label for lookup tables.
    pub fn label(&self) -> &'static str {
        match self {
            DetectorKind::Science => "science",
            DetectorKind::Wavefront => "wavefront",
            DetectorKind::Guider => "guider",
            DetectorKind::Focus => "focus",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DetectorKind {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "science" => Ok(DetectorKind::Science),
            "wavefront" => Ok(DetectorKind::Wavefront),
            "guider" => Ok(DetectorKind::Guider),
            "focus" => Ok(DetectorKind::Focus),
            _ => Err(MosaicError::UnrecognizedDetectorKind(s.to_string())),
        }
    }
}

/// Raft/sensor identifier of the form `R:x,y S:i,j`.
///
/// The raft pair locates a raft within the focal-plane grid; the sensor
/// pair locates a sensor within that raft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetectorId {
    /// Raft grid column.
    pub raft_x: u8,
    /// Raft grid row.
    pub raft_y: u8,
    /// Sensor column within the raft.
    pub sensor_x: u8,
    /// Sensor row within the raft.
    pub sensor_y: u8,
}

impl DetectorId {
    /// Create an identifier from raft and sensor grid positions.
    pub fn new(raft: (u8, u8), sensor: (u8, u8)) -> Self {
        Self {
            raft_x: raft.0,
            raft_y: raft.1,
            sensor_x: sensor.0,
            sensor_y: sensor.1,
        }
    }
}

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R:{},{} S:{},{}",
            self.raft_x, self.raft_y, self.sensor_x, self.sensor_y
        )
    }
}

/// Parse one `P:a,b` token, e.g. `R:0,4`.
fn parse_pair(token: &str, prefix: char, original: &str) -> Result<(u8, u8), MosaicError> {
    let invalid = || MosaicError::InvalidDetectorName(original.to_string());

    let rest = token
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix(':'))
        .ok_or_else(invalid)?;
    let (a, b) = rest.split_once(',').ok_or_else(invalid)?;

    Ok((
        a.parse().map_err(|_| invalid())?,
        b.parse().map_err(|_| invalid())?,
    ))
}

impl FromStr for DetectorId {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();

        let raft_token = tokens
            .next()
            .ok_or_else(|| MosaicError::InvalidDetectorName(s.to_string()))?;
        let sensor_token = tokens
            .next()
            .ok_or_else(|| MosaicError::InvalidDetectorName(s.to_string()))?;
        if tokens.next().is_some() {
            return Err(MosaicError::InvalidDetectorName(s.to_string()));
        }

        Ok(DetectorId::new(
            parse_pair(raft_token, 'R', s)?,
            parse_pair(sensor_token, 'S', s)?,
        ))
    }
}

/// A single imaging sensor positioned on the focal plane.
///
/// Carries the sensor's identity, role, pixel grid, and the focal-plane
/// position of its center in millimeters. Constructed by the camera
/// builder at load time and immutable afterwards.
///
/// # Local pixel frame
/// Pixel (0, 0) sits at the corner with minimum focal-plane X and maximum
/// focal-plane Y; pixel X grows with focal-plane X and pixel Y grows
/// toward decreasing focal-plane Y.
#[derive(Debug, Clone)]
pub struct Detector {
    id: DetectorId,
    kind: DetectorKind,
    width_px: u32,
    height_px: u32,
    pixel_size_um: f64,
    center_x_mm: f64,
    center_y_mm: f64,
}

impl Detector {
    /// Create a detector record.
    pub fn new(
        id: DetectorId,
        kind: DetectorKind,
        width_px: u32,
        height_px: u32,
        pixel_size_um: f64,
        center_mm: (f64, f64),
    ) -> Self {
        Self {
            id,
            kind,
            width_px,
            height_px,
            pixel_size_um,
            center_x_mm: center_mm.0,
            center_y_mm: center_mm.1,
        }
    }

    /// Identifier of this detector.
    pub fn id(&self) -> DetectorId {
        self.id
    }

    /// Name string of this detector (`R:x,y S:i,j`).
    pub fn name(&self) -> String {
        self.id.to_string()
    }

    /// Role of this detector.
    pub fn kind(&self) -> DetectorKind {
        self.kind
    }

    /// Pixel grid width.
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Pixel grid height.
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Pixel pitch in millimeters.
    pub fn pixel_size_mm(&self) -> f64 {
        self.pixel_size_um / 1000.0
    }

    /// Footprint dimensions in millimeters.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        (
            self.width_px as f64 * self.pixel_size_mm(),
            self.height_px as f64 * self.pixel_size_mm(),
        )
    }

    /// Axis-aligned footprint bounds `(min_x, min_y, max_x, max_y)` in
    /// focal-plane millimeters.
    pub fn bounds_mm(&self) -> (f64, f64, f64, f64) {
        let (width_mm, height_mm) = self.dimensions_mm();
        (
            self.center_x_mm - width_mm / 2.0,
            self.center_y_mm - height_mm / 2.0,
            self.center_x_mm + width_mm / 2.0,
            self.center_y_mm + height_mm / 2.0,
        )
    }

    /// Radius of the circle containing this detector, in millimeters.
    pub fn bounding_radius_mm(&self) -> f64 {
        let (width_mm, height_mm) = self.dimensions_mm();
        (width_mm.powi(2) + height_mm.powi(2)).sqrt() / 2.0
    }

    /// Focal-plane position of the detector center in millimeters.
    pub fn center_mm(&self) -> (f64, f64) {
        (self.center_x_mm, self.center_y_mm)
    }

    /// Whether a focal-plane point falls within this detector's footprint.
    pub fn contains_mm(&self, x_mm: f64, y_mm: f64) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds_mm();
        x_mm >= min_x && x_mm <= max_x && y_mm >= min_y && y_mm <= max_y
    }

    /// Convert a focal-plane point to this detector's local pixel frame.
    ///
    /// No bounds check: points outside the footprint yield coordinates
    /// outside [0, width) x [0, height).
    pub fn pixel_from_mm(&self, x_mm: f64, y_mm: f64) -> (f64, f64) {
        let (min_x, _, _, max_y) = self.bounds_mm();
        let scale = self.pixel_size_mm();
        ((x_mm - min_x) / scale, (max_y - y_mm) / scale)
    }

    /// Convert a local pixel position back to focal-plane millimeters.
    pub fn mm_from_pixel(&self, pixel_x: f64, pixel_y: f64) -> (f64, f64) {
        let (min_x, _, _, max_y) = self.bounds_mm();
        let scale = self.pixel_size_mm();
        (min_x + pixel_x * scale, max_y - pixel_y * scale)
    }

    /// The four physical corners in the local pixel frame.
    ///
    /// Ordering is fixed: (0,0), (0,h), (w,0), (w,h). Consumers must not
    /// read any min/max meaning into it beyond consistency with
    /// [`corner_points_mm`](Self::corner_points_mm).
    pub fn corner_pixels(&self) -> [(f64, f64); 4] {
        let w = self.width_px as f64;
        let h = self.height_px as f64;
        [(0.0, 0.0), (0.0, h), (w, 0.0), (w, h)]
    }

    /// The same four corners in focal-plane millimeters, in the ordering of
    /// [`corner_pixels`](Self::corner_pixels).
    pub fn corner_points_mm(&self) -> [(f64, f64); 4] {
        self.corner_pixels()
            .map(|(px, py)| self.mm_from_pixel(px, py))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn detector() -> Detector {
        Detector::new(
            DetectorId::new((2, 2), (1, 1)),
            DetectorKind::Science,
            4000,
            4000,
            10.0,
            (10.0, -20.0),
        )
    }

    #[test]
    fn test_kind_labels_are_the_four_table_strings() {
        let labels: Vec<&str> = DetectorKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["science", "wavefront", "guider", "focus"]);
    }

    #[test]
    fn test_kind_parse_round_trip() {
        for kind in DetectorKind::ALL {
            assert_eq!(kind.label().parse::<DetectorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unmapped_kind_is_an_explicit_error() {
        let err = "calibration".parse::<DetectorKind>().unwrap_err();
        assert!(matches!(err, MosaicError::UnrecognizedDetectorKind(_)));
    }

    #[test]
    fn test_id_display() {
        let id = DetectorId::new((0, 4), (1, 0));
        assert_eq!(id.to_string(), "R:0,4 S:1,0");
    }

    #[test]
    fn test_id_parse_round_trip() {
        for name in ["R:0,4 S:1,0", "R:2,2 S:0,2", "R:4,0 S:1,1"] {
            let id: DetectorId = name.parse().unwrap();
            assert_eq!(id.to_string(), name);
        }
    }

    #[test]
    fn test_malformed_ids_are_rejected() {
        for bad in [
            "",
            "R:0,4",
            "S:1,0 R:0,4",
            "R:0 S:1,0",
            "R:0,4 S:1,0 extra",
            "R:a,4 S:1,0",
            "R0,4 S:1,0",
        ] {
            let err = bad.parse::<DetectorId>().unwrap_err();
            assert!(
                matches!(err, MosaicError::InvalidDetectorName(_)),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_bounds_and_dimensions() {
        let det = detector();
        let (width_mm, height_mm) = det.dimensions_mm();
        assert_relative_eq!(width_mm, 40.0, epsilon = 1e-12);
        assert_relative_eq!(height_mm, 40.0, epsilon = 1e-12);

        let (min_x, min_y, max_x, max_y) = det.bounds_mm();
        assert_relative_eq!(min_x, -10.0, epsilon = 1e-12);
        assert_relative_eq!(min_y, -40.0, epsilon = 1e-12);
        assert_relative_eq!(max_x, 30.0, epsilon = 1e-12);
        assert_relative_eq!(max_y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_center_maps_to_pixel_center() {
        let det = detector();
        let (px, py) = det.pixel_from_mm(10.0, -20.0);
        assert_relative_eq!(px, 2000.0, epsilon = 1e-9);
        assert_relative_eq!(py, 2000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pixel_mm_round_trip() {
        let det = detector();
        let (x_mm, y_mm) = det.mm_from_pixel(123.25, 3987.5);
        let (px, py) = det.pixel_from_mm(x_mm, y_mm);
        assert_relative_eq!(px, 123.25, epsilon = 1e-9);
        assert_relative_eq!(py, 3987.5, epsilon = 1e-9);
    }

    #[test]
    fn test_containment() {
        let det = detector();
        assert!(det.contains_mm(10.0, -20.0));
        assert!(det.contains_mm(-10.0, 0.0)); // corner is inclusive
        assert!(!det.contains_mm(31.0, -20.0));
        assert!(!det.contains_mm(10.0, 1.0));
    }

    #[test]
    fn test_corner_orderings_are_parallel() {
        let det = detector();
        let pixels = det.corner_pixels();
        let points = det.corner_points_mm();

        assert_eq!(pixels.len(), 4);
        assert_eq!(points.len(), 4);

        for ((px, py), (x_mm, y_mm)) in pixels.iter().zip(points.iter()) {
            let (rx, ry) = det.pixel_from_mm(*x_mm, *y_mm);
            assert_relative_eq!(rx, *px, epsilon = 1e-9);
            assert_relative_eq!(ry, *py, epsilon = 1e-9);
        }
    }
}
