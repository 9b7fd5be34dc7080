//! Focal-plane layout description and camera builder
//!
//! A [`MosaicLayout`] is the serializable description of a survey-style
//! focal plane: a square grid of rafts whose four corner positions are
//! stations for auxiliary sensors, with 3x3 science sensors on every other
//! raft. [`MosaicLayout::build`] turns the description into a [`Camera`].

use crate::camera::Camera;
use crate::detector::{Detector, DetectorId, DetectorKind};
use crate::error::{MosaicError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Pixel-grid format shared by a group of sensors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorFormat {
    /// Pixel grid width.
    pub width_px: u32,
    /// Pixel grid height.
    pub height_px: u32,
    /// Pixel pitch in microns.
    pub pixel_size_um: f64,
}

impl SensorFormat {
    /// Footprint dimensions in millimeters.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        (
            self.width_px as f64 * self.pixel_size_um / 1000.0,
            self.height_px as f64 * self.pixel_size_um / 1000.0,
        )
    }
}

/// One auxiliary sensor slot within a corner station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornerSensor {
    /// Sensor column within the 2x2 station grid (0 or 1).
    pub sensor_x: u8,
    /// Sensor row within the 2x2 station grid (0 or 1).
    pub sensor_y: u8,
    /// Role of the sensor in this slot.
    pub kind: DetectorKind,
}

/// Parameterization of a raft-grid focal plane.
///
/// Serializable so that a layout can be stored next to the code that uses
/// it; `MosaicLayout::default()` is the built-in wide-survey model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MosaicLayout {
    /// Camera model name.
    pub name: String,
    /// Effective focal length in millimeters.
    pub focal_length_mm: f64,
    /// Rafts per side of the square grid.
    pub raft_grid: u8,
    /// Center-to-center raft spacing in millimeters.
    pub raft_pitch_mm: f64,
    /// Center-to-center sensor spacing within a science raft, millimeters.
    pub sensor_pitch_mm: f64,
    /// Format of the 3x3 science sensors.
    pub science_format: SensorFormat,
    /// Format of the corner-station sensors.
    pub corner_format: SensorFormat,
    /// Sensor slots populated in each corner station.
    pub corner_station: Vec<CornerSensor>,
}

impl Default for MosaicLayout {
    fn default() -> Self {
        Self {
            name: "wide-survey".to_string(),
            focal_length_mm: 10_312.0,
            raft_grid: 5,
            raft_pitch_mm: 127.5,
            sensor_pitch_mm: 42.0,
            science_format: SensorFormat {
                width_px: 4000,
                height_px: 4000,
                pixel_size_um: 10.0,
            },
            corner_format: SensorFormat {
                width_px: 2000,
                height_px: 2000,
                pixel_size_um: 10.0,
            },
            corner_station: vec![
                CornerSensor {
                    sensor_x: 0,
                    sensor_y: 0,
                    kind: DetectorKind::Guider,
                },
                CornerSensor {
                    sensor_x: 0,
                    sensor_y: 1,
                    kind: DetectorKind::Focus,
                },
                CornerSensor {
                    sensor_x: 1,
                    sensor_y: 0,
                    kind: DetectorKind::Wavefront,
                },
                CornerSensor {
                    sensor_x: 1,
                    sensor_y: 1,
                    kind: DetectorKind::Guider,
                },
            ],
        }
    }
}

impl MosaicLayout {
    fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(MosaicError::InvalidLayout(msg));

        if self.raft_grid < 2 {
            return fail(format!("raft grid must be at least 2x2, got {}", self.raft_grid));
        }
        if self.focal_length_mm <= 0.0 {
            return fail(format!(
                "focal length must be positive, got {}",
                self.focal_length_mm
            ));
        }
        if self.raft_pitch_mm <= 0.0 || self.sensor_pitch_mm <= 0.0 {
            return fail("raft and sensor pitches must be positive".to_string());
        }

        for (label, format) in [("science", &self.science_format), ("corner", &self.corner_format)]
        {
            if format.width_px == 0 || format.height_px == 0 || format.pixel_size_um <= 0.0 {
                return fail(format!("{label} sensor format is degenerate"));
            }
        }

        let (science_w, science_h) = self.science_format.dimensions_mm();
        if science_w > self.sensor_pitch_mm || science_h > self.sensor_pitch_mm {
            return fail(format!(
                "science sensors ({science_w:.1} x {science_h:.1} mm) overlap at a \
                 {:.1} mm sensor pitch",
                self.sensor_pitch_mm
            ));
        }
        if 2.0 * self.sensor_pitch_mm + science_w > self.raft_pitch_mm {
            return fail(format!(
                "science rafts overlap: 3 sensors at {:.1} mm pitch exceed the \
                 {:.1} mm raft pitch",
                self.sensor_pitch_mm, self.raft_pitch_mm
            ));
        }

        let (corner_w, corner_h) = self.corner_format.dimensions_mm();
        let station_pitch = self.sensor_pitch_mm / 2.0;
        if corner_w > station_pitch || corner_h > station_pitch {
            return fail(format!(
                "corner sensors ({corner_w:.1} x {corner_h:.1} mm) overlap at a \
                 {station_pitch:.1} mm station pitch"
            ));
        }
        for slot in &self.corner_station {
            if slot.sensor_x > 1 || slot.sensor_y > 1 {
                return fail(format!(
                    "corner station slot S:{},{} is outside the 2x2 grid",
                    slot.sensor_x, slot.sensor_y
                ));
            }
        }

        Ok(())
    }

    /// Whether a raft grid position is one of the four corner stations.
    fn is_corner(&self, raft_x: u8, raft_y: u8) -> bool {
        let last = self.raft_grid - 1;
        (raft_x == 0 || raft_x == last) && (raft_y == 0 || raft_y == last)
    }

    /// Build the camera this layout describes.
    pub fn build(&self) -> Result<Camera> {
        self.validate()?;

        let half_grid = (self.raft_grid - 1) as f64 / 2.0;
        let station_pitch = self.sensor_pitch_mm / 2.0;
        let mut detectors = Vec::new();

        for raft_x in 0..self.raft_grid {
            for raft_y in 0..self.raft_grid {
                let raft_cx = (raft_x as f64 - half_grid) * self.raft_pitch_mm;
                let raft_cy = (raft_y as f64 - half_grid) * self.raft_pitch_mm;

                if self.is_corner(raft_x, raft_y) {
                    for slot in &self.corner_station {
                        detectors.push(Detector::new(
                            DetectorId::new((raft_x, raft_y), (slot.sensor_x, slot.sensor_y)),
                            slot.kind,
                            self.corner_format.width_px,
                            self.corner_format.height_px,
                            self.corner_format.pixel_size_um,
                            (
                                raft_cx + (slot.sensor_x as f64 - 0.5) * station_pitch,
                                raft_cy + (slot.sensor_y as f64 - 0.5) * station_pitch,
                            ),
                        ));
                    }
                } else {
                    for sensor_x in 0..3u8 {
                        for sensor_y in 0..3u8 {
                            detectors.push(Detector::new(
                                DetectorId::new((raft_x, raft_y), (sensor_x, sensor_y)),
                                DetectorKind::Science,
                                self.science_format.width_px,
                                self.science_format.height_px,
                                self.science_format.pixel_size_um,
                                (
                                    raft_cx + (sensor_x as f64 - 1.0) * self.sensor_pitch_mm,
                                    raft_cy + (sensor_y as f64 - 1.0) * self.sensor_pitch_mm,
                                ),
                            ));
                        }
                    }
                }
            }
        }

        Camera::new(self.name.clone(), self.focal_length_mm, detectors)
    }
}

/// Predefined camera models.
pub mod models {
    use super::*;

    /// Wide-survey mosaic: a 5x5 raft grid with 21 science rafts of nine
    /// 4k x 4k sensors and four corner stations carrying guider, wavefront,
    /// and focus sensors. Plate scale is about 0.2 arcsec per 10 um pixel.
    pub static WIDE_SURVEY: Lazy<Camera> = Lazy::new(|| {
        MosaicLayout::default()
            .build()
            .expect("built-in wide-survey layout is valid")
    });
}
