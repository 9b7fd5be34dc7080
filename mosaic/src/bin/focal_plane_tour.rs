//! Guided tour of the sky-to-detector mapping
//!
//! Loads the wide-survey camera, prints the detector lookup table, and then
//! walks the transform operations with a handful of literal sky positions:
//! detector resolution, pixel coordinates (resolved, pre-resolved, and
//! forced onto one detector), and detector corners in both pixel and sky
//! coordinates.

use anyhow::{Context, Result};
use clap::Parser;
use mosaic::{
    corner_pixels, corner_sky, detector_at, pixel_at, Camera, DetectorId, FrameSelection,
    MosaicLayout,
};
use pointing::Observation;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Walk the sky-to-detector mapping of a survey mosaic camera")]
struct Args {
    /// JSON layout file overriding the built-in wide-survey model
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Pointing right ascension in degrees
    #[arg(long, default_value_t = 121.7)]
    ra: f64,

    /// Pointing declination in degrees
    #[arg(long, default_value_t = -35.1)]
    dec: f64,

    /// Sky rotation angle in degrees
    #[arg(long, default_value_t = 32.0)]
    rot: f64,

    /// Modified Julian date of the observation
    #[arg(long, default_value_t = 59580.0)]
    mjd: f64,

    /// Detector used for the direct lookup and corner examples
    #[arg(long, default_value = "R:0,4 S:1,0")]
    detector: String,
}

/// Example sky positions: two near the pointing, one off the focal plane.
const SAMPLE_RA: [f64; 3] = [121.0, 121.7, 124.0];
const SAMPLE_DEC: [f64; 3] = [-35.2, -35.1, -34.0];

fn format_pair(x: f64, y: f64) -> String {
    if x.is_nan() {
        "(not on a detector)".to_string()
    } else {
        format!("({x:9.2}, {y:9.2})")
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let built;
    let camera: &Camera = match &args.layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading layout file {}", path.display()))?;
            let layout: MosaicLayout = serde_json::from_str(&text)
                .with_context(|| format!("parsing layout file {}", path.display()))?;
            built = layout.build()?;
            &built
        }
        None => mosaic::load_camera(),
    };

    println!("Camera: {} ({} detectors)", camera.name(), camera.len());
    println!("Focal length: {:.0} mm\n", camera.focal_length_mm());

    println!("Detector lookup table");
    println!("---------------------");
    for det in camera.detectors() {
        println!("{:<12} {}", det.name(), det.kind().label());
    }
    println!();

    let highlight: DetectorId = args.detector.parse()?;
    let det = camera
        .get(&highlight)
        .with_context(|| format!("detector {highlight} not in this camera"))?;
    println!("Direct lookup: {} is a {} sensor\n", highlight, det.kind().label());

    let obs = Observation::from_degrees(args.ra, args.dec, args.rot, args.mjd);
    println!(
        "Observation: RA {:.2} deg, Dec {:.2} deg, rotation {:.1} deg, MJD {:.1}\n",
        obs.boresight().ra_degrees(),
        obs.boresight().dec_degrees(),
        obs.rotation_degrees(),
        obs.mjd()
    );

    println!("Which detector does each sky position fall on?");
    let names = detector_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs)?;
    for ((ra, dec), name) in SAMPLE_RA.iter().zip(&SAMPLE_DEC).zip(&names) {
        match name {
            Some(id) => println!("  ({ra:7.2}, {dec:7.2}) -> {id}"),
            None => println!("  ({ra:7.2}, {dec:7.2}) -> no detector (gap or off the focal plane)"),
        }
    }
    println!();

    println!("Pixel coordinates, resolving each position's detector:");
    let (x_resolved, y_resolved) = pixel_at(
        &SAMPLE_RA,
        &SAMPLE_DEC,
        camera,
        &obs,
        FrameSelection::Resolve,
    )?;
    for ((ra, dec), (x, y)) in SAMPLE_RA
        .iter()
        .zip(&SAMPLE_DEC)
        .zip(x_resolved.iter().zip(&y_resolved))
    {
        println!("  ({ra:7.2}, {dec:7.2}) -> {}", format_pair(*x, *y));
    }

    // Reusing the names from detector_at skips the resolution pass
    let (x_prenamed, y_prenamed) = pixel_at(
        &SAMPLE_RA,
        &SAMPLE_DEC,
        camera,
        &obs,
        FrameSelection::PerPosition(&names),
    )?;
    let identical = x_resolved
        .iter()
        .zip(&y_resolved)
        .zip(x_prenamed.iter().zip(&y_prenamed))
        .all(|((xa, ya), (xb, yb))| {
            (xa == xb || (xa.is_nan() && xb.is_nan())) && (ya == yb || (ya.is_nan() && yb.is_nan()))
        });
    println!("Passing the pre-resolved names gives identical output: {identical}\n");

    let target: DetectorId = "R:2,2 S:1,1".parse()?;
    println!("Pixel coordinates forced onto {target}:");
    let (x_fixed, y_fixed) = pixel_at(
        &SAMPLE_RA,
        &SAMPLE_DEC,
        camera,
        &obs,
        FrameSelection::Fixed(&target),
    )?;
    for ((ra, dec), (x, y)) in SAMPLE_RA
        .iter()
        .zip(&SAMPLE_DEC)
        .zip(x_fixed.iter().zip(&y_fixed))
    {
        println!("  ({ra:7.2}, {dec:7.2}) -> {}", format_pair(*x, *y));
    }
    println!();

    println!("Corners of {highlight} (sky corners parallel the pixel ordering,");
    println!("they are not sorted by min/max RA or Dec):");
    let pixels = corner_pixels(&highlight, camera)?;
    let sky = corner_sky(&highlight, camera, &obs)?;
    for ((px, py), coord) in pixels.iter().zip(&sky) {
        println!(
            "  pixel ({px:6.0}, {py:6.0})  ->  sky ({:9.4}, {:9.4}) deg",
            coord.ra_degrees(),
            coord.dec_degrees()
        );
    }

    Ok(())
}
