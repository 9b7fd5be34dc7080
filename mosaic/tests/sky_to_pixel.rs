//! End-to-end checks of the sky-to-detector mapping
//!
//! Exercises the transform operations against both the built-in wide-survey
//! model and a small hand-built collection.

use approx::assert_relative_eq;
use mosaic::{
    corner_pixels, corner_sky, detector_at, pixel_at, Camera, Detector, DetectorId, DetectorKind,
    FrameSelection,
};
use pointing::Observation;

const SAMPLE_RA: [f64; 3] = [121.0, 121.7, 124.0];
const SAMPLE_DEC: [f64; 3] = [-35.2, -35.1, -34.0];

fn observation() -> Observation {
    Observation::from_degrees(121.7, -35.1, 32.0, 59_580.0)
}

/// Two-detector collection standing in for a full camera provider.
fn stub_camera() -> Camera {
    let wavefront = Detector::new(
        "R:0,4 S:1,0".parse().unwrap(),
        DetectorKind::Wavefront,
        2000,
        2000,
        10.0,
        (-40.0, 40.0),
    );
    let science = Detector::new(
        "R:2,2 S:1,1".parse().unwrap(),
        DetectorKind::Science,
        4000,
        4000,
        10.0,
        (0.0, 0.0),
    );
    Camera::new("stub", 10_000.0, vec![wavefront, science]).unwrap()
}

#[test]
fn every_kind_label_is_one_of_the_four_table_strings() {
    let _ = env_logger::builder().is_test(true).try_init();
    let camera = mosaic::load_camera();

    let allowed = ["science", "wavefront", "guider", "focus"];
    for det in camera.detectors() {
        assert!(
            allowed.contains(&det.kind().label()),
            "{} has unexpected label {:?}",
            det.name(),
            det.kind().label()
        );
    }
}

#[test]
fn stubbed_wavefront_sensor_labels_as_wavefront() {
    let camera = stub_camera();

    // Via iteration
    let labelled: Vec<(String, &str)> = camera
        .detectors()
        .map(|d| (d.name(), d.kind().label()))
        .collect();
    assert!(labelled.contains(&("R:0,4 S:1,0".to_string(), "wavefront")));

    // Via direct lookup
    let det = camera.lookup("R:0,4 S:1,0").unwrap();
    assert_eq!(det.kind().label(), "wavefront");
}

#[test]
fn outputs_match_input_length_and_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let camera = mosaic::load_camera();
    let obs = observation();

    let names = detector_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs).unwrap();
    let (x, y) = pixel_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs, FrameSelection::Resolve).unwrap();

    assert_eq!(names.len(), 3);
    assert_eq!(x.len(), 3);
    assert_eq!(y.len(), 3);

    // Order: each batch entry equals the same position run on its own
    for i in 0..SAMPLE_RA.len() {
        let single_names =
            detector_at(&SAMPLE_RA[i..=i], &SAMPLE_DEC[i..=i], camera, &obs).unwrap();
        assert_eq!(single_names[0], names[i], "name order broken at {i}");

        let (sx, sy) = pixel_at(
            &SAMPLE_RA[i..=i],
            &SAMPLE_DEC[i..=i],
            camera,
            &obs,
            FrameSelection::Resolve,
        )
        .unwrap();
        assert!(
            sx[0] == x[i] || (sx[0].is_nan() && x[i].is_nan()),
            "pixel x order broken at {i}"
        );
        assert!(
            sy[0] == y[i] || (sy[0].is_nan() && y[i].is_nan()),
            "pixel y order broken at {i}"
        );
    }
}

#[test]
fn example_positions_resolve_as_expected() {
    let camera = mosaic::load_camera();
    let obs = observation();

    let names = detector_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs).unwrap();

    // First two are within the field; the third misses the focal plane
    assert!(names[0].is_some());
    assert_eq!(names[1].unwrap().to_string(), "R:2,2 S:1,1");
    assert!(names[2].is_none());

    // The boresight position lands on the exact center of the center sensor
    let (x, y) = pixel_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs, FrameSelection::Resolve).unwrap();
    assert_relative_eq!(x[1], 2000.0, epsilon = 1e-6);
    assert_relative_eq!(y[1], 2000.0, epsilon = 1e-6);

    // The miss keeps its slot as a NaN pair
    assert!(x[2].is_nan() && y[2].is_nan());
}

#[test]
fn pre_resolved_names_give_identical_pixels() {
    let camera = mosaic::load_camera();
    let obs = observation();

    let names = detector_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs).unwrap();

    let (x_resolved, y_resolved) =
        pixel_at(&SAMPLE_RA, &SAMPLE_DEC, camera, &obs, FrameSelection::Resolve).unwrap();
    let (x_prenamed, y_prenamed) = pixel_at(
        &SAMPLE_RA,
        &SAMPLE_DEC,
        camera,
        &obs,
        FrameSelection::PerPosition(&names),
    )
    .unwrap();

    for i in 0..SAMPLE_RA.len() {
        assert!(
            x_resolved[i] == x_prenamed[i] || (x_resolved[i].is_nan() && x_prenamed[i].is_nan()),
            "x differs at {i}: {} vs {}",
            x_resolved[i],
            x_prenamed[i]
        );
        assert!(
            y_resolved[i] == y_prenamed[i] || (y_resolved[i].is_nan() && y_prenamed[i].is_nan()),
            "y differs at {i}: {} vs {}",
            y_resolved[i],
            y_prenamed[i]
        );
    }
}

#[test]
fn fixed_target_overrides_natural_resolution() {
    let camera = mosaic::load_camera();
    let obs = observation();

    // The boresight naturally falls on R:2,2 S:1,1 at its pixel center
    let boresight_ra = [obs.boresight().ra_degrees()];
    let boresight_dec = [obs.boresight().dec_degrees()];

    let natural = detector_at(&boresight_ra, &boresight_dec, camera, &obs).unwrap();
    assert_eq!(natural[0].unwrap().to_string(), "R:2,2 S:1,1");

    // Force it onto the next sensor over: same point, that sensor's frame
    let neighbor: DetectorId = "R:2,2 S:2,1".parse().unwrap();
    let (x, y) = pixel_at(
        &boresight_ra,
        &boresight_dec,
        camera,
        &obs,
        FrameSelection::Fixed(&neighbor),
    )
    .unwrap();

    // Neighbor center is 42 mm away along +x; its left edge is at 22 mm,
    // so the boresight sits 2200 px outside that edge.
    assert_relative_eq!(x[0], -2200.0, epsilon = 1e-6);
    assert_relative_eq!(y[0], 2000.0, epsilon = 1e-6);
}

#[test]
fn corners_come_in_parallel_fours() {
    let camera = mosaic::load_camera();
    let obs = observation();
    let id: DetectorId = "R:0,4 S:1,0".parse().unwrap();

    let pixels = corner_pixels(&id, camera).unwrap();
    let sky = corner_sky(&id, camera, &obs).unwrap();

    assert_eq!(pixels.len(), 4);
    assert_eq!(sky.len(), 4);

    // Projecting the sky corners back onto the same detector recovers the
    // pixel corners, entry for entry
    let ra: Vec<f64> = sky.iter().map(|c| c.ra_degrees()).collect();
    let dec: Vec<f64> = sky.iter().map(|c| c.dec_degrees()).collect();
    let (x, y) = pixel_at(&ra, &dec, camera, &obs, FrameSelection::Fixed(&id)).unwrap();

    for i in 0..4 {
        assert_relative_eq!(x[i], pixels[i].0, epsilon = 1e-6);
        assert_relative_eq!(y[i], pixels[i].1, epsilon = 1e-6);
    }
}

#[test]
fn gap_between_stub_detectors_is_reported_absent() {
    let camera = stub_camera();

    // Point the camera so the boresight lands between the two footprints
    let obs = Observation::from_degrees(200.0, 10.0, 0.0, 59_580.0);

    // 0.17 degrees north of the boresight: about 30 mm up at a 10 m focal
    // length, in the gap between the science and wavefront footprints
    let names = detector_at(&[200.0], &[10.17], &camera, &obs).unwrap();
    assert_eq!(names, vec![None]);

    let (x, y) = pixel_at(&[200.0], &[10.17], &camera, &obs, FrameSelection::Resolve).unwrap();
    assert!(x[0].is_nan() && y[0].is_nan());
}
