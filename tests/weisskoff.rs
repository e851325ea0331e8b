mod common;

use kira_tsnrqc::AnalysisError;
use kira_tsnrqc::metrics::WeisskoffResult;
use kira_tsnrqc::metrics::weisskoff::{roi_trace, roi_window, run_weisskoff, window_bounds};
use ndarray::{Array3, Array4};

fn run(
    raw: &Array4<f64>,
    reference: [usize; 3],
    roi_size: usize,
) -> Result<WeisskoffResult, AnalysisError> {
    let shape = raw.shape();
    let sfnr = Array3::zeros((shape[0], shape[1], shape[2]));
    let mask = common::full_mask(shape[0], shape[1], shape[2]);
    run_weisskoff(raw, reference, &sfnr, &mask, roi_size, 0)
}

#[test]
fn window_examples() {
    assert_eq!(window_bounds(10, 1), (10, 11));
    assert_eq!(window_bounds(10, 2), (9, 11));
    assert_eq!(window_bounds(10, 3), (9, 12));
    assert_eq!(window_bounds(10, 21), (0, 21));
}

#[test]
fn zero_roi_size_is_rejected() {
    assert_eq!(
        roi_window([4, 4, 1], 0, [9, 9, 3]),
        Err(AnalysisError::InvalidRoiSize)
    );
}

#[test]
fn largest_window_touching_the_border_fits() {
    let raw = Array4::from_elem((9, 9, 3, 6), 100.0);
    let result = run(&raw, [4, 4, 1], 9).unwrap();
    assert_eq!(result.curve.scales.len(), 9);
    assert_eq!(result.curve.scales[8].side, 9);
}

#[test]
fn one_more_voxel_leaves_the_volume() {
    let raw = Array4::from_elem((9, 9, 3, 6), 100.0);
    let err = run(&raw, [4, 4, 1], 10).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::RoiOutOfBounds {
            roi_size: 10,
            axis: 'x',
            lo: -1,
            hi: 9,
            extent: 9,
        }
    );
}

#[test]
fn constant_series_is_degenerate() {
    let raw = Array4::from_elem((9, 9, 3, 10), 100.0);
    let result = run(&raw, [4, 4, 1], 5).unwrap();
    assert!(result.degenerate);
    assert_eq!(result.radius_decorrelation, 0.0);
    for scale in &result.curve.scales {
        assert_eq!(scale.residual_std, 0.0);
        assert!(scale.trace.iter().all(|v| (*v - 100.0).abs() < 1e-9));
    }
}

#[test]
fn two_frames_are_too_few() {
    let raw = Array4::from_elem((9, 9, 3, 2), 100.0);
    let err = run(&raw, [4, 4, 1], 3).unwrap_err();
    assert_eq!(err, AnalysisError::TooFewTimepoints { got: 2, min: 3 });
}

#[test]
fn roi_trace_averages_the_window() {
    let mut raw = Array4::zeros((4, 4, 1, 2));
    raw[[1, 1, 0, 0]] = 4.0;
    raw[[2, 2, 0, 1]] = 8.0;
    let trace = roi_trace(&raw, 1..3, 1..3, 0);
    assert_eq!(trace.to_vec(), vec![1.0, 2.0]);
}

#[test]
fn white_noise_radius_approaches_roi_size() {
    let roi_size = 21;
    let raw = common::white_noise_series((32, 32, 4, 400), 1000.0, 1.0, 7);
    let result = run(&raw, [15, 15, 1], roi_size).unwrap();

    assert!(!result.degenerate);
    let r = result.radius_decorrelation;
    assert!(
        r > 0.75 * roi_size as f64 && r < 1.3 * roi_size as f64,
        "radius {r} not near {roi_size}"
    );

    // residual std falls roughly as 1/r
    let stds = result.curve.residual_stds();
    for (i, s) in stds.iter().enumerate() {
        let scaled = s * (i + 1) as f64;
        assert!(
            (scaled - stds[0]).abs() < 0.3 * stds[0],
            "scale {} deviates: {scaled} vs {}",
            i + 1,
            stds[0]
        );
    }
}

#[test]
fn common_mode_noise_shrinks_the_radius() {
    let raw = common::common_mode_series((32, 32, 4, 400), 1000.0, 1.0, 5.0, 3);
    let result = run(&raw, [15, 15, 1], 21).unwrap();
    assert!(!result.degenerate);
    assert!(
        result.radius_decorrelation < 5.0,
        "radius {} should collapse under common-mode noise",
        result.radius_decorrelation
    );
}

#[test]
fn sfnr_summaries_use_reference_slice() {
    let raw = Array4::from_elem((9, 9, 3, 6), 100.0);
    let mut sfnr = Array3::zeros((9, 9, 3));
    for x in 0..9 {
        for y in 0..9 {
            sfnr[[x, y, 1]] = 10.0;
        }
    }
    sfnr[[0, 0, 1]] = 50.0;
    let mut mask = Array3::zeros((9, 9, 3));
    mask[[0, 0, 1]] = 1u8;

    let result = run_weisskoff(&raw, [4, 4, 1], &sfnr, &mask, 3, 0).unwrap();
    assert!((result.sfnr_center - 10.0).abs() < 1e-12);
    assert!((result.sfnr_edge - 50.0).abs() < 1e-12);
}

#[test]
fn empty_mask_on_reference_slice_is_an_error() {
    let raw = Array4::from_elem((9, 9, 3, 6), 100.0);
    let sfnr = Array3::zeros((9, 9, 3));
    let mut mask = Array3::zeros((9, 9, 3));
    mask[[4, 4, 0]] = 1u8;
    let err = run_weisskoff(&raw, [4, 4, 1], &sfnr, &mask, 3, 0).unwrap_err();
    assert_eq!(err, AnalysisError::EmptyMaskSlice { z: 1 });
}
