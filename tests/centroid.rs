mod common;

use kira_tsnrqc::AnalysisError;
use kira_tsnrqc::metrics::centroid::{frame_centroid, track_centroid};
use ndarray::Array4;

#[test]
fn drift_at_first_frame_is_exactly_zero() {
    let raw = common::white_noise_series((8, 8, 3, 12), 500.0, 20.0, 11);
    let traj = track_centroid(&raw, &common::spacing(2.5), 0).unwrap();
    assert_eq!(traj.centroids.len(), 12);
    assert_eq!(traj.drift_mm.len(), 12);
    assert_eq!(traj.drift_mm[0], [0.0, 0.0, 0.0]);
}

#[test]
fn drift_is_scaled_by_voxel_size() {
    let mut raw = Array4::zeros((6, 6, 2, 3));
    raw[[2, 2, 0, 0]] = 1.0;
    raw[[3, 2, 0, 1]] = 1.0;
    raw[[2, 4, 1, 2]] = 1.0;
    let mut spacing = common::spacing(1.0);
    spacing.voxel_mm = [2.0, 3.0, 4.0];

    let traj = track_centroid(&raw, &spacing, 0).unwrap();
    assert_eq!(traj.reference, [2, 2, 0]);
    assert_eq!(traj.drift_mm[1], [2.0, 0.0, 0.0]);
    assert_eq!(traj.drift_mm[2], [0.0, 6.0, 4.0]);
}

#[test]
fn centroid_is_intensity_weighted() {
    let mut raw = Array4::zeros((4, 1, 1, 1));
    raw[[0, 0, 0, 0]] = 1.0;
    raw[[3, 0, 0, 0]] = 3.0;
    let c = frame_centroid(&raw, 0).unwrap();
    assert!((c[0] - 2.25).abs() < 1e-12);
    assert_eq!(c[1], 0.0);
    assert_eq!(c[2], 0.0);
}

#[test]
fn zero_intensity_frame_is_an_error() {
    let mut raw = Array4::from_elem((4, 4, 2, 3), 10.0);
    raw.index_axis_mut(ndarray::Axis(3), 2).fill(0.0);
    let err = track_centroid(&raw, &common::spacing(1.0), 0).unwrap_err();
    assert_eq!(err, AnalysisError::ZeroIntensityFrame { frame: 2 });
}
