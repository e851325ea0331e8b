use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{what} shape {got:?} does not match expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("series has {got} timepoints; at least {min} are required")]
    TooFewTimepoints { got: usize, min: usize },
    #[error("ROI size must be a positive integer")]
    InvalidRoiSize,
    #[error(
        "ROI size {roi_size} too large for volume: {axis} window [{lo}, {hi}) exceeds extent {extent}"
    )]
    RoiOutOfBounds {
        roi_size: usize,
        axis: char,
        lo: i64,
        hi: i64,
        extent: usize,
    },
    #[error("reference centroid {centroid:?} lies outside volume {shape:?}")]
    ReferenceOutsideVolume { centroid: [i64; 3], shape: [usize; 3] },
    #[error("frame {frame} has zero total intensity; centroid is undefined")]
    ZeroIntensityFrame { frame: usize },
    #[error("no tissue voxels on reference slice z={z}")]
    EmptyMaskSlice { z: usize },
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}
