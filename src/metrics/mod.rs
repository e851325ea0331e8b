use ndarray::{Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub mod centroid;
pub mod detrend;
pub mod report;
pub mod voxel_stats;
pub mod weisskoff;

pub const DEFAULT_ROI_SIZE: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub voxel_mm: [f64; 3],
    pub tr_s: f64,
}

#[derive(Debug, Clone)]
pub struct SeriesInput {
    pub raw: Array4<f64>,
    pub noise: Array4<f64>,
    pub mask: Array3<u8>,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    pub roi_size: usize,
    /// 0 or 1 runs the scalar path; more requires the `mt` feature.
    pub threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            roi_size: DEFAULT_ROI_SIZE,
            threads: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticMaps {
    pub mean: Array3<f64>,
    pub std: Array3<f64>,
    pub noise_std: Array3<f64>,
    pub tsnr: Array3<f64>,
    pub sfnr: Array3<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CentroidTrajectory {
    /// Intensity-weighted centroid per frame, voxel coordinates.
    pub centroids: Vec<[f64; 3]>,
    /// Displacement from frame 0 in mm.
    pub drift_mm: Vec<[f64; 3]>,
    /// Frame-0 centroid floored to voxel indices; anchors every ROI.
    pub reference: [usize; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeisskoffScale {
    pub side: usize,
    pub trace: Vec<f64>,
    pub fitted: Vec<f64>,
    pub residual_std: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeisskoffCurve {
    pub scales: Vec<WeisskoffScale>,
}

impl WeisskoffCurve {
    pub fn residual_stds(&self) -> Vec<f64> {
        self.scales.iter().map(|s| s.residual_std).collect()
    }

    pub fn largest(&self) -> Option<&WeisskoffScale> {
        self.scales.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeisskoffResult {
    pub curve: WeisskoffCurve,
    pub radius_decorrelation: f64,
    /// Set when the largest-scale residual std is zero and the radius is undefined.
    pub degenerate: bool,
    pub sfnr_center: f64,
    pub sfnr_edge: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub roi_size: usize,
    pub roi_std: Vec<f64>,
    pub radius_decorrelation: f64,
    pub rdc_degenerate: bool,
    pub roi_signal_mean: Vec<f64>,
    pub roi_signal_mean_fitted: Vec<f64>,
    pub center_of_mass: Vec<[f64; 3]>,
    pub center_of_mass_drift: Vec<[f64; 3]>,
    pub reference_centroid: [usize; 3],
    pub sfnr_center: f64,
    pub sfnr_edge: f64,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub maps: StatisticMaps,
}

/// Runs the full chain: statistic maps, centroid trajectory, Weisskoff analysis, report.
pub fn analyze(input: &SeriesInput, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    let maps = voxel_stats::compute_statistic_maps(&input.raw, &input.noise, &input.mask)?;
    let trajectory = centroid::track_centroid(&input.raw, &input.spacing, config.threads)?;
    let weisskoff = weisskoff::run_weisskoff(
        &input.raw,
        trajectory.reference,
        &maps.sfnr,
        &input.mask,
        config.roi_size,
        config.threads,
    )?;
    let result = report::assemble(config.roi_size, &trajectory, &weisskoff);
    Ok(Analysis { result, maps })
}

/// `(x, y, z)` extent of a series.
pub fn spatial_extent(raw: &Array4<f64>) -> [usize; 3] {
    let shape = raw.shape();
    [shape[0], shape[1], shape[2]]
}
