use crate::metrics::{AnalysisResult, CentroidTrajectory, WeisskoffResult};

pub fn assemble(
    roi_size: usize,
    trajectory: &CentroidTrajectory,
    weisskoff: &WeisskoffResult,
) -> AnalysisResult {
    let (roi_signal_mean, roi_signal_mean_fitted) = match weisskoff.curve.largest() {
        Some(scale) => (scale.trace.clone(), scale.fitted.clone()),
        None => (Vec::new(), Vec::new()),
    };

    AnalysisResult {
        roi_size,
        roi_std: weisskoff.curve.residual_stds(),
        radius_decorrelation: weisskoff.radius_decorrelation,
        rdc_degenerate: weisskoff.degenerate,
        roi_signal_mean,
        roi_signal_mean_fitted,
        center_of_mass: trajectory.centroids.clone(),
        center_of_mass_drift: trajectory.drift_mm.clone(),
        reference_centroid: trajectory.reference,
        sfnr_center: weisskoff.sfnr_center,
        sfnr_edge: weisskoff.sfnr_edge,
    }
}

impl AnalysisResult {
    /// Largest absolute drift component over all frames and axes, in mm.
    pub fn peak_drift_mm(&self) -> f64 {
        self.center_of_mass_drift
            .iter()
            .flat_map(|d| d.iter())
            .fold(0.0f64, |acc, v| acc.max(v.abs()))
    }

    /// Residual std of an ideal white-noise ROI of each side: `roi_std[0] / r`.
    pub fn ideal_roi_std(&self) -> Vec<f64> {
        let first = self.roi_std.first().copied().unwrap_or(0.0);
        (1..=self.roi_std.len()).map(|r| first / r as f64).collect()
    }
}
