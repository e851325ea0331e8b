use ndarray::{Array4, Axis};
use tracing::info;

use crate::error::AnalysisError;
use crate::math::poly::QuadraticBasis;

/// Residual of a per-voxel least-squares quadratic fit against frame index.
///
/// Stands in for an external polort-2 detrend when no noise series is supplied.
pub fn detrend_quadratic(raw: &Array4<f64>) -> Result<Array4<f64>, AnalysisError> {
    let n_frames = raw.shape()[3];
    let basis = QuadraticBasis::new(n_frames).ok_or(AnalysisError::TooFewTimepoints {
        got: n_frames,
        min: QuadraticBasis::MIN_SAMPLES,
    })?;

    let mut noise = raw.to_owned();
    for mut lane in noise.lanes_mut(Axis(3)) {
        let fit = basis.fit(lane.view());
        for (t, v) in lane.iter_mut().enumerate() {
            *v -= fit.eval(t as f64);
        }
    }
    info!(frames = n_frames, "quadratic_detrend_ready");
    Ok(noise)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_quadratic_drift() {
        let mut raw = Array4::zeros((2, 1, 1, 30));
        for t in 0..30 {
            let tf = t as f64;
            raw[[0, 0, 0, t]] = 500.0 + 0.4 * tf - 0.01 * tf * tf;
            raw[[1, 0, 0, t]] = 80.0;
        }
        let noise = detrend_quadratic(&raw).unwrap();
        assert!(noise.iter().all(|v| v.abs() < 1e-9));
    }
}
