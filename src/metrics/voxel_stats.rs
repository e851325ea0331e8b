use ndarray::{Array3, Array4, Axis, Zip};
use tracing::info;

use crate::error::AnalysisError;
use crate::math::stats::{mean, safe_div, std_dev};
use crate::metrics::StatisticMaps;

/// Checks that raw and noise agree on all four axes and the mask on the spatial ones.
pub fn check_shapes(
    raw: &Array4<f64>,
    noise: &Array4<f64>,
    mask: &Array3<u8>,
) -> Result<(), AnalysisError> {
    if raw.shape() != noise.shape() {
        return Err(AnalysisError::ShapeMismatch {
            what: "noise series",
            expected: raw.shape().to_vec(),
            got: noise.shape().to_vec(),
        });
    }
    if mask.shape() != &raw.shape()[..3] {
        return Err(AnalysisError::ShapeMismatch {
            what: "mask",
            expected: raw.shape()[..3].to_vec(),
            got: mask.shape().to_vec(),
        });
    }
    Ok(())
}

pub fn compute_statistic_maps(
    raw: &Array4<f64>,
    noise: &Array4<f64>,
    mask: &Array3<u8>,
) -> Result<StatisticMaps, AnalysisError> {
    check_shapes(raw, noise, mask)?;

    let mut mean_map = raw.map_axis(Axis(3), mean);
    let mut std_map = raw.map_axis(Axis(3), std_dev);
    let mut noise_std = noise.map_axis(Axis(3), std_dev);

    Zip::from(&mut mean_map)
        .and(&mut std_map)
        .and(&mut noise_std)
        .and(mask)
        .for_each(|m, s, n, &tissue| {
            if tissue == 0 {
                *m = 0.0;
                *s = 0.0;
                *n = 0.0;
            }
        });

    let tsnr = Zip::from(&mean_map)
        .and(&std_map)
        .map_collect(|&m, &s| safe_div(m, s));
    let sfnr = Zip::from(&mean_map)
        .and(&noise_std)
        .map_collect(|&m, &n| safe_div(m, n));

    let tissue = mask.iter().filter(|v| **v != 0).count();
    info!(tissue_voxels = tissue, frames = raw.shape()[3], "statistic_maps_ready");

    Ok(StatisticMaps {
        mean: mean_map,
        std: std_map,
        noise_std,
        tsnr,
        sfnr,
    })
}
