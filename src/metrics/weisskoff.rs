//! Weisskoff analysis: residual variability of the mean signal in growing square ROIs.
//!
//! For spatially white noise the residual std of an r x r ROI falls as 1/r, so the ratio of
//! the single-voxel std to the largest-ROI std (the radius of decorrelation) approaches the
//! ROI size. Correlated noise flattens the curve and shrinks the radius.

use std::ops::Range;

use ndarray::{Array1, Array3, Array4, ArrayView1, Axis, s};
use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::math::par::map_indices;
use crate::math::poly::QuadraticBasis;
use crate::math::stats::{percentile, std_dev};
use crate::metrics::{WeisskoffCurve, WeisskoffResult, WeisskoffScale, spatial_extent};

pub const EDGE_PERCENTILE: f64 = 95.0;

/// Half-open window `[c - side/2, c + side/2 + side%2)` along one axis.
///
/// Odd sides are centred on `c`; even sides extend one voxel further towards +axis.
pub fn window_bounds(center: i64, side: usize) -> (i64, i64) {
    let half = (side / 2) as i64;
    let odd = (side % 2) as i64;
    (center - half, center + half + odd)
}

fn checked_window(
    center: usize,
    side: usize,
    extent: usize,
    axis: char,
) -> Result<Range<usize>, AnalysisError> {
    let (lo, hi) = window_bounds(center as i64, side);
    if lo < 0 || hi > extent as i64 {
        return Err(AnalysisError::RoiOutOfBounds {
            roi_size: side,
            axis,
            lo,
            hi,
            extent,
        });
    }
    Ok(lo as usize..hi as usize)
}

/// In-plane window of side `side` around `reference`, validated against the volume extent.
pub fn roi_window(
    reference: [usize; 3],
    side: usize,
    shape: [usize; 3],
) -> Result<(Range<usize>, Range<usize>), AnalysisError> {
    if side == 0 {
        return Err(AnalysisError::InvalidRoiSize);
    }
    let xs = checked_window(reference[0], side, shape[0], 'x')?;
    let ys = checked_window(reference[1], side, shape[1], 'y')?;
    Ok((xs, ys))
}

/// Mean intensity inside the window per frame.
pub fn roi_trace(raw: &Array4<f64>, xs: Range<usize>, ys: Range<usize>, z: usize) -> Array1<f64> {
    let area = (xs.len() * ys.len()) as f64;
    let window = raw.slice(s![xs, ys, z, ..]);
    window.sum_axis(Axis(0)).sum_axis(Axis(0)) / area
}

fn analyze_scale(
    raw: &Array4<f64>,
    reference: [usize; 3],
    side: usize,
    basis: &QuadraticBasis,
) -> Result<WeisskoffScale, AnalysisError> {
    let (xs, ys) = roi_window(reference, side, spatial_extent(raw))?;
    let trace = roi_trace(raw, xs, ys, reference[2]);
    let fit = basis.fit(trace.view());
    let fitted = fit.fitted(trace.len());
    let residual: Vec<f64> = trace.iter().zip(&fitted).map(|(y, f)| y - f).collect();
    let residual_std = std_dev(ArrayView1::from(&residual[..]));
    Ok(WeisskoffScale {
        side,
        trace: trace.to_vec(),
        fitted,
        residual_std,
    })
}

pub fn run_weisskoff(
    raw: &Array4<f64>,
    reference: [usize; 3],
    sfnr: &Array3<f64>,
    mask: &Array3<u8>,
    roi_size: usize,
    threads: usize,
) -> Result<WeisskoffResult, AnalysisError> {
    if roi_size == 0 {
        return Err(AnalysisError::InvalidRoiSize);
    }
    let shape = spatial_extent(raw);
    for (what, got) in [("sfnr map", sfnr.shape()), ("mask", mask.shape())] {
        if got != &shape[..] {
            return Err(AnalysisError::ShapeMismatch {
                what,
                expected: shape.to_vec(),
                got: got.to_vec(),
            });
        }
    }
    let n_frames = raw.shape()[3];
    let basis = QuadraticBasis::new(n_frames).ok_or(AnalysisError::TooFewTimepoints {
        got: n_frames,
        min: QuadraticBasis::MIN_SAMPLES,
    })?;
    if reference[2] >= shape[2] {
        return Err(AnalysisError::ReferenceOutsideVolume {
            centroid: reference.map(|c| c as i64),
            shape,
        });
    }

    // Windows are nested in r, so the largest one bounds every scale.
    let (xs, ys) = roi_window(reference, roi_size, shape)?;

    let per_scale = map_indices(roi_size, threads, |i| {
        analyze_scale(raw, reference, i + 1, &basis)
    })?;
    let mut scales = Vec::with_capacity(roi_size);
    for scale in per_scale {
        scales.push(scale?);
    }

    let first = scales[0].residual_std;
    let last = scales[roi_size - 1].residual_std;
    let (radius_decorrelation, degenerate) = decorrelation_radius(first, last);
    if degenerate {
        warn!(
            roi_size,
            first_std = first,
            last_std = last,
            "radius of decorrelation undefined; reporting 0"
        );
    }

    let z = reference[2];
    let footprint = sfnr.slice(s![xs, ys, z]);
    let sfnr_center = footprint.sum() / footprint.len() as f64;

    let mut tissue: Vec<f64> = sfnr
        .index_axis(Axis(2), z)
        .iter()
        .zip(mask.index_axis(Axis(2), z).iter())
        .filter(|(_, m)| **m != 0)
        .map(|(v, _)| *v)
        .collect();
    let sfnr_edge =
        percentile(&mut tissue, EDGE_PERCENTILE).ok_or(AnalysisError::EmptyMaskSlice { z })?;

    info!(
        roi_size,
        radius = radius_decorrelation,
        sfnr_center,
        sfnr_edge,
        "weisskoff_ready"
    );

    Ok(WeisskoffResult {
        curve: WeisskoffCurve { scales },
        radius_decorrelation,
        degenerate,
        sfnr_center,
        sfnr_edge,
    })
}

/// `first / last`, or `(0.0, true)` when the ratio is undefined.
pub fn decorrelation_radius(first: f64, last: f64) -> (f64, bool) {
    if last == 0.0 {
        return (0.0, true);
    }
    let ratio = first / last;
    if ratio.is_finite() {
        (ratio, false)
    } else {
        (0.0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_windows_are_symmetric() {
        assert_eq!(window_bounds(10, 1), (10, 11));
        assert_eq!(window_bounds(10, 3), (9, 12));
        assert_eq!(window_bounds(10, 21), (0, 21));
    }

    #[test]
    fn even_windows_lean_positive() {
        assert_eq!(window_bounds(10, 2), (9, 11));
        assert_eq!(window_bounds(10, 4), (8, 12));
    }

    #[test]
    fn zero_denominator_is_degenerate() {
        assert_eq!(decorrelation_radius(0.0, 0.0), (0.0, true));
        assert_eq!(decorrelation_radius(1.0, 0.0), (0.0, true));
        assert_eq!(decorrelation_radius(2.0, 0.5), (4.0, false));
    }
}
