use ndarray::{Array4, Axis};
use tracing::info;

use crate::error::AnalysisError;
use crate::math::par::map_indices;
use crate::metrics::{CentroidTrajectory, Spacing, spatial_extent};

/// Intensity-weighted centre of mass of frame `t` over the whole volume, in voxel coordinates.
pub fn frame_centroid(raw: &Array4<f64>, t: usize) -> Result<[f64; 3], AnalysisError> {
    let frame = raw.index_axis(Axis(3), t);
    let mut total = 0.0;
    let mut acc = [0.0f64; 3];
    for ((x, y, z), &w) in frame.indexed_iter() {
        total += w;
        acc[0] += x as f64 * w;
        acc[1] += y as f64 * w;
        acc[2] += z as f64 * w;
    }
    if total == 0.0 || !total.is_finite() {
        return Err(AnalysisError::ZeroIntensityFrame { frame: t });
    }
    Ok([acc[0] / total, acc[1] / total, acc[2] / total])
}

pub fn track_centroid(
    raw: &Array4<f64>,
    spacing: &Spacing,
    threads: usize,
) -> Result<CentroidTrajectory, AnalysisError> {
    let n_frames = raw.shape()[3];
    if n_frames == 0 {
        return Err(AnalysisError::TooFewTimepoints { got: 0, min: 1 });
    }

    let per_frame = map_indices(n_frames, threads, |t| frame_centroid(raw, t))?;
    let mut centroids = Vec::with_capacity(n_frames);
    for c in per_frame {
        centroids.push(c?);
    }

    let reference = reference_centroid(centroids[0], spatial_extent(raw))?;

    let origin = centroids[0];
    let mut drift_mm = vec![[0.0f64; 3]; n_frames];
    for (t, c) in centroids.iter().enumerate().skip(1) {
        for axis in 0..3 {
            drift_mm[t][axis] = (c[axis] - origin[axis]) * spacing.voxel_mm[axis];
        }
    }

    info!(
        frames = n_frames,
        reference_x = reference[0],
        reference_y = reference[1],
        reference_z = reference[2],
        "centroid_ready"
    );

    Ok(CentroidTrajectory {
        centroids,
        drift_mm,
        reference,
    })
}

/// Floors a centroid to voxel indices; the result must address a voxel of the volume.
pub fn reference_centroid(
    centroid: [f64; 3],
    shape: [usize; 3],
) -> Result<[usize; 3], AnalysisError> {
    let floored = centroid.map(|c| c.floor() as i64);
    let inside = floored
        .iter()
        .zip(shape.iter())
        .all(|(&c, &extent)| c >= 0 && (c as usize) < extent);
    if !inside {
        return Err(AnalysisError::ReferenceOutsideVolume {
            centroid: floored,
            shape,
        });
    }
    Ok(floored.map(|c| c as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bright_voxel_is_the_centroid() {
        let mut raw = Array4::zeros((5, 6, 3, 2));
        raw[[3, 4, 1, 0]] = 10.0;
        raw[[2, 4, 1, 1]] = 10.0;
        let spacing = Spacing {
            voxel_mm: [2.0, 2.0, 3.0],
            tr_s: 1.0,
        };
        let traj = track_centroid(&raw, &spacing, 0).unwrap();
        assert_eq!(traj.centroids[0], [3.0, 4.0, 1.0]);
        assert_eq!(traj.reference, [3, 4, 1]);
        assert_eq!(traj.drift_mm[0], [0.0, 0.0, 0.0]);
        assert_eq!(traj.drift_mm[1], [-2.0, 0.0, 0.0]);
    }

    #[test]
    fn reference_floors_fractional_centroid() {
        assert_eq!(reference_centroid([4.9, 0.2, 2.5], [5, 5, 5]).unwrap(), [4, 0, 2]);
        assert!(reference_centroid([-0.5, 1.0, 1.0], [5, 5, 5]).is_err());
    }
}
