//! Synthetic volumes shared by the integration tests.
#![allow(dead_code)]

use std::path::Path;

use kira_tsnrqc::io::nifti::{self, Geometry};
use kira_tsnrqc::metrics::Spacing;
use ndarray::{Array3, Array4};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Spatially and temporally white Gaussian noise on a constant baseline.
pub fn white_noise_series(
    shape: (usize, usize, usize, usize),
    baseline: f64,
    sigma: f64,
    seed: u64,
) -> Array4<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    Array4::from_shape_fn(shape, |_| baseline + normal.sample(&mut rng))
}

/// White noise plus a per-frame fluctuation shared by every voxel.
pub fn common_mode_series(
    shape: (usize, usize, usize, usize),
    baseline: f64,
    sigma: f64,
    common_sigma: f64,
    seed: u64,
) -> Array4<f64> {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let normal = Normal::new(0.0, common_sigma).unwrap();
    let common: Vec<f64> = (0..shape.3).map(|_| normal.sample(&mut rng)).collect();
    let mut series = white_noise_series(shape, baseline, sigma, seed);
    for ((_, _, _, t), v) in series.indexed_iter_mut() {
        *v += common[t];
    }
    series
}

pub fn full_mask(nx: usize, ny: usize, nz: usize) -> Array3<u8> {
    Array3::from_elem((nx, ny, nz), 1u8)
}

pub fn spacing(voxel_mm: f64) -> Spacing {
    Spacing {
        voxel_mm: [voxel_mm; 3],
        tr_s: 2.0,
    }
}

pub fn write_inputs(dir: &Path, raw: &Array4<f64>, mask: &Array3<u8>) {
    let geometry = Geometry::isotropic(3.0, 2.0);
    nifti::write_series(&dir.join("raw.nii.gz"), raw, &geometry).unwrap();
    nifti::write_map(&dir.join("mask.nii.gz"), &mask.mapv(f64::from), &geometry).unwrap();
}
