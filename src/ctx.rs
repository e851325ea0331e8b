use std::path::{Path, PathBuf};

use anyhow::Context;
use ndarray::{Array3, Array4};

use crate::io::nifti::Geometry;
use crate::metrics::{
    AnalysisResult, CentroidTrajectory, DEFAULT_ROI_SIZE, Spacing, StatisticMaps, WeisskoffResult,
};
use crate::schema::v1::{InputMeta, NoiseSource, TsnrQcV1};

pub const DEFAULT_DISCARD_VOL: usize = 3;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub outbase: String,
    pub json_path: PathBuf,
    pub weisskoff_tsv_path: PathBuf,
    pub timeseries_tsv_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf, outbase: String) -> Self {
        let json_path = out_dir.join(format!("{}_results.json", outbase));
        let weisskoff_tsv_path = out_dir.join(format!("{}_weisskoff.tsv", outbase));
        let timeseries_tsv_path = out_dir.join(format!("{}_timeseries.tsv", outbase));
        Self {
            out_dir,
            outbase,
            json_path,
            weisskoff_tsv_path,
            timeseries_tsv_path,
        }
    }

    /// `<out_dir>/<outbase>_<suffix>.nii.gz`
    pub fn map_path(&self, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("{}_{}.nii.gz", self.outbase, suffix))
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub noise_path: Option<PathBuf>,
    pub mask_path: PathBuf,
    pub roi_size: usize,
    pub discard_vol: usize,
    pub save_all_outputs: bool,
    pub write_tsv: bool,
    pub threads: usize,
    pub series: Option<Array4<f64>>,
    pub noise: Option<Array4<f64>>,
    pub mask: Option<Array3<u8>>,
    pub geometry: Option<Geometry>,
    pub noise_source: NoiseSource,
    pub maps: Option<StatisticMaps>,
    pub trajectory: Option<CentroidTrajectory>,
    pub weisskoff: Option<WeisskoffResult>,
    pub result: Option<AnalysisResult>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: TsnrQcV1,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        noise_path: Option<PathBuf>,
        mask_path: PathBuf,
        out_dir: PathBuf,
        outbase: Option<String>,
        tool_version: &str,
    ) -> Self {
        let outbase = outbase
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_outbase(&input));
        let noise_source = if noise_path.is_some() {
            NoiseSource::File
        } else {
            NoiseSource::QuadraticDetrend
        };
        let input_meta = InputMeta {
            series: input.display().to_string(),
            noise: noise_path.as_ref().map(|p| p.display().to_string()),
            mask: mask_path.display().to_string(),
            shape: None,
            voxel_size_mm: None,
            tr_s: None,
            discard_vol: DEFAULT_DISCARD_VOL,
            noise_source,
            tissue_voxels: None,
        };
        Self {
            input,
            noise_path,
            mask_path,
            roi_size: DEFAULT_ROI_SIZE,
            discard_vol: DEFAULT_DISCARD_VOL,
            save_all_outputs: false,
            write_tsv: false,
            threads: 0,
            series: None,
            noise: None,
            mask: None,
            geometry: None,
            noise_source,
            maps: None,
            trajectory: None,
            weisskoff: None,
            result: None,
            warnings: Vec::new(),
            output: OutputPaths::new(out_dir, outbase),
            report: TsnrQcV1::empty(tool_version, input_meta),
        }
    }

    pub fn spacing(&self) -> anyhow::Result<Spacing> {
        let geometry = self.geometry.as_ref().context("series geometry missing")?;
        Ok(Spacing {
            voxel_mm: geometry.voxel_mm,
            tr_s: geometry.tr_s,
        })
    }

    pub fn series(&self) -> anyhow::Result<&Array4<f64>> {
        self.series.as_ref().context("series not loaded")
    }

    pub fn mask(&self) -> anyhow::Result<&Array3<u8>> {
        self.mask.as_ref().context("mask not loaded")
    }

    /// Acquisition time in seconds of frame `t`, counting the volumes discarded upstream.
    pub fn frame_time_s(&self, t: usize) -> f64 {
        let tr = self.geometry.as_ref().map(|g| g.tr_s).unwrap_or(0.0);
        (t + self.discard_vol + 1) as f64 * tr
    }
}

/// File name up to its first `.`, e.g. `scan.nii.gz` -> `scan`.
pub fn default_outbase(input: &Path) -> String {
    input
        .file_name()
        .and_then(|s| s.to_str())
        .and_then(|s| s.split('.').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("tsnr")
        .to_string()
}
