use serde::{Deserialize, Serialize};

use crate::metrics::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseSource {
    File,
    QuadraticDetrend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub series: String,
    pub noise: Option<String>,
    pub mask: String,
    pub shape: Option<[usize; 4]>,
    pub voxel_size_mm: Option<[f64; 3]>,
    pub tr_s: Option<f64>,
    pub discard_vol: usize,
    pub noise_source: NoiseSource,
    pub tissue_voxels: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Results {
    pub roi_size: usize,
    pub roi_std: Vec<f64>,
    pub radius_decorrelation: f64,
    pub rdc_degenerate: bool,
    pub roi_signal_mean: Vec<f64>,
    pub roi_signal_mean_fitted: Vec<f64>,
    pub center_of_mass_x: Vec<f64>,
    pub center_of_mass_y: Vec<f64>,
    pub center_of_mass_z: Vec<f64>,
    pub center_of_mass_drift_x: Vec<f64>,
    pub center_of_mass_drift_y: Vec<f64>,
    pub center_of_mass_drift_z: Vec<f64>,
    pub reference_centroid: [usize; 3],
    pub sfnr_center: f64,
    pub sfnr_edge: f64,
}

impl From<&AnalysisResult> for Results {
    fn from(r: &AnalysisResult) -> Self {
        let axis = |v: &[[f64; 3]], i: usize| v.iter().map(|c| c[i]).collect::<Vec<_>>();
        Self {
            roi_size: r.roi_size,
            roi_std: r.roi_std.clone(),
            radius_decorrelation: r.radius_decorrelation,
            rdc_degenerate: r.rdc_degenerate,
            roi_signal_mean: r.roi_signal_mean.clone(),
            roi_signal_mean_fitted: r.roi_signal_mean_fitted.clone(),
            center_of_mass_x: axis(&r.center_of_mass, 0),
            center_of_mass_y: axis(&r.center_of_mass, 1),
            center_of_mass_z: axis(&r.center_of_mass, 2),
            center_of_mass_drift_x: axis(&r.center_of_mass_drift, 0),
            center_of_mass_drift_y: axis(&r.center_of_mass_drift, 1),
            center_of_mass_drift_z: axis(&r.center_of_mass_drift, 2),
            reference_centroid: r.reference_centroid,
            sfnr_center: r.sfnr_center,
            sfnr_edge: r.sfnr_edge,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outputs {
    pub maps: Vec<String>,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsnrQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub results: Option<Results>,
    pub outputs: Outputs,
    pub warnings: Vec<String>,
}

impl TsnrQcV1 {
    pub fn empty(tool_version: &str, input_meta: InputMeta) -> Self {
        Self {
            tool: "kira-tsnrqc".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta,
            results: None,
            outputs: Outputs {
                maps: Vec::new(),
                tables: Vec::new(),
            },
            warnings: Vec::new(),
        }
    }
}
