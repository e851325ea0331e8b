//! kira-tsnrqc: temporal stability QC for repeated volumetric acquisitions.
//!
//! - `metrics`: voxel statistics, centroid drift, Weisskoff analysis, result assembly
//! - `math`: descriptive statistics, quadratic fitting, index-parallel maps
//! - `io`: NIfTI volumes, JSON report, plot tables, terminal summary
//! - `pipeline`: staged CLI run over a shared `Ctx`

pub mod cli;
pub mod ctx;
pub mod error;
pub mod io;
pub mod math;
pub mod metrics;
pub mod pipeline;
pub mod schema;

pub use error::AnalysisError;
pub use metrics::{Analysis, AnalysisConfig, AnalysisResult, SeriesInput, Spacing, analyze};
