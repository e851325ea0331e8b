use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ctx::DEFAULT_DISCARD_VOL;
use crate::metrics::DEFAULT_ROI_SIZE;

#[derive(Debug, Parser)]
#[command(
    name = "kira-tsnrqc",
    version,
    about = "Temporal SNR, SFNR and Weisskoff stability QC for repeated volumetric scans"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    #[arg(long, help = "4D time series (.nii or .nii.gz), leading volumes already discarded")]
    pub input: PathBuf,

    #[arg(
        long,
        help = "Detrended 4D series; when omitted a per-voxel quadratic detrend is applied"
    )]
    pub noise: Option<PathBuf>,

    #[arg(long, help = "3D binary tissue mask")]
    pub mask: PathBuf,

    #[arg(long, default_value_t = DEFAULT_ROI_SIZE, help = "Side of the largest square ROI in the Weisskoff analysis")]
    pub roi_size: usize,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Basename of output files (default: input name up to the first '.')")]
    pub outbase: Option<String>,

    #[arg(
        long,
        default_value_t = DEFAULT_DISCARD_VOL,
        help = "Volumes discarded upstream; offsets the time axis of the plot tables"
    )]
    pub discard_vol: usize,

    #[arg(long, default_value_t = false, help = "Also write tmean, tstd, nstd and tsnr maps")]
    pub save_all_outputs: bool,

    #[arg(long, default_value_t = false, help = "Write Weisskoff and time-series plot tables")]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = scalar; >1 requires feature 'mt')")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}
