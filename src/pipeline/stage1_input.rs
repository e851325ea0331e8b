use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::nifti;
use crate::metrics::detrend::detrend_quadratic;
use crate::metrics::voxel_stats::check_shapes;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let series = nifti::read_series(&ctx.input)
            .with_context(|| format!("failed to load series {}", ctx.input.display()))?;
        let mask = nifti::read_mask(&ctx.mask_path)
            .with_context(|| format!("failed to load mask {}", ctx.mask_path.display()))?;

        let noise = match &ctx.noise_path {
            Some(path) => {
                let noise = nifti::read_series(path)
                    .with_context(|| format!("failed to load noise series {}", path.display()))?;
                noise.data
            }
            None => {
                warn!("no noise series supplied; detrending the series with a quadratic fit");
                ctx.warnings.push(
                    "noise series derived by built-in quadratic detrend".to_string(),
                );
                detrend_quadratic(&series.data)?
            }
        };

        check_shapes(&series.data, &noise, &mask)?;

        let shape = series.data.shape();
        let shape = [shape[0], shape[1], shape[2], shape[3]];
        let tissue = mask.iter().filter(|v| **v != 0).count();
        let geometry = series.geometry;

        info!(
            nx = shape[0],
            ny = shape[1],
            nz = shape[2],
            nt = shape[3],
            tr_s = geometry.tr_s,
            tissue_voxels = tissue,
            "input_loaded"
        );
        if geometry.voxel_mm.iter().any(|v| *v <= 0.0) {
            warn!(voxel_mm = ?geometry.voxel_mm, "non-positive voxel size; drift will be scaled by it as-is");
            ctx.warnings
                .push(format!("non-positive voxel size {:?}", geometry.voxel_mm));
        }
        if tissue == 0 {
            ctx.warnings.push("mask contains no tissue voxels".to_string());
        }

        ctx.report.input_meta.shape = Some(shape);
        ctx.report.input_meta.voxel_size_mm = Some(geometry.voxel_mm);
        ctx.report.input_meta.tr_s = Some(geometry.tr_s);
        ctx.report.input_meta.tissue_voxels = Some(tissue as u64);

        ctx.series = Some(series.data);
        ctx.noise = Some(noise);
        ctx.mask = Some(mask);
        ctx.geometry = Some(geometry);

        Ok(())
    }
}
