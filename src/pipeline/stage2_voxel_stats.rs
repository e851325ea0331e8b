use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::metrics::voxel_stats::compute_statistic_maps;
use crate::pipeline::Stage;

pub struct Stage2VoxelStats;

impl Stage2VoxelStats {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2VoxelStats {
    fn name(&self) -> &'static str {
        "stage2_voxel_stats"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let noise = ctx.noise.as_ref().context("noise series not loaded")?;
        let maps = compute_statistic_maps(ctx.series()?, noise, ctx.mask()?)?;
        ctx.maps = Some(maps);
        // The noise series is only needed for its std map.
        ctx.noise = None;
        Ok(())
    }
}
