use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::metrics::weisskoff::run_weisskoff;
use crate::pipeline::Stage;

pub struct Stage4Weisskoff;

impl Stage4Weisskoff {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Weisskoff {
    fn name(&self) -> &'static str {
        "stage4_weisskoff"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let trajectory = ctx
            .trajectory
            .as_ref()
            .context("centroid trajectory missing before Stage 4")?;
        let maps = ctx
            .maps
            .as_ref()
            .context("statistic maps missing before Stage 4")?;
        let result = run_weisskoff(
            ctx.series()?,
            trajectory.reference,
            &maps.sfnr,
            ctx.mask()?,
            ctx.roi_size,
            ctx.threads,
        )?;
        if result.degenerate {
            ctx.warnings.push(format!(
                "residual std at ROI size {} is zero; radius of decorrelation reported as 0",
                ctx.roi_size
            ));
        }
        ctx.weisskoff = Some(result);
        Ok(())
    }
}
