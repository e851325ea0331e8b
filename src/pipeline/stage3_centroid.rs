use anyhow::Result;

use crate::ctx::Ctx;
use crate::metrics::centroid::track_centroid;
use crate::pipeline::Stage;

pub struct Stage3Centroid;

impl Stage3Centroid {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Centroid {
    fn name(&self) -> &'static str {
        "stage3_centroid"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let spacing = ctx.spacing()?;
        let trajectory = track_centroid(ctx.series()?, &spacing, ctx.threads)?;
        ctx.trajectory = Some(trajectory);
        Ok(())
    }
}
