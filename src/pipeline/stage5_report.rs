use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::metrics::report::assemble;
use crate::pipeline::Stage;
use crate::schema::v1::Results;

pub struct Stage5Report;

impl Stage5Report {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Report {
    fn name(&self) -> &'static str {
        "stage5_report"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let trajectory = ctx
            .trajectory
            .as_ref()
            .context("centroid trajectory missing")?;
        let weisskoff = ctx.weisskoff.as_ref().context("weisskoff result missing")?;
        let result = assemble(ctx.roi_size, trajectory, weisskoff);

        ctx.report.results = Some(Results::from(&result));
        ctx.report.warnings = ctx.warnings.clone();
        ctx.result = Some(result);

        info!("report_ready");
        Ok(())
    }
}
