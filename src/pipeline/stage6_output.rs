use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, nifti, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage6Output;

impl Stage6Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Output {
    fn name(&self) -> &'static str {
        "stage6_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let geometry = ctx.geometry.context("series geometry missing")?;
        let maps = ctx.maps.as_ref().context("statistic maps missing")?;

        let mut selected = vec![("sfnr", &maps.sfnr)];
        if ctx.save_all_outputs {
            selected.push(("tmean", &maps.mean));
            selected.push(("tstd", &maps.std));
            selected.push(("nstd", &maps.noise_std));
            selected.push(("tsnr", &maps.tsnr));
        }

        let mut written = Vec::with_capacity(selected.len());
        for (suffix, map) in selected {
            let path = ctx.output.map_path(suffix);
            nifti::write_map(&path, map, &geometry)?;
            written.push(file_name(&path));
        }
        ctx.report.outputs.maps = written;

        if ctx.write_tsv {
            tsv_writer::write_weisskoff_tsv(&ctx.output.weisskoff_tsv_path, ctx)?;
            tsv_writer::write_timeseries_tsv(&ctx.output.timeseries_tsv_path, ctx)?;
            ctx.report.outputs.tables = vec![
                file_name(&ctx.output.weisskoff_tsv_path),
                file_name(&ctx.output.timeseries_tsv_path),
            ];
        }

        json_writer::write_json(&ctx.output.json_path, &ctx.report)?;

        info!(
            out_dir = %ctx.output.out_dir.display(),
            maps = ctx.report.outputs.maps.len(),
            tables = ctx.report.outputs.tables.len(),
            "stage6_output_ready"
        );
        Ok(())
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
