use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;

/// One row per ROI side: measured residual std and the white-noise expectation `std(1)/r`.
pub fn write_weisskoff_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let result = ctx.result.as_ref().context("analysis result missing")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let ideal = result.ideal_roi_std();
    writeln!(w, "roi_length\troi_std\tideal_std")?;
    for (i, (std, ideal)) in result.roi_std.iter().zip(&ideal).enumerate() {
        writeln!(w, "{}\t{:.6}\t{:.6}", i + 1, std, ideal)?;
    }
    w.flush()?;
    Ok(())
}

/// One row per frame: largest-ROI mean signal with its fit, centroid and drift.
pub fn write_timeseries_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let result = ctx.result.as_ref().context("analysis result missing")?;
    let n = result.center_of_mass.len();
    ensure_len(result.center_of_mass_drift.len(), n, "drift")?;
    ensure_len(result.roi_signal_mean.len(), n, "roi_signal_mean")?;
    ensure_len(result.roi_signal_mean_fitted.len(), n, "roi_signal_mean_fitted")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "frame\ttime_s\troi_signal_mean\troi_signal_mean_fitted\tcom_x\tcom_y\tcom_z\tdrift_x_mm\tdrift_y_mm\tdrift_z_mm"
    )?;
    for t in 0..n {
        let c = result.center_of_mass[t];
        let d = result.center_of_mass_drift[t];
        writeln!(
            w,
            "{}\t{:.3}\t{:.6}\t{:.6}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            t,
            ctx.frame_time_s(t),
            result.roi_signal_mean[t],
            result.roi_signal_mean_fitted[t],
            c[0],
            c[1],
            c[2],
            d[0],
            d[1],
            d[2]
        )?;
    }
    w.flush()?;
    Ok(())
}

fn ensure_len(got: usize, expected: usize, name: &str) -> Result<()> {
    if got != expected {
        bail!("{} length mismatch: {} != {}", name, got, expected);
    }
    Ok(())
}
