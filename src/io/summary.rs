use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let result = ctx.result.as_ref().context("analysis result missing")?;
    let meta = &ctx.report.input_meta;

    let mut out = String::new();
    out.push_str(&format!("kira-tsnrqc v{}\n", version));
    if let Some([nx, ny, nz, nt]) = meta.shape {
        out.push_str(&format!(
            "Input: {}x{}x{} voxels, {} frames, TR={:.2}s\n",
            nx,
            ny,
            nz,
            nt,
            meta.tr_s.unwrap_or(0.0)
        ));
    }
    if result.rdc_degenerate {
        out.push_str(&format!(
            "Radius of decorrelation: undefined (ROI {})\n",
            result.roi_size
        ));
    } else {
        out.push_str(&format!(
            "Radius of decorrelation: {:.1} (ROI {})\n",
            result.radius_decorrelation, result.roi_size
        ));
    }
    out.push_str(&format!(
        "SFNR: center={:.2} edge(p95)={:.2}\n",
        result.sfnr_center, result.sfnr_edge
    ));
    out.push_str(&format!(
        "Peak centroid drift: {:.4} mm\n",
        result.peak_drift_mm()
    ));

    Ok(out)
}
