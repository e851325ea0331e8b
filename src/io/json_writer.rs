use std::path::Path;

use anyhow::{Context, Result};

use crate::schema::v1::TsnrQcV1;

pub fn write_json(path: &Path, report: &TsnrQcV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)
        .with_context(|| format!("failed to serialize report to {}", path.display()))?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<TsnrQcV1> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let report = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse report {}", path.display()))?;
    Ok(report)
}
