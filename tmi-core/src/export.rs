//! Artifact export — composite CSV and JSON run manifest.
//!
//! The CSV is the durable output: header `time,open,high,low,close,volume`,
//! one row per composite bar, dates as `YYYY-MM-DD`, numerics in their
//! natural decimal rendering. Writes go to a `.tmp` sibling and rename
//! into place, so a failed run never leaves a truncated artifact behind
//! and each run fully replaces the previous one.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::CompositeBar;
use crate::pipeline::BuildReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv output is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("manifest serialization: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Render composite bars as CSV text.
pub fn composite_to_csv(bars: &[CompositeBar]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["time", "open", "high", "low", "close", "volume"])?;

    for bar in bars {
        wtr.write_record([
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }

    let data = wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(data)?)
}

/// Write the composite CSV, creating parent directories and atomically
/// replacing any prior artifact.
pub fn write_composite_csv(bars: &[CompositeBar], path: &Path) -> Result<(), ExportError> {
    let csv = composite_to_csv(bars)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, csv)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(())
}

/// Manifest sidecar path for a CSV artifact: `TMI.csv` → `TMI.manifest.json`.
pub fn manifest_path(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("manifest.json")
}

/// Write the run manifest next to the CSV artifact.
pub fn write_manifest(report: &BuildReport, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
