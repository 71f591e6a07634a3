//! JSON export for bonus reports.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::bonus::BonusSample;
use super::statistics::BonusReport;

/// Report plus the raw samples it was built from.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub report: &'a BonusReport,
    pub samples: &'a [BonusSample],
}

/// Writes any serialisable value as pretty-printed JSON.
pub fn export_to_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")?;

    let mut file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}
