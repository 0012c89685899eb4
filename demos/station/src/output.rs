//! File output for the demo: run records as CSV, the report as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use sirq_record::RunRecord;
use sirq_stats::BatchReport;

/// Write one CSV row per record (header from the field names).
pub fn write_records_csv<'a>(
    path:    &Path,
    records: impl IntoIterator<Item = &'a RunRecord>,
) -> Result<usize> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut rows = 0;
    for record in records {
        writer.serialize(record)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

pub fn write_report_json(path: &Path, report: &BatchReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    Ok(())
}
