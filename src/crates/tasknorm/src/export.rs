//! Flat interchange record and JSON / CSV export.
//!
//! Tags are joined with `", "` and the priority is upper-cased, so one row
//! reads well in a spreadsheet. Both encodings parse back into validated
//! [`TaskOutput`] records.

use crate::error::{Error, Result, ValidationError};
use crate::schema::{TagCategory, TaskOutput};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// File encoding for exported records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// One task as a flat row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub summary: String,
    pub tags: String,
    pub priority: String,
    pub confidence_score: Option<f64>,
    pub processing_time_ms: Option<f64>,
    pub original_text: String,
}

impl From<&TaskOutput> for ExportRecord {
    fn from(output: &TaskOutput) -> Self {
        let tags: Vec<&str> = output.tags().iter().map(TagCategory::as_str).collect();
        Self {
            summary: output.summary().to_string(),
            tags: tags.join(", "),
            priority: output.priority().as_str().to_uppercase(),
            confidence_score: output.confidence_score(),
            processing_time_ms: output.processing_time_ms(),
            original_text: output.original_text().to_string(),
        }
    }
}

impl TryFrom<ExportRecord> for TaskOutput {
    type Error = ValidationError;

    fn try_from(record: ExportRecord) -> std::result::Result<Self, Self::Error> {
        let tags = record
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect::<std::result::Result<Vec<TagCategory>, _>>()?;

        TaskOutput::new(
            record.summary,
            tags,
            record.priority.parse()?,
            record.original_text,
            record.confidence_score,
            record.processing_time_ms,
        )
    }
}

/// Encode records as a pretty-printed JSON array.
pub fn to_json(outputs: &[TaskOutput]) -> Result<String> {
    let records: Vec<ExportRecord> = outputs.iter().map(ExportRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Encode records as CSV with a header row.
pub fn to_csv(outputs: &[TaskOutput]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for output in outputs {
        writer.serialize(ExportRecord::from(output))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

pub fn from_json(json: &str) -> Result<Vec<TaskOutput>> {
    let records: Vec<ExportRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|r| TaskOutput::try_from(r).map_err(Error::from))
        .collect()
}

pub fn from_csv(data: &str) -> Result<Vec<TaskOutput>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut outputs = Vec::new();
    for record in reader.deserialize::<ExportRecord>() {
        outputs.push(TaskOutput::try_from(record?)?);
    }
    Ok(outputs)
}

/// Encode records in `format`.
pub fn export(outputs: &[TaskOutput], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(outputs),
        ExportFormat::Csv => to_csv(outputs),
    }
}

/// Encode records and write them to `path`, replacing any existing file.
pub fn write_export(path: &Path, outputs: &[TaskOutput], format: ExportFormat) -> Result<()> {
    let encoded = export(outputs, format)?;
    fs::write(path, encoded)?;
    info!(path = %path.display(), records = outputs.len(), "Export written");
    Ok(())
}
