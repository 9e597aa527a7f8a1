//! CLI command implementations
//!
//! Command handlers for the `tasknorm` binary.

pub mod process;
pub mod render;

use crate::export::ExportFormat;
use clap::ValueEnum;

/// How processed tasks are printed or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored table followed by batch statistics
    #[default]
    Table,
    /// JSON array of flat records
    Json,
    /// CSV with a header row
    Csv,
}

impl OutputFormat {
    /// File encoding used for `--output`; a table is written as JSON.
    pub fn export_format(&self) -> ExportFormat {
        match self {
            OutputFormat::Table | OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Csv => ExportFormat::Csv,
        }
    }
}

pub use process::{handle_process, handle_process_with};
