//! `process` command handler

use crate::batch::{parse_task_lines, BatchReport, BatchRunner};
use crate::cli::render::{render_stats, render_table};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::export::{to_csv, to_json, write_export};
use crate::schema::TaskOutput;
use crate::stats::BatchStats;
use crate::text::truncate_chars;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Handle the process command
///
/// Results go to stdout, failures and progress to stderr.
pub async fn handle_process(
    runner: &BatchRunner,
    text: &str,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<BatchReport> {
    handle_process_with(runner, text, format, output, &mut io::stdout(), &mut io::stderr()).await
}

/// [`handle_process`] writing to the given streams.
///
/// Runs every non-blank line of `text` through the pipeline, reports failed
/// lines individually on `err`, then prints the successful records in
/// `format` on `out` and optionally writes them to `output`.
pub async fn handle_process_with<O, E>(
    runner: &BatchRunner,
    text: &str,
    format: OutputFormat,
    output: Option<&Path>,
    out: &mut O,
    err: &mut E,
) -> Result<BatchReport>
where
    O: Write,
    E: Write,
{
    let lines = parse_task_lines(text);
    if lines.is_empty() {
        writeln!(err, "{}", "No tasks found in input".yellow())?;
        return Ok(BatchReport::default());
    }

    let progress = ProgressBar::new(lines.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    progress.set_message("Processing tasks...");

    let report = runner
        .run_with_progress(lines, |item| {
            progress.inc(1);
            progress.set_message(format!("line {}", item.line));
        })
        .await;
    progress.finish_and_clear();

    for (item, error) in report.failures() {
        writeln!(
            err,
            "{} Failed to process: {}...",
            "✗".red().bold(),
            truncate_chars(&item.raw_text, 50)
        )?;
        writeln!(err, "  {}", error.to_string().dimmed())?;
    }

    let outputs: Vec<TaskOutput> = report.outputs().into_iter().cloned().collect();

    match format {
        OutputFormat::Table => {
            let stats = BatchStats::from_outputs(&outputs);
            if stats.is_empty() {
                writeln!(out, "{}", "No tasks processed".yellow())?;
            } else {
                let refs: Vec<&TaskOutput> = outputs.iter().collect();
                writeln!(out, "{}", render_table(&refs))?;
                writeln!(out)?;
                write!(out, "{}", render_stats(&stats))?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", to_json(&outputs)?)?,
        OutputFormat::Csv => write!(out, "{}", to_csv(&outputs)?)?,
    }

    if let Some(path) = output {
        write_export(path, &outputs, format.export_format())?;
        writeln!(
            err,
            "{} Exported {} task(s) to {}",
            "✓".green().bold(),
            outputs.len(),
            path.display()
        )?;
    }

    Ok(report)
}
