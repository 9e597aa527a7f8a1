//! Console rendering of processed tasks

use crate::schema::{Priority, TaskOutput};
use crate::stats::BatchStats;
use crate::text::preview;
use colored::{ColoredString, Colorize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Task display row for table output
#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Original")]
    original: String,
}

impl From<&TaskOutput> for TaskRow {
    fn from(task: &TaskOutput) -> Self {
        let tags: Vec<String> = task
            .tags()
            .iter()
            .map(|t| t.as_str().cyan().to_string())
            .collect();

        TaskRow {
            summary: task.summary().to_string(),
            tags: tags.join(", "),
            priority: priority_label(task.priority()).to_string(),
            confidence: task
                .confidence_score()
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string()),
            original: preview(task.original_text(), 30),
        }
    }
}

/// Upper-cased priority colored by urgency
pub fn priority_label(priority: Priority) -> ColoredString {
    let label = priority.as_str().to_uppercase();
    match priority {
        Priority::Low => label.blue(),
        Priority::Medium => label.green(),
        Priority::High => label.yellow(),
        Priority::Critical => label.red(),
    }
}

pub fn render_table(tasks: &[&TaskOutput]) -> String {
    let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from(*t)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_stats(stats: &BatchStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Summary".bold()));
    out.push_str(&format!("  Tasks processed: {}\n", stats.total));

    if let Some(avg) = stats.average_processing_ms {
        out.push_str(&format!("  Avg processing time: {:.2} ms\n", avg));
    }

    if !stats.priorities.is_empty() {
        let parts: Vec<String> = stats
            .priorities
            .iter()
            .map(|(p, n)| format!("{} {}", priority_label(*p), n))
            .collect();
        out.push_str(&format!("  Priorities: {}\n", parts.join(", ")));
    }

    if !stats.tags.is_empty() {
        let parts: Vec<String> = stats.tags.iter().map(|(t, n)| format!("{} {}", t, n)).collect();
        out.push_str(&format!("  Tags: {}\n", parts.join(", ")));
    }

    out
}
