//! Aggregate figures over a set of processed tasks.

use crate::processor::round_ms;
use crate::schema::{Priority, TagCategory, TaskOutput};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    /// Count per priority level, low to critical; absent levels omitted
    pub priorities: BTreeMap<Priority, usize>,
    /// Count per tag, in vocabulary order; absent tags omitted
    pub tags: BTreeMap<TagCategory, usize>,
    /// Mean processing time over records that carry one
    pub average_processing_ms: Option<f64>,
}

impl BatchStats {
    pub fn from_outputs<'a, I>(outputs: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskOutput>,
    {
        let mut stats = BatchStats::default();
        let mut timed = 0usize;
        let mut total_ms = 0.0;

        for output in outputs {
            stats.total += 1;
            *stats.priorities.entry(output.priority()).or_default() += 1;
            for tag in output.tags() {
                *stats.tags.entry(*tag).or_default() += 1;
            }
            if let Some(ms) = output.processing_time_ms() {
                timed += 1;
                total_ms += ms;
            }
        }

        if timed > 0 {
            stats.average_processing_ms = Some(round_ms(total_ms / timed as f64));
        }

        stats
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
