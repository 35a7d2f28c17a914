//! Whole-file ingestion: parse every data line, resolve and aggregate.
//!
//! Ingestion is all-or-nothing. The first bad line aborts the run with its
//! line number, so nothing downstream ever sees a partially read file.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::entry::Entry;
use crate::error::TimesheetError;
use crate::parser::{is_comment_line, parse_line};
use crate::period::{BoundaryRule, PeriodKey};
use crate::store::AggregationStore;

const BOM: char = '\u{feff}';

/// A parsed entry tagged with the period it was filed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub line: usize,
    pub entry: Entry,
    pub period: PeriodKey,
}

impl fmt::Display for Record {
    /// Trace form: `2024-01-02, J1, A1, 4hrs, EOW: 2024-01-07, "note"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.entry;
        write!(
            f,
            "{}, {}, {}, {}hrs, EOW: {}",
            e.date, e.job, e.activity, e.hours, self.period
        )?;
        if let Some(comment) = &e.comment {
            write!(f, ", \"{comment}\"")?;
        }
        Ok(())
    }
}

/// Result of ingesting one input file.
#[derive(Debug, Clone, Default)]
pub struct Ingest {
    pub records: Vec<Record>,
    pub store: AggregationStore,
    pub skipped_lines: usize,
}

/// Parse and aggregate every line of `input` under `rule`.
pub fn ingest(input: &str, rule: BoundaryRule) -> Result<Ingest, TimesheetError> {
    let mut result = Ingest::default();
    // Leading byte-order mark, as written by some editors.
    let input = input.strip_prefix(BOM).unwrap_or(input);

    for (index, text) in input.lines().enumerate() {
        let line = index + 1;
        if is_comment_line(text) {
            result.skipped_lines += 1;
            continue;
        }

        let entries = parse_line(text).map_err(|source| TimesheetError::Parse {
            line,
            text: text.to_string(),
            source,
        })?;

        for entry in entries {
            let period = result
                .store
                .record(entry.clone(), rule)
                .map_err(|source| TimesheetError::Period {
                    line,
                    text: text.to_string(),
                    source,
                })?;
            result.records.push(Record {
                line,
                entry,
                period,
            });
        }
    }

    info!(
        %rule,
        records = result.records.len(),
        periods = result.store.len(),
        skipped = result.skipped_lines,
        "ingested timesheet entries"
    );
    Ok(result)
}
