use chrono::NaiveDate;
use thiserror::Error;

use crate::period::BoundaryRule;

/// Failure to turn one data line into entries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid date {value:?}, expected DD/MM/YY")]
    DateFormat { value: String },

    #[error(
        "malformed row with {fields} fields: field count is not a mixture of \
         mandatory triplets plus optional quoted comments"
    )]
    MalformedRow { fields: usize },

    #[error("zero hours booked against {job}/{activity}")]
    ZeroHours { job: String, activity: String },

    #[error("invalid hours value {value:?}")]
    InvalidHours { value: String },

    #[error("empty {kind} code in field {field}")]
    EmptyCode { kind: &'static str, field: usize },

    #[error("unsupported comment {value:?}: comments must be one quoted field without commas")]
    UnsupportedComment { value: String },
}

/// Failure to place a date inside a billing period.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeriodError {
    #[error("no {rule} boundary found within {advances} days of {date}")]
    Unresolved {
        date: NaiveDate,
        rule: BoundaryRule,
        advances: u32,
    },

    #[error("{date} is {days} days before period end {period}, outside the 7-day window")]
    Gap {
        period: NaiveDate,
        date: NaiveDate,
        days: i64,
    },
}

/// Run-level failure while ingesting an input file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimesheetError {
    #[error("line {line} ({text:?}): {source}")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: ParseError,
    },

    #[error("line {line} ({text:?}): {source}")]
    Period {
        line: usize,
        text: String,
        #[source]
        source: PeriodError,
    },
}

impl TimesheetError {
    /// 1-based number of the offending input line.
    pub fn line(&self) -> usize {
        match self {
            Self::Parse { line, .. } | Self::Period { line, .. } => *line,
        }
    }
}
