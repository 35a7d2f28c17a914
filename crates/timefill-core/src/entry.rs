//! Typed time entries produced by the record parser.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `strftime` format of dates in the input file and on the destination form.
pub const DATE_FORMAT: &str = "%d/%m/%y";

/// Quote character that delimits comments in the input file.
pub const QUOTE: char = '"';

/// One (job, activity, hours, comment) group booked against a date.
///
/// `job` and `activity` are trimmed and non-empty, `hours` is finite and
/// non-zero. `comment` has its surrounding quotes removed; any quotes inside
/// it survive until the fill plan is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: NaiveDate,
    pub job: String,
    pub activity: String,
    pub hours: f64,
    pub comment: Option<String>,
}

impl Entry {
    pub fn new(
        date: NaiveDate,
        job: impl Into<String>,
        activity: impl Into<String>,
        hours: f64,
        comment: Option<&str>,
    ) -> Self {
        Self {
            date,
            job: job.into(),
            activity: activity.into(),
            hours,
            comment: comment.map(str::to_string),
        }
    }
}
