//! Record parser for timesheet input lines.
//!
//! A data line is a date followed by one or more repeating groups:
//!
//! ```text
//! DD/MM/YY,job,activity,hours[,"comment"],job,activity,hours[,"comment"],...
//! ```
//!
//! Each group has three mandatory fields. A fourth field belongs to the group
//! only when it starts with a quote after trimming; otherwise it starts the
//! next group. Fields are consumed by a cursor, and a line whose fields do not
//! line up exactly with whole groups is rejected.

use chrono::NaiveDate;

use crate::entry::{DATE_FORMAT, Entry, QUOTE};
use crate::error::ParseError;

/// Fields in a group before the optional comment.
const GROUP_FIELDS: usize = 3;

/// Whether a raw line carries no records (blank, whitespace-only or `#`).
pub fn is_comment_line(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    line.trim().is_empty() || line.starts_with('#')
}

/// Parse one non-comment line into its entries, in field order.
pub fn parse_line(line: &str) -> Result<Vec<Entry>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(',').collect();
    let date = parse_date(fields[0])?;

    let mut entries = Vec::new();
    let mut cursor = 1;
    while cursor < fields.len() {
        if fields.len() - cursor < GROUP_FIELDS {
            return Err(ParseError::MalformedRow {
                fields: fields.len(),
            });
        }

        let job = parse_code(fields[cursor], "job", cursor)?;
        let activity = parse_code(fields[cursor + 1], "activity", cursor + 1)?;
        let hours = parse_hours(fields[cursor + 2], job, activity)?;
        cursor += GROUP_FIELDS;

        let mut comment = None;
        if let Some(field) = fields.get(cursor)
            && field.trim_start().starts_with(QUOTE)
        {
            comment = parse_comment(field)?;
            cursor += 1;
        }

        entries.push(Entry::new(date, job, activity, hours, comment));
    }

    if entries.is_empty() {
        return Err(ParseError::MalformedRow {
            fields: fields.len(),
        });
    }
    Ok(entries)
}

/// Parse a `DD/MM/YY` date field.
pub fn parse_date(field: &str) -> Result<NaiveDate, ParseError> {
    let value = field.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ParseError::DateFormat {
        value: value.to_string(),
    })
}

fn parse_code<'a>(field: &'a str, kind: &'static str, index: usize) -> Result<&'a str, ParseError> {
    let code = field.trim();
    if code.is_empty() {
        return Err(ParseError::EmptyCode { kind, field: index });
    }
    Ok(code)
}

fn parse_hours(field: &str, job: &str, activity: &str) -> Result<f64, ParseError> {
    let value = field.trim();
    let hours: f64 = value.parse().map_err(|_| ParseError::InvalidHours {
        value: value.to_string(),
    })?;
    if !hours.is_finite() {
        return Err(ParseError::InvalidHours {
            value: value.to_string(),
        });
    }
    if hours == 0.0 {
        return Err(ParseError::ZeroHours {
            job: job.to_string(),
            activity: activity.to_string(),
        });
    }
    Ok(hours)
}

/// Strip the delimiting quotes from a comment field.
///
/// A field with an opening quote but no closing one is what a comma inside a
/// comment produces after splitting, and is rejected rather than guessed at.
fn parse_comment(field: &str) -> Result<Option<&str>, ParseError> {
    let value = field.trim();
    let inner = value
        .strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
        .ok_or_else(|| ParseError::UnsupportedComment {
            value: value.to_string(),
        })?;
    Ok((!inner.is_empty()).then_some(inner))
}
