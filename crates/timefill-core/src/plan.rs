//! Fill plan: the store linearised for the form-filling collaborator.
//!
//! One [`PeriodSubmission`] per period in first-seen order, one [`LineItem`]
//! per (job, activity) in first-seen order, and seven day slots per line
//! running from `period - 6` to `period`. Days with no booking stay `None`
//! so the destination field is left untouched rather than zero-filled.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::{DATE_FORMAT, QUOTE};
use crate::error::PeriodError;
use crate::period::{MAX_ADVANCES, PeriodKey};
use crate::store::{AggregationKey, AggregationStore, LineCells};

/// Day slots per line item.
pub const DAYS_PER_PERIOD: usize = 7;

/// One populated day of a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub hours: f64,
    pub comment: String,
}

impl DayCell {
    /// Hours as shown for review and typed into the day's quantity field.
    pub fn hours_text(&self) -> String {
        format_hours(self.hours)
    }
}

/// Hours rounded to hundredths without trailing zeros: `6`, `7.5`, `0.25`.
///
/// Float noise from merging (`0.1 + 0.2`) never reaches the operator or the
/// destination form.
pub fn format_hours(hours: f64) -> String {
    let text = format!("{hours:.2}");
    match text.trim_end_matches('0').trim_end_matches('.') {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// A (job, activity) row with its seven day slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub job: String,
    pub activity: String,
    pub days: [Option<DayCell>; DAYS_PER_PERIOD],
}

impl LineItem {
    pub fn total_hours(&self) -> f64 {
        self.days.iter().flatten().map(|cell| cell.hours).sum()
    }

    /// Populated slots with their 1-based slot number.
    pub fn filled_days(&self) -> impl Iterator<Item = (usize, &DayCell)> {
        self.days
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|cell| (i + 1, cell)))
    }
}

/// Everything to enter for one billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSubmission {
    pub period_end: PeriodKey,
    pub line_items: Vec<LineItem>,
}

impl PeriodSubmission {
    /// Period end as typed into the form's week-ending field.
    pub fn week_ending(&self) -> String {
        self.period_end.format(DATE_FORMAT).to_string()
    }

    /// Date of each of the seven slots.
    pub fn slot_dates(&self) -> [NaiveDate; DAYS_PER_PERIOD] {
        let start = window_start(self.period_end);
        std::array::from_fn(|i| start + Days::new(i as u64))
    }

    pub fn total_hours(&self) -> f64 {
        self.line_items.iter().map(LineItem::total_hours).sum()
    }
}

/// Ordered submissions handed to the automation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillPlan {
    pub periods: Vec<PeriodSubmission>,
}

impl FillPlan {
    /// Validate `store` and project it into a plan.
    pub fn build(store: &AggregationStore) -> Result<Self, PeriodError> {
        store.validate()?;
        let periods = store
            .periods()
            .map(|(&period_end, lines)| PeriodSubmission {
                period_end,
                line_items: lines
                    .iter()
                    .map(|(key, cells)| line_item(period_end, key, cells))
                    .collect(),
            })
            .collect();
        Ok(Self { periods })
    }

    pub fn line_count(&self) -> usize {
        self.periods.iter().map(|p| p.line_items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// First day covered by the period ending on `period_end`.
fn window_start(period_end: PeriodKey) -> NaiveDate {
    period_end - Days::new(MAX_ADVANCES.into())
}

fn line_item(period_end: PeriodKey, key: &AggregationKey, cells: &LineCells) -> LineItem {
    let start = window_start(period_end);
    let mut days: [Option<DayCell>; DAYS_PER_PERIOD] = Default::default();
    for (&date, cell) in cells {
        // Offsets were checked by `validate`.
        let slot = (date - start).num_days() as usize;
        days[slot] = Some(DayCell {
            date,
            hours: cell.hours,
            comment: cell.comment.replace(QUOTE, ""),
        });
    }
    LineItem {
        job: key.job.clone(),
        activity: key.activity.clone(),
        days,
    }
}
