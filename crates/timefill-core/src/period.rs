//! Billing-period resolution.
//!
//! A billing period ends on its *period key*. Under the weekly rule that is
//! the next Sunday on or after the entry date. Under the weekly-or-month-end
//! rule a period also closes on the last day of a month, so a week that
//! straddles two months is submitted as two periods.
//!
//! Resolution walks forward one day at a time and is bounded: a boundary is
//! always found within 6 advances, and a search that exhausts 7 candidates
//! is reported as an error instead of looping.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

/// End date of a billing period.
pub type PeriodKey = NaiveDate;

/// Weekday that closes every billing week.
pub const END_OF_WEEK: Weekday = Weekday::Sun;

/// Largest allowed distance, in days, between an entry and its period end.
pub const MAX_ADVANCES: u32 = 6;

/// Rule deciding which dates close a billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryRule {
    /// Periods end on Sunday.
    #[default]
    Weekly,
    /// Periods end on Sunday or on the last day of the month, whichever is first.
    WeeklyOrMonthEnd,
}

impl BoundaryRule {
    /// Whether `date` closes a billing period under this rule.
    pub fn is_boundary(self, date: NaiveDate) -> bool {
        let end_of_week = date.weekday() == END_OF_WEEK;
        match self {
            Self::Weekly => end_of_week,
            Self::WeeklyOrMonthEnd => end_of_week || is_last_day_of_month(date),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::WeeklyOrMonthEnd => "weekly-or-month-end",
        }
    }
}

impl fmt::Display for BoundaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "weekly-or-month-end" | "month-end" => Ok(Self::WeeklyOrMonthEnd),
            other => Err(format!(
                "unknown boundary rule {other:?} (expected weekly or weekly-or-month-end)"
            )),
        }
    }
}

/// Whether `date` is the last calendar day of its month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt()
        .is_none_or(|next| next.month() != date.month())
}

/// Resolve the period key for `date` under `rule`.
pub fn resolve_period(date: NaiveDate, rule: BoundaryRule) -> Result<PeriodKey, PeriodError> {
    resolve_with(date, |day| rule.is_boundary(day)).ok_or(PeriodError::Unresolved {
        date,
        rule,
        advances: MAX_ADVANCES + 1,
    })
}

/// Number of days between `date` and the end of its period.
pub fn days_until_boundary(date: NaiveDate, rule: BoundaryRule) -> Result<u32, PeriodError> {
    let period = resolve_period(date, rule)?;
    Ok((period - date).num_days() as u32)
}

/// Bounded forward search: tests `date` and the next `MAX_ADVANCES` days.
fn resolve_with(date: NaiveDate, is_boundary: impl Fn(NaiveDate) -> bool) -> Option<NaiveDate> {
    (0..=MAX_ADVANCES)
        .map_while(|advance| date.checked_add_days(Days::new(advance.into())))
        .find(|&day| is_boundary(day))
}
