//! Aggregation store: period → (job, activity) → day → cell.
//!
//! Periods and line keys keep the order they were first seen in the input so
//! the fill plan and any review output follow the operator's file. Days are
//! kept in calendar order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entry::Entry;
use crate::error::PeriodError;
use crate::period::{BoundaryRule, MAX_ADVANCES, PeriodKey, resolve_period};

/// Separator placed between comments merged into one cell.
pub const COMMENT_SEPARATOR: &str = ", ";

/// Exact (job, activity) pair identifying a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AggregationKey {
    pub job: String,
    pub activity: String,
}

impl AggregationKey {
    pub fn new(job: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            activity: activity.into(),
        }
    }
}

/// Hours and comments accumulated for one line item on one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCell {
    pub hours: f64,
    pub comment: String,
}

impl AggregatedCell {
    /// Fold another booking into this cell.
    ///
    /// Hours add up. A non-empty comment is appended, separated from any
    /// existing text by [`COMMENT_SEPARATOR`].
    pub fn merge(&mut self, hours: f64, comment: Option<&str>) {
        self.hours += hours;
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            if !self.comment.is_empty() {
                self.comment.push_str(COMMENT_SEPARATOR);
            }
            self.comment.push_str(comment);
        }
    }
}

/// Cells of one line item, by day.
pub type LineCells = BTreeMap<NaiveDate, AggregatedCell>;

/// Line items of one period, in first-seen order.
pub type PeriodLines = IndexMap<AggregationKey, LineCells>;

/// All booked time for a run, grouped by period, line item and day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationStore {
    periods: IndexMap<PeriodKey, PeriodLines>,
    entries: usize,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the entry's period and merge it into its cell.
    ///
    /// Cells, line items and periods are created on first use. A period that
    /// cannot be resolved is returned as an error and nothing is recorded.
    pub fn record(&mut self, entry: Entry, rule: BoundaryRule) -> Result<PeriodKey, PeriodError> {
        let period = resolve_period(entry.date, rule)?;
        let Entry {
            date,
            job,
            activity,
            hours,
            comment,
        } = entry;

        debug!(%period, %date, %job, %activity, hours, "recording entry");
        self.periods
            .entry(period)
            .or_default()
            .entry(AggregationKey { job, activity })
            .or_default()
            .entry(date)
            .or_default()
            .merge(hours, comment.as_deref());
        self.entries += 1;
        Ok(period)
    }

    /// Check every stored day lies within the 7-day window of its period.
    pub fn validate(&self) -> Result<(), PeriodError> {
        for (&period, lines) in &self.periods {
            for cells in lines.values() {
                for &date in cells.keys() {
                    let days = (period - date).num_days();
                    if !(0..=i64::from(MAX_ADVANCES)).contains(&days) {
                        return Err(PeriodError::Gap { period, date, days });
                    }
                }
            }
        }
        Ok(())
    }

    /// Periods in first-seen order.
    pub fn periods(&self) -> impl Iterator<Item = (&PeriodKey, &PeriodLines)> {
        self.periods.iter()
    }

    pub fn period(&self, period: PeriodKey) -> Option<&PeriodLines> {
        self.periods.get(&period)
    }

    pub fn get(&self, period: PeriodKey, key: &AggregationKey, date: NaiveDate) -> Option<&AggregatedCell> {
        self.periods.get(&period)?.get(key)?.get(&date)
    }

    /// Every populated cell, in period then line then day order.
    pub fn cells(&self) -> impl Iterator<Item = (PeriodKey, &AggregationKey, NaiveDate, &AggregatedCell)> {
        self.periods.iter().flat_map(|(&period, lines)| {
            lines.iter().flat_map(move |(key, cells)| {
                cells.iter().map(move |(&date, cell)| (period, key, date, cell))
            })
        })
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Number of entries recorded so far, before merging.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Insert a cell without period resolution. Test-only, for validation paths.
    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, period: PeriodKey, key: AggregationKey, date: NaiveDate, cell: AggregatedCell) {
        self.periods
            .entry(period)
            .or_default()
            .entry(key)
            .or_default()
            .insert(date, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(job: &str, activity: &str) -> AggregationKey {
        AggregationKey::new(job, activity)
    }

    #[test]
    fn merge_sums_hours_and_joins_comments() {
        let mut cell = AggregatedCell::default();
        cell.merge(4.0, None);
        assert_eq!(cell.comment, "");
        cell.merge(2.0, Some("note"));
        assert_eq!(cell.comment, "note");
        cell.merge(1.5, Some("review"));
        cell.merge(0.5, None);
        cell.merge(0.5, Some(""));
        assert_eq!(cell.hours, 8.5);
        assert_eq!(cell.comment, "note, review");
    }

    #[test]
    fn record_merges_same_bucket() {
        let mut store = AggregationStore::new();
        let tuesday = d(2024, 1, 2);
        store
            .record(Entry::new(tuesday, "J1", "A1", 4.0, None), BoundaryRule::Weekly)
            .unwrap();
        let period = store
            .record(Entry::new(tuesday, "J1", "A1", 2.0, Some("note")), BoundaryRule::Weekly)
            .unwrap();

        assert_eq!(period, d(2024, 1, 7));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entry_count(), 2);
        let cell = store.get(period, &key("J1", "A1"), tuesday).unwrap();
        assert_eq!(cell.hours, 6.0);
        assert_eq!(cell.comment, "note");
    }

    #[test]
    fn keys_are_exact_matches() {
        let mut store = AggregationStore::new();
        let date = d(2024, 1, 2);
        store.record(Entry::new(date, "J1", "A1", 1.0, None), BoundaryRule::Weekly).unwrap();
        store.record(Entry::new(date, "j1", "A1", 1.0, None), BoundaryRule::Weekly).unwrap();
        store.record(Entry::new(date, "J1", "A1.", 1.0, None), BoundaryRule::Weekly).unwrap();
        assert_eq!(store.period(d(2024, 1, 7)).unwrap().len(), 3);
    }

    #[test]
    fn periods_and_lines_keep_first_seen_order() {
        let mut store = AggregationStore::new();
        let rule = BoundaryRule::Weekly;
        store.record(Entry::new(d(2024, 1, 10), "Z9", "A1", 1.0, None), rule).unwrap();
        store.record(Entry::new(d(2024, 1, 2), "B2", "A1", 1.0, None), rule).unwrap();
        store.record(Entry::new(d(2024, 1, 3), "A1", "A1", 1.0, None), rule).unwrap();
        store.record(Entry::new(d(2024, 1, 11), "A1", "A1", 1.0, None), rule).unwrap();

        let order: Vec<_> = store.periods().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![d(2024, 1, 14), d(2024, 1, 7)]);

        let lines: Vec<_> = store
            .period(d(2024, 1, 14))
            .unwrap()
            .keys()
            .map(|k| k.job.as_str())
            .collect();
        assert_eq!(lines, vec!["Z9", "A1"]);
    }

    #[test]
    fn days_are_in_calendar_order() {
        let mut store = AggregationStore::new();
        let rule = BoundaryRule::Weekly;
        store.record(Entry::new(d(2024, 1, 5), "J1", "A1", 1.0, None), rule).unwrap();
        store.record(Entry::new(d(2024, 1, 1), "J1", "A1", 1.0, None), rule).unwrap();
        let days: Vec<_> = store.cells().map(|(_, _, date, _)| date).collect();
        assert_eq!(days, vec![d(2024, 1, 1), d(2024, 1, 5)]);
    }

    #[test]
    fn month_end_rule_splits_a_week() {
        let mut store = AggregationStore::new();
        let rule = BoundaryRule::WeeklyOrMonthEnd;
        store.record(Entry::new(d(2024, 1, 30), "J1", "A1", 1.0, None), rule).unwrap();
        store.record(Entry::new(d(2024, 2, 1), "J1", "A1", 1.0, None), rule).unwrap();
        let order: Vec<_> = store.periods().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![d(2024, 1, 31), d(2024, 2, 4)]);
        assert!(store.validate().is_ok());
    }

    #[test]
    fn validate_rejects_days_outside_window() {
        let mut store = AggregationStore::new();
        store.insert_raw(d(2024, 1, 14), key("J1", "A1"), d(2024, 1, 7), AggregatedCell::default());
        assert_eq!(
            store.validate(),
            Err(PeriodError::Gap {
                period: d(2024, 1, 14),
                date: d(2024, 1, 7),
                days: 7
            })
        );

        let mut store = AggregationStore::new();
        store.insert_raw(d(2024, 1, 14), key("J1", "A1"), d(2024, 1, 15), AggregatedCell::default());
        assert!(matches!(store.validate(), Err(PeriodError::Gap { days: -1, .. })));
    }

    #[test]
    fn empty_store() {
        let store = AggregationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.cells().count(), 0);
        assert!(store.validate().is_ok());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn booking() -> impl Strategy<Value = (i32, Option<String>)> {
            (
                prop_oneof![-16i32..0, 1i32..=16],
                proptest::option::of("[a-z]{1,6}"),
            )
        }

        fn record_all(bookings: &[(i32, Option<String>)]) -> AggregationStore {
            let mut store = AggregationStore::new();
            for (quarters, comment) in bookings {
                let entry = Entry::new(
                    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                    "J1",
                    "A1",
                    f64::from(*quarters) * 0.25,
                    comment.as_deref(),
                );
                store.record(entry, BoundaryRule::Weekly).unwrap();
            }
            store
        }

        fn only_cell(store: &AggregationStore) -> AggregatedCell {
            let cells: Vec<_> = store.cells().collect();
            assert_eq!(cells.len(), 1);
            cells[0].3.clone()
        }

        proptest! {
            #[test]
            fn hours_independent_of_order(
                bookings in proptest::collection::vec(booking(), 1..12),
                seed in any::<usize>(),
            ) {
                let forward = only_cell(&record_all(&bookings));

                let mut rotated = bookings.clone();
                let mid = seed % rotated.len();
                rotated.rotate_left(mid);
                rotated.reverse();
                let shuffled = only_cell(&record_all(&rotated));

                // Quarter hours sum exactly in binary floating point.
                prop_assert_eq!(forward.hours, shuffled.hours);
            }

            #[test]
            fn comments_follow_arrival_order(bookings in proptest::collection::vec(booking(), 1..12)) {
                let cell = only_cell(&record_all(&bookings));
                let expected: Vec<&str> = bookings
                    .iter()
                    .filter_map(|(_, c)| c.as_deref())
                    .collect();
                prop_assert_eq!(cell.comment, expected.join(COMMENT_SEPARATOR));
            }

            #[test]
            fn merging_in_stages_matches_merging_at_once(
                left in proptest::collection::vec(booking(), 1..6),
                right in proptest::collection::vec(booking(), 1..6),
            ) {
                let mut staged = AggregatedCell::default();
                for (quarters, comment) in &left {
                    staged.merge(f64::from(*quarters) * 0.25, comment.as_deref());
                }
                let mut tail = AggregatedCell::default();
                for (quarters, comment) in &right {
                    tail.merge(f64::from(*quarters) * 0.25, comment.as_deref());
                }
                staged.merge(tail.hours, Some(tail.comment.as_str()));

                let all: Vec<_> = left.iter().chain(&right).cloned().collect();
                let direct = only_cell(&record_all(&all));
                prop_assert_eq!(staged.hours, direct.hours);
                prop_assert_eq!(staged.comment, direct.comment);
            }
        }
    }
}
