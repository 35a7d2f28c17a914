//! Daily totals for operator review before anything is submitted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::entry::Entry;
use crate::store::AggregationStore;

/// Hours booked per calendar day, across every period and line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    days: BTreeMap<NaiveDate, f64>,
}

impl DailyTotals {
    pub fn from_store(store: &AggregationStore) -> Self {
        let mut totals = Self::default();
        for (_, _, date, cell) in store.cells() {
            totals.add(date, cell.hours);
        }
        totals
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.add(entry.date, entry.hours);
        }
        totals
    }

    fn add(&mut self, date: NaiveDate, hours: f64) {
        *self.days.entry(date).or_default() += hours;
    }

    /// Days in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.days.iter().map(|(&date, &hours)| (date, hours))
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.days.get(&date).copied()
    }

    pub fn total(&self) -> f64 {
        self.days.values().sum()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::BoundaryRule;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sums_same_date_and_sorts() {
        let entries = [
            Entry::new(d(2024, 1, 9), "J1", "A1", 3.0, None),
            Entry::new(d(2024, 1, 2), "J1", "A1", 4.0, None),
            Entry::new(d(2024, 1, 2), "J2", "A2", 2.5, Some("x")),
        ];
        let totals = DailyTotals::from_entries(&entries);
        let days: Vec<_> = totals.iter().collect();
        assert_eq!(days, vec![(d(2024, 1, 2), 6.5), (d(2024, 1, 9), 3.0)]);
        assert_eq!(totals.total(), 9.5);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn store_and_entries_agree() {
        let entries = [
            Entry::new(d(2024, 1, 31), "J1", "A1", 3.0, None),
            Entry::new(d(2024, 1, 30), "J1", "A1", 4.0, None),
            Entry::new(d(2024, 2, 1), "J2", "A2", 1.0, None),
            Entry::new(d(2024, 1, 31), "J2", "A2", 1.0, None),
        ];
        let mut store = AggregationStore::new();
        for entry in &entries {
            store.record(entry.clone(), BoundaryRule::WeeklyOrMonthEnd).unwrap();
        }
        assert_eq!(DailyTotals::from_store(&store), DailyTotals::from_entries(&entries));
        assert_eq!(DailyTotals::from_store(&store).get(d(2024, 1, 31)), Some(4.0));
    }

    #[test]
    fn empty() {
        let totals = DailyTotals::from_store(&AggregationStore::new());
        assert!(totals.is_empty());
        assert_eq!(totals.total(), 0.0);
    }
}
