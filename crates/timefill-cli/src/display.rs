//! Console rendering for operator review: trace, daily totals, plan cards
//! and the rehearsal transcript.

use std::fmt;

use timefill_core::{DailyTotals, FillPlan, Record, format_hours};
use timefill_driver::{DriverAction, RunSummary};

const HOURS_WIDTH: usize = 6;
const CODE_WIDTH: usize = 22;

// ── Public API ──

/// Echo every parsed record to stderr, one per line.
pub fn print_trace(records: &[Record]) {
    for record in records {
        eprintln!("  {record}");
    }
    eprintln!("  Read {} entries", records.len());
}

pub fn print_daily_totals(totals: &DailyTotals) {
    print!("{}", TotalsListing(totals));
}

pub fn print_plan(plan: &FillPlan) {
    print!("{}", PlanCards(plan));
}

pub fn print_transcript(actions: &[DriverAction]) {
    println!("=== Rehearsal transcript ===");
    for (i, action) in actions.iter().enumerate() {
        println!("  {:>4}  {}", i + 1, action);
    }
    println!();
}

pub fn print_summary(summary: &RunSummary) {
    println!(
        "Rehearsed {} timesheet(s) with {} line(s).",
        summary.periods_submitted, summary.lines_filled
    );
}

// ── Rendering ──

/// Hours per day, ascending, with a closing total.
pub struct TotalsListing<'a>(pub &'a DailyTotals);

impl fmt::Display for TotalsListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = self.0;
        writeln!(f, "=== Daily totals ===")?;
        if totals.is_empty() {
            writeln!(f, "  (no entries)")?;
        }
        for (date, hours) in totals.iter() {
            writeln!(
                f,
                "  {:<16} {:>w$}",
                date.format("%a %d/%m/%y").to_string(),
                format_hours(hours),
                w = HOURS_WIDTH
            )?;
        }
        writeln!(
            f,
            "  {:<16} {:>w$}",
            "total",
            format_hours(totals.total()),
            w = HOURS_WIDTH
        )?;
        writeln!(f)
    }
}

/// One card per period: a header row of slot dates, then one row per line item.
pub struct PlanCards<'a>(pub &'a FillPlan);

impl fmt::Display for PlanCards<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        if plan.is_empty() {
            return writeln!(f, "=== Fill plan: nothing to submit ===");
        }

        for period in &plan.periods {
            writeln!(f, "=== Week ending {} ===", period.week_ending())?;

            write!(f, "  {:<w$}", "job / activity", w = CODE_WIDTH)?;
            for date in period.slot_dates() {
                write!(f, " {:>w$}", date.format("%a%d").to_string(), w = HOURS_WIDTH)?;
            }
            writeln!(f, " {:>w$}", "total", w = HOURS_WIDTH)?;

            for line in &period.line_items {
                let code = format!("{} / {}", line.job, line.activity);
                write!(f, "  {:<w$}", code, w = CODE_WIDTH)?;
                for cell in &line.days {
                    let text = cell.as_ref().map_or_else(|| "-".to_string(), |c| c.hours_text());
                    write!(f, " {:>w$}", text, w = HOURS_WIDTH)?;
                }
                writeln!(f, " {:>w$}", format_hours(line.total_hours()), w = HOURS_WIDTH)?;

                for (slot, cell) in line.filled_days() {
                    if !cell.comment.is_empty() {
                        writeln!(f, "      {} {}: {}", slot, cell.date.format("%a"), cell.comment)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use timefill_core::{BoundaryRule, ingest};

    use super::*;

    #[test]
    fn plan_card_lists_slots_and_comments() {
        let ingest = ingest(
            "02/01/24,J1,A1,4\n02/01/24,J1,A1,2,\"note\"\n",
            BoundaryRule::Weekly,
        )
        .unwrap();
        let plan = FillPlan::build(&ingest.store).unwrap();
        let card = PlanCards(&plan).to_string();

        assert!(card.starts_with("=== Week ending 07/01/24 ==="));
        assert!(card.contains("Mon01"));
        assert!(card.contains("Sun07"));
        let row = card.lines().find(|l| l.contains("J1 / A1")).unwrap();
        assert_eq!(row.split_whitespace().filter(|t| *t == "-").count(), 6);
        assert!(card.contains("2 Tue: note"));
    }

    #[test]
    fn plan_card_shows_rounded_hours() {
        let ingest = ingest("02/01/24,J1,A1,0.1\n02/01/24,J1,A1,0.2\n", BoundaryRule::Weekly)
            .unwrap();
        let plan = FillPlan::build(&ingest.store).unwrap();
        let card = PlanCards(&plan).to_string();
        let row = card.lines().find(|l| l.contains("J1 / A1")).unwrap();
        assert!(row.split_whitespace().any(|t| t == "0.3"), "{row}");
        assert!(!card.contains("0.30000"));
    }

    #[test]
    fn empty_plan() {
        assert!(PlanCards(&FillPlan::default()).to_string().contains("nothing to submit"));
    }

    #[test]
    fn daily_totals_sorted_with_total() {
        let ingest = ingest(
            "09/01/24,J1,A1,3\n02/01/24,J1,A1,4\n02/01/24,J2,A2,2.5\n",
            BoundaryRule::Weekly,
        )
        .unwrap();
        let text = TotalsListing(&DailyTotals::from_store(&ingest.store)).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[1].contains("02/01/24") && lines[1].ends_with("6.5"));
        assert!(lines[2].contains("09/01/24") && lines[2].ends_with("3"));
        assert!(lines[3].contains("total") && lines[3].ends_with("9.5"));
    }
}
