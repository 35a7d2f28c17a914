//! The fill sequence every driver follows.

use timefill_core::{FillPlan, LineItem, PeriodSubmission};
use tracing::{info, warn};

use crate::config::DriverConfig;
use crate::confirm::Confirm;
use crate::error::DriverError;

/// Page holding the login form.
pub const LOGIN_PAGE: &str = "Login.asp";
/// Page that creates a new timesheet for a week-ending date.
pub const ADD_TIMESHEET_PAGE: &str = "AddMyTimeSheet.asp";
/// Form control receiving the week-ending date.
pub const WEEK_ENDING_FIELD: &str = "WeekendDate";
pub const JOB_CODE_FIELD: &str = "JCJobCode";
pub const ACTIVITY_CODE_FIELD: &str = "JCActivityCode";

/// Hours control for a 1-based day slot.
pub fn qty_field(slot: usize) -> String {
    format!("Qty{slot}")
}

/// Notes control for a 1-based day slot.
pub fn notes_field(slot: usize) -> String {
    format!("Notes{slot}")
}

/// Operations a form-filling backend performs on the destination application.
pub trait FillDriver {
    fn login(&mut self, config: &DriverConfig) -> Result<(), DriverError>;

    /// Create the timesheet for one period and leave it open for line items.
    fn open_period(&mut self, period: &PeriodSubmission) -> Result<(), DriverError>;

    fn add_line(&mut self, period: &PeriodSubmission, line: &LineItem) -> Result<(), DriverError>;

    fn submit_period(&mut self, period: &PeriodSubmission) -> Result<(), DriverError>;
}

/// Counts from a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub periods_submitted: usize,
    pub lines_filled: usize,
}

/// Enter every period of `plan` through `driver`.
///
/// With interactive confirmations enabled the operator is asked once before
/// logging in and once before each submission. A refusal stops the run with
/// [`DriverError::Aborted`]; periods already submitted stay submitted.
pub fn run_plan<D, C>(
    driver: &mut D,
    plan: &FillPlan,
    config: &DriverConfig,
    confirm: &mut C,
) -> Result<RunSummary, DriverError>
where
    D: FillDriver + ?Sized,
    C: Confirm + ?Sized,
{
    config.validate()?;
    checkpoint(config, confirm, "Fill in timesheets?", "login")?;

    info!(base_url = config.base_url(), user = %config.username, "logging in");
    driver.login(config)?;

    let mut summary = RunSummary::default();
    for period in &plan.periods {
        let week_ending = period.week_ending();
        info!(%week_ending, lines = period.line_items.len(), "filling timesheet");
        driver.open_period(period)?;
        for line in &period.line_items {
            driver.add_line(period, line)?;
            summary.lines_filled += 1;
        }

        checkpoint(
            config,
            confirm,
            &format!("Submit timesheet for week ending {week_ending}?"),
            &format!("submitting week ending {week_ending}"),
        )?;
        driver.submit_period(period)?;
        summary.periods_submitted += 1;
        info!(%week_ending, "timesheet submitted");
    }

    Ok(summary)
}

fn checkpoint<C: Confirm + ?Sized>(
    config: &DriverConfig,
    confirm: &mut C,
    prompt: &str,
    stage: &str,
) -> Result<(), DriverError> {
    if !config.interactive_confirmations || confirm.confirm(prompt) {
        return Ok(());
    }
    warn!(stage, "operator declined, stopping");
    Err(DriverError::Aborted {
        stage: stage.to_string(),
    })
}
