//! In-process driver that records the form interactions instead of performing them.
//!
//! The transcript is the exact sequence a browser-backed driver would carry
//! out: the pages it visits, the controls it types into and the forms it
//! submits. Blank day slots produce no actions.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use timefill_core::{LineItem, PeriodSubmission};
use tracing::debug;

use crate::config::DriverConfig;
use crate::driver::{
    ACTIVITY_CODE_FIELD, ADD_TIMESHEET_PAGE, FillDriver, JOB_CODE_FIELD, LOGIN_PAGE,
    WEEK_ENDING_FIELD, notes_field, qty_field,
};
use crate::error::DriverError;

/// One recorded interaction with the destination application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DriverAction {
    Navigate { url: String },
    Fill { field: String, value: String },
    AddLine,
    SaveLine,
    SaveTimesheet { week_ending: String },
    Submit { week_ending: String },
}

impl fmt::Display for DriverAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate { url } => write!(f, "navigate  {url}"),
            Self::Fill { field, value } => write!(f, "fill      {field:<16} {value}"),
            Self::AddLine => f.write_str("click     add line"),
            Self::SaveLine => f.write_str("click     save line"),
            Self::SaveTimesheet { week_ending } => write!(f, "save      timesheet {week_ending}"),
            Self::Submit { week_ending } => write!(f, "submit    timesheet {week_ending}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct DryRunDriver {
    actions: Vec<DriverAction>,
    base_url: Option<String>,
    open_period: Option<String>,
    already_submitted: HashSet<String>,
}

impl DryRunDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat these week-ending dates (`DD/MM/YY`) as already submitted.
    pub fn with_already_submitted<I, S>(mut self, weeks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.already_submitted.extend(weeks.into_iter().map(Into::into));
        self
    }

    pub fn actions(&self) -> &[DriverAction] {
        &self.actions
    }

    fn push(&mut self, action: DriverAction) {
        debug!(%action, "dry run");
        self.actions.push(action);
    }

    fn fill(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.push(DriverAction::Fill {
            field: field.into(),
            value: value.into(),
        });
    }

    fn require_login(&self) -> Result<&str, DriverError> {
        self.base_url.as_deref().ok_or(DriverError::NotLoggedIn)
    }

    fn require_open(&self, period: &PeriodSubmission) -> Result<(), DriverError> {
        let week_ending = period.week_ending();
        if self.open_period.as_deref() == Some(week_ending.as_str()) {
            Ok(())
        } else {
            Err(DriverError::NoOpenPeriod { week_ending })
        }
    }
}

impl FillDriver for DryRunDriver {
    fn login(&mut self, config: &DriverConfig) -> Result<(), DriverError> {
        self.push(DriverAction::Navigate {
            url: config.page_url(LOGIN_PAGE),
        });
        self.fill("CoyOrg", config.username.clone());
        self.fill("Password", "********");
        self.base_url = Some(config.base_url().to_string());
        Ok(())
    }

    fn open_period(&mut self, period: &PeriodSubmission) -> Result<(), DriverError> {
        let base_url = self.require_login()?.to_string();
        let week_ending = period.week_ending();

        self.push(DriverAction::Navigate {
            url: format!("{base_url}/{ADD_TIMESHEET_PAGE}"),
        });
        self.fill(WEEK_ENDING_FIELD, week_ending.clone());
        if self.already_submitted.contains(&week_ending) {
            return Err(DriverError::AlreadySubmitted { week_ending });
        }
        self.push(DriverAction::SaveTimesheet {
            week_ending: week_ending.clone(),
        });
        self.open_period = Some(week_ending);
        Ok(())
    }

    fn add_line(&mut self, period: &PeriodSubmission, line: &LineItem) -> Result<(), DriverError> {
        self.require_login()?;
        self.require_open(period)?;

        self.push(DriverAction::AddLine);
        self.fill(JOB_CODE_FIELD, line.job.clone());
        self.fill(ACTIVITY_CODE_FIELD, line.activity.clone());
        for (slot, cell) in line.filled_days() {
            self.fill(qty_field(slot), cell.hours_text());
            self.fill(notes_field(slot), cell.comment.clone());
        }
        self.push(DriverAction::SaveLine);
        Ok(())
    }

    fn submit_period(&mut self, period: &PeriodSubmission) -> Result<(), DriverError> {
        self.require_login()?;
        self.require_open(period)?;

        self.push(DriverAction::Submit {
            week_ending: period.week_ending(),
        });
        self.open_period = None;
        Ok(())
    }
}
