//! Consumer side of a fill plan: configuration, confirmations, the fill
//! sequence, a scoped helper process and a recording dry-run driver.

mod config;
mod confirm;
mod driver;
mod dry_run;
mod error;
mod process;

pub use config::DriverConfig;
pub use confirm::{AlwaysConfirm, Confirm, TerminalConfirm};
pub use driver::{
    ACTIVITY_CODE_FIELD, ADD_TIMESHEET_PAGE, FillDriver, JOB_CODE_FIELD, LOGIN_PAGE, RunSummary,
    WEEK_ENDING_FIELD, notes_field, qty_field, run_plan,
};
pub use dry_run::{DriverAction, DryRunDriver};
pub use error::DriverError;
pub use process::ServerProcess;
