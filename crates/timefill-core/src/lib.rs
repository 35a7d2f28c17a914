//! Timesheet aggregation engine.
//!
//! Raw entry lines → typed [`Entry`] values → period-tagged records →
//! [`AggregationStore`] → [`DailyTotals`] for review and a [`FillPlan`] for
//! the form-filling collaborator.

pub mod entry;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod period;
pub mod plan;
pub mod report;
pub mod store;

pub use entry::{DATE_FORMAT, Entry};
pub use error::{ParseError, PeriodError, TimesheetError};
pub use ingest::{Ingest, Record, ingest};
pub use parser::{is_comment_line, parse_line};
pub use period::{BoundaryRule, PeriodKey, resolve_period};
pub use plan::{DayCell, FillPlan, LineItem, PeriodSubmission, format_hours};
pub use report::DailyTotals;
pub use store::{AggregatedCell, AggregationKey, AggregationStore};
