use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("missing driver configuration: {0}")]
    MissingConfig(&'static str),

    #[error("run aborted by operator before {stage}")]
    Aborted { stage: String },

    #[error("not logged in")]
    NotLoggedIn,

    #[error(
        "failed to save timesheet for week ending {week_ending}; \
         a timesheet for this week has likely been submitted already"
    )]
    AlreadySubmitted { week_ending: String },

    #[error("no open timesheet for week ending {week_ending}")]
    NoOpenPeriod { week_ending: String },

    #[error("helper process error: {0}")]
    Process(#[from] std::io::Error),
}
