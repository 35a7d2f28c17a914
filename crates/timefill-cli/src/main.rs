mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use timefill_core::{BoundaryRule, DATE_FORMAT, DailyTotals, FillPlan, Ingest, parser};
use timefill_driver::{DriverConfig, DryRunDriver, ServerProcess, TerminalConfirm, run_plan};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn a timesheet entry file into billing-period fill plans.
#[derive(Parser, Debug)]
#[command(name = "timefill", version)]
struct Cli {
    /// Timesheet entry file
    #[arg(short, long, env = "TIMEFILL_INPUT", default_value = "data.csv", global = true)]
    input: PathBuf,

    /// Billing-period boundary rule (weekly, weekly-or-month-end)
    #[arg(long, env = "TIMEFILL_RULE", default_value = "weekly", global = true)]
    rule: BoundaryRule,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Do not echo every parsed record
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the file and print daily totals, then stop
    Report,
    /// Print the fill plan
    Plan {
        /// Emit the plan as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Walk the fill plan through the recording driver and print the transcript
    Rehearse(RehearseArgs),
}

#[derive(Args, Debug)]
struct RehearseArgs {
    /// Timesheet application root URL
    #[arg(long, env = "ETIMESHEETS_URL")]
    base_url: Option<String>,

    #[arg(long, env = "ETIMESHEETS_USER")]
    username: Option<String>,

    #[arg(long, env = "ETIMESHEETS_PW", hide_env_values = true)]
    password: Option<String>,

    /// Skip the confirmation prompts
    #[arg(short, long)]
    yes: bool,

    /// Week-ending date (DD/MM/YY) to treat as already submitted
    #[arg(long, value_name = "DD/MM/YY")]
    already_submitted: Vec<String>,

    /// Helper process to keep running for the duration of the rehearsal
    #[arg(long, env = "TIMEFILL_SERVER_CMD")]
    server_cmd: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    info!("timefill v{}", env!("CARGO_PKG_VERSION"));

    let ingest = load(&cli.input, cli.rule)?;
    if !cli.quiet {
        display::print_trace(&ingest.records);
    }

    match cli.command {
        Command::Report => {
            display::print_daily_totals(&DailyTotals::from_store(&ingest.store));
        }
        Command::Plan { json } => {
            let plan = build_plan(&ingest)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                display::print_daily_totals(&DailyTotals::from_store(&ingest.store));
                display::print_plan(&plan);
            }
        }
        Command::Rehearse(args) => {
            let plan = build_plan(&ingest)?;
            display::print_daily_totals(&DailyTotals::from_store(&ingest.store));
            display::print_plan(&plan);
            rehearse(&plan, args)?;
        }
    }
    Ok(())
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Read and ingest the entry file. Any bad line fails the whole run.
fn load(path: &Path, rule: BoundaryRule) -> anyhow::Result<Ingest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading timesheet entries from {}", path.display()))?;
    timefill_core::ingest(&text, rule)
        .with_context(|| format!("parsing {}", path.display()))
}

fn build_plan(ingest: &Ingest) -> anyhow::Result<FillPlan> {
    let plan = FillPlan::build(&ingest.store).context("validating billing periods")?;
    info!(
        periods = plan.periods.len(),
        lines = plan.line_count(),
        "fill plan built"
    );
    Ok(plan)
}

fn rehearse(plan: &FillPlan, args: RehearseArgs) -> anyhow::Result<()> {
    let config = DriverConfig::new(
        args.base_url.unwrap_or_default(),
        args.username.unwrap_or_default(),
        args.password.unwrap_or_default(),
        !args.yes,
    );
    config.validate()?;
    let weeks = normalize_weeks(&args.already_submitted)?;

    let server = args
        .server_cmd
        .as_deref()
        .map(ServerProcess::spawn)
        .transpose()
        .context("starting helper process")?;

    let mut driver = DryRunDriver::new().with_already_submitted(weeks);
    let result = run_plan(&mut driver, plan, &config, &mut TerminalConfirm);

    display::print_transcript(driver.actions());
    if let Some(server) = server {
        server.shutdown().context("stopping helper process")?;
    }
    let summary = result.context("rehearsal stopped")?;
    display::print_summary(&summary);
    Ok(())
}

/// Re-format week-ending dates so `1/2/24` matches the plan's `01/02/24`.
fn normalize_weeks(weeks: &[String]) -> anyhow::Result<Vec<String>> {
    weeks
        .iter()
        .map(|week| {
            let date = parser::parse_date(week)
                .with_context(|| format!("invalid --already-submitted date {week:?}"))?;
            Ok(date.format(DATE_FORMAT).to_string())
        })
        .collect()
}
