//! front-desk-scheduler: builds a duty roster from a config and data directory.
//!
//! Usage:
//!   front-desk-scheduler --config ./config/front_desk --data ./data --output ./output/schedule.csv

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use front_desk_scheduler::config::ConfigLoader;
use front_desk_scheduler::error::SchedulerResult;
use front_desk_scheduler::input::InputLoader;
use front_desk_scheduler::output::ScheduleWriter;
use front_desk_scheduler::scheduling::run_scheduler;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("front_desk_scheduler=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let config_dir = flag(&args, "--config", "./config/front_desk");
    let data_dir = flag(&args, "--data", "./data");
    let output = flag(&args, "--output", "./output/schedule.csv");

    match run(&config_dir, &data_dir, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Scheduling failed");
            ExitCode::FAILURE
        }
    }
}

fn flag(args: &[String], name: &str, default: &str) -> PathBuf {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| PathBuf::from(&w[1]))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn run(config_dir: &Path, data_dir: &Path, output: &Path) -> SchedulerResult<()> {
    let config = ConfigLoader::load(config_dir)?.into_config();
    let input = InputLoader::load(data_dir, &config)?;

    let schedule = run_scheduler(&config, &input)?;
    let written = ScheduleWriter::write(&schedule, output)?;

    info!(
        run_id = %schedule.run_id,
        status = %schedule.status,
        objective = schedule.objective_value,
        assignments = schedule.assignments.len(),
        total_shortfall = schedule.total_shortfall(),
        risk_warnings = schedule.risk_warnings.len(),
        output = %written.display(),
        "Done"
    );
    Ok(())
}
