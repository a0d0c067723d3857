use crate::commands::{run_calculate, run_project, CalculateArgs, ProjectArgs};
use clap::{Parser, Subcommand};
use haitaton_tormays::config::AppConfig;
use haitaton_tormays::error::AppError;
use haitaton_tormays::telemetry;
use haitaton_tormays::tormaystarkastelu::DurationPolicy;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "tormays",
    about = "Calculate traffic nuisance indices for excavation work areas",
    version
)]
struct Cli {
    /// Override the configured duration policy (report_only or weighted)
    #[arg(long, global = true, value_parser = crate::infra::parse_duration_policy)]
    duration_policy: Option<DurationPolicy>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the indices of a single work area
    Calculate(CalculateArgs),
    /// Calculate every work area of a project and aggregate the project indices
    Project(ProjectArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(policy) = cli.duration_policy {
        config.calculation.duration_policy = policy;
    }

    telemetry::init(&config.telemetry)?;
    debug!(
        environment = ?config.environment,
        duration_policy = config.calculation.duration_policy.label(),
        "configuration loaded"
    );

    match cli.command {
        Command::Calculate(args) => run_calculate(args, &config.calculation),
        Command::Project(args) => run_project(args, &config.calculation),
    }
}
