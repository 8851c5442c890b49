use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use migcap_plan::{Month, PlanInputs};

use crate::config::Overrides;

#[derive(Debug, Parser)]
#[command(name = "migcap", version, about = "Migration capacity planner")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve for the monthly migration rate and project capacity
    Plan(PlanArgs),

    /// Solve any whitelisted formula of x for a target value
    Seek(SeekArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// TOML file with plan inputs and an optional [solver] table
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First month of the migration (YYYY-MM)
    #[arg(long, value_name = "YYYY-MM")]
    pub start: Option<Month>,

    /// Last month of the migration window (YYYY-MM)
    #[arg(long, value_name = "YYYY-MM")]
    pub end: Option<Month>,

    /// Last month of the projection (YYYY-MM)
    #[arg(long, value_name = "YYYY-MM")]
    pub simulation_end: Option<Month>,

    /// Total capacity to migrate, in TB
    #[arg(long, value_name = "TB")]
    pub capacity: Option<f64>,

    /// Capacity that should remain at the end of the window, in TB
    #[arg(long, value_name = "TB")]
    pub target: Option<f64>,

    /// Capacity added organically each month, in TB
    #[arg(long, value_name = "TB")]
    pub added_per_month: Option<f64>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl PlanArgs {
    /// Overrides `inputs` with every flag that was given.
    pub fn apply(&self, inputs: PlanInputs) -> PlanInputs {
        self.overrides().apply(inputs)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            start: self.start,
            end: self.end,
            simulation_end: self.simulation_end,
            total_capacity: self.capacity,
            target_remaining: self.target,
            added_per_month: self.added_per_month,
        }
    }
}

#[derive(Debug, Args)]
pub struct SeekArgs {
    /// Formula in x, such as "3100 - 12*x"
    pub formula: String,

    /// Value the formula should produce
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub target: f64,

    /// Skip the closed-form solution for affine formulas
    #[arg(long)]
    pub iterative: bool,

    /// TOML file with an optional [solver] table
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
