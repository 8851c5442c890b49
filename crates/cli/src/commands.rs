use anyhow::{Context, Result};
use tracing::info;

use migcap_expr::Formula;
use migcap_plan::{PlanInputs, goal_seek, plan};

use crate::{
    args::{Command, OutputFormat, PlanArgs, SeekArgs},
    config::FileConfig,
    render::{self, PlanTable, SeekReport},
};

/// Runs a command and returns its rendered output.
pub fn run(command: &Command) -> Result<String> {
    match command {
        Command::Plan(args) => run_plan(args),
        Command::Seek(args) => run_seek(args),
    }
}

/// Flags override the config file, which overrides the defaults.
fn run_plan(args: &PlanArgs) -> Result<String> {
    let file = FileConfig::load_optional(args.config.as_deref())?;
    let inputs = args.apply(file.apply(PlanInputs::default()));
    let config = file.solver.to_config()?;
    info!(?inputs, "planning migration");

    let plan = plan(&inputs, &config).context("could not build a migration plan")?;

    Ok(match args.format {
        OutputFormat::Table => PlanTable(&plan).to_string(),
        OutputFormat::Json => render::json(&plan)?,
    })
}

fn run_seek(args: &SeekArgs) -> Result<String> {
    let file = FileConfig::load_optional(args.config.as_deref())?;
    let config = file.solver.to_config()?;

    let formula = Formula::parse(&args.formula)
        .with_context(|| format!("invalid formula {:?}", args.formula))?;

    let x = if args.iterative {
        goal_seek::solve_iteratively(&formula, args.target, &config)
    } else {
        goal_seek::solve_formula(&formula, args.target, &config)
    }
    .with_context(|| format!("could not solve {formula} = {}", args.target))?;

    let report = SeekReport::new(&formula, args.target, x);
    Ok(match args.format {
        OutputFormat::Table => report.to_string(),
        OutputFormat::Json => render::json(&report)?,
    })
}
