use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use migcap_plan::{Month, PlanInputs, SolverConfig};

/// Contents of a `--config` TOML file.
///
/// Every key is optional; missing keys fall back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub start: Option<Month>,
    pub end: Option<Month>,
    pub simulation_end: Option<Month>,
    pub total_capacity: Option<f64>,
    pub target_remaining: Option<f64>,
    pub added_per_month: Option<f64>,
    pub solver: SolverTable,
}

/// The `[solver]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverTable {
    pub max_iters: Option<usize>,
    pub x_abs_tol: Option<f64>,
    pub x_rel_tol: Option<f64>,
    pub residual_tol: Option<f64>,
    pub initial_step: Option<f64>,
}

impl FileConfig {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Reads an optional config file, or returns the empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overrides `inputs` with every key present in the file.
    pub fn apply(&self, inputs: PlanInputs) -> PlanInputs {
        self.overrides().apply(inputs)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            start: self.start,
            end: self.end,
            simulation_end: self.simulation_end,
            total_capacity: self.total_capacity,
            target_remaining: self.target_remaining,
            added_per_month: self.added_per_month,
        }
    }
}

/// Optional plan inputs from one source, applied over another.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub start: Option<Month>,
    pub end: Option<Month>,
    pub simulation_end: Option<Month>,
    pub total_capacity: Option<f64>,
    pub target_remaining: Option<f64>,
    pub added_per_month: Option<f64>,
}

impl Overrides {
    /// Replaces each field of `inputs` that is set here.
    pub fn apply(&self, mut inputs: PlanInputs) -> PlanInputs {
        if let Some(start) = self.start {
            inputs.start = start;
        }
        if let Some(end) = self.end {
            inputs.end = end;
        }
        if let Some(simulation_end) = self.simulation_end {
            inputs.simulation_end = simulation_end;
        }
        if let Some(capacity) = self.total_capacity {
            inputs.total_capacity = capacity;
        }
        if let Some(target) = self.target_remaining {
            inputs.target_remaining = target;
        }
        if let Some(added) = self.added_per_month {
            inputs.added_per_month = added;
        }
        inputs
    }
}

impl SolverTable {
    /// Builds a validated solver config, using defaults for missing keys.
    pub fn to_config(&self) -> Result<SolverConfig> {
        let defaults = SolverConfig::default();
        let config = SolverConfig::new(
            self.max_iters.unwrap_or(defaults.max_iters()),
            self.x_abs_tol.unwrap_or(defaults.x_abs_tol()),
            self.x_rel_tol.unwrap_or(defaults.x_rel_tol()),
            self.residual_tol.unwrap_or(defaults.residual_tol()),
            self.initial_step.unwrap_or(defaults.initial_step()),
        )
        .context("invalid [solver] table")?;
        Ok(config)
    }
}
