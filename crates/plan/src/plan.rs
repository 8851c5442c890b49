use serde::Serialize;
use tracing::debug;

use migcap_expr::Formula;
use migcap_solvers::equation::secant::Config;

use crate::{Month, PlanError, PlanInputs, ProjectionRow, goal_seek, project};

/// The result of one planning calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    /// The capacity formula that was solved, such as `3100 - 12*x`.
    pub formula: String,
    /// Required migration rate per month.
    pub rate: f64,
    /// Months in the migration window.
    pub months_to_finish: u32,
    /// Last month of the migration window.
    pub migration_end: Month,
    /// One row per month from the start through the simulation end.
    pub rows: Vec<ProjectionRow>,
}

impl Plan {
    /// Returns true if `row` falls within the migration window.
    #[must_use]
    pub fn in_window(&self, row: &ProjectionRow) -> bool {
        row.month <= self.migration_end
    }

    /// Returns the rows within the migration window.
    pub fn window_rows(&self) -> impl Iterator<Item = &ProjectionRow> + '_ {
        self.rows.iter().filter(|row| self.in_window(row))
    }
}

/// Solves for the migration rate and projects capacity over the simulation window.
///
/// # Errors
///
/// Returns an error if the inputs are invalid or the rate cannot be solved.
/// No projection is produced in either case.
pub fn plan(inputs: &PlanInputs, config: &Config) -> Result<Plan, PlanError> {
    inputs.validate()?;

    let months_to_finish = inputs.months_to_finish()?;
    let formula_text = inputs.formula_text()?;
    let formula = Formula::parse(&formula_text)?;
    debug!(formula = %formula_text, months_to_finish, "solving for migration rate");

    let rate = goal_seek::solve_formula(&formula, inputs.target_remaining, config)?;

    let months = inputs.simulation_window()?;
    let rows = project(inputs.total_capacity, rate, inputs.added_per_month, &months)?;
    debug!(rate, rows = rows.len(), "projected capacity");

    Ok(Plan {
        formula: formula_text,
        rate,
        months_to_finish,
        migration_end: inputs.end,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::ValidationError;

    #[test]
    fn default_plan() {
        let plan = plan(&PlanInputs::default(), &Config::default()).unwrap();

        assert_eq!(plan.formula, "3100 - 12*x");
        assert_eq!(plan.months_to_finish, 12);
        assert_relative_eq!(plan.rate, 3100.0 / 12.0, epsilon = 1e-9);
        assert_eq!(plan.rows.len(), 57);
        assert_eq!(plan.window_rows().count(), 12);
    }

    #[test]
    fn window_ends_at_migration_end() {
        let plan = plan(&PlanInputs::default(), &Config::default()).unwrap();

        assert!(plan.in_window(&plan.rows[11]));
        assert!(!plan.in_window(&plan.rows[12]));
        assert_eq!(plan.rows[11].month, plan.migration_end);
        assert_relative_eq!(plan.rows[11].remaining, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn target_above_capacity_gives_negative_rate() {
        let inputs = PlanInputs {
            target_remaining: 3700.0,
            ..PlanInputs::default()
        };
        let plan = plan(&inputs, &Config::default()).unwrap();
        assert_relative_eq!(plan.rate, -50.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_inputs_are_reported() {
        let inputs = PlanInputs {
            total_capacity: -5.0,
            ..PlanInputs::default()
        };
        assert!(matches!(
            plan(&inputs, &Config::default()),
            Err(PlanError::Validation(ValidationError::Negative { .. }))
        ));
    }

    #[test]
    fn serializes_to_json() {
        let plan = plan(&PlanInputs::default(), &Config::default()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["formula"], "3100 - 12*x");
        assert_eq!(json["migration_end"], "2026-06");
        assert_eq!(json["rows"][0]["label"], "Jul 2025");
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(57));
    }
}
