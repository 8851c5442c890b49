use serde::{Deserialize, Serialize};

use crate::{Month, MonthSequence, ValidationError};

/// Inputs for one migration plan.
///
/// Capacities are in any consistent unit (TB in the CLI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanInputs {
    /// First month of the migration.
    pub start: Month,
    /// Last month of the migration window.
    pub end: Month,
    /// Last month of the projection.
    pub simulation_end: Month,
    pub total_capacity: f64,
    /// Capacity that should remain at the end of the migration window.
    pub target_remaining: f64,
    pub added_per_month: f64,
}

impl Default for PlanInputs {
    fn default() -> Self {
        Self {
            start: Month::known(2025, 7),
            end: Month::known(2026, 6),
            simulation_end: Month::known(2030, 3),
            total_capacity: 3100.0,
            target_remaining: 0.0,
            added_per_month: 60.0,
        }
    }
}

impl PlanInputs {
    /// Checks month ordering and that every capacity is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_order("start", self.start, "end", self.end)?;
        ValidationError::check_order("end", self.end, "simulation end", self.simulation_end)?;
        ValidationError::check_non_negative("total capacity", self.total_capacity)?;
        ValidationError::check_non_negative("target remaining capacity", self.target_remaining)?;
        ValidationError::check_non_negative("added capacity per month", self.added_per_month)?;
        Ok(())
    }

    /// Returns the number of months in the migration window, counting both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn months_to_finish(&self) -> Result<u32, ValidationError> {
        ValidationError::check_order("start", self.start, "end", self.end)?;
        let elapsed = self.start.months_until(self.end)?;
        Ok(elapsed.unsigned_abs() + 1)
    }

    /// Returns the capacity formula `"<total> - <months>*x"`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn formula_text(&self) -> Result<String, ValidationError> {
        let months = self.months_to_finish()?;
        Ok(format!("{} - {months}*x", self.total_capacity))
    }

    /// Returns the months from `start` through `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn migration_window(&self) -> Result<MonthSequence, ValidationError> {
        MonthSequence::new(self.start, self.end)
    }

    /// Returns the months from `start` through `simulation_end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `simulation_end`.
    pub fn simulation_window(&self) -> Result<MonthSequence, ValidationError> {
        MonthSequence::new(self.start, self.simulation_end)
    }
}
