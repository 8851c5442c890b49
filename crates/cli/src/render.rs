use std::fmt;

use serde::Serialize;

use migcap_expr::Formula;
use migcap_plan::Plan;

/// Plain-text rendering of a [`Plan`].
pub struct PlanTable<'a>(pub &'a Plan);

impl fmt::Display for PlanTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;

        writeln!(f, "Formula: {}", plan.formula)?;
        writeln!(f, "Required monthly migration rate: {:.2} TB/month", plan.rate)?;
        writeln!(f, "Months to finish: {}", plan.months_to_finish)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:>12} {:>12} {:>12} {:>12}  {}",
            "Month", "Remaining", "Migrated", "Added", "Total", "Window"
        )?;

        for row in &plan.rows {
            let marker = if plan.in_window(row) { "*" } else { "" };
            writeln!(
                f,
                "{:<10} {:>12.2} {:>12.2} {:>12.2} {:>12.2}  {marker}",
                row.month.label(),
                row.remaining,
                row.migrated,
                row.added,
                row.total,
            )?;
        }
        Ok(())
    }
}

/// The result of a `seek` command.
#[derive(Debug, Serialize)]
pub struct SeekReport {
    pub formula: String,
    pub target: f64,
    pub x: f64,
}

impl SeekReport {
    pub fn new(formula: &Formula, target: f64, x: f64) -> Self {
        Self {
            formula: formula.to_string(),
            target,
            x,
        }
    }
}

impl fmt::Display for SeekReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Formula: {}", self.formula)?;
        writeln!(f, "Target: {}", self.target)?;
        writeln!(f, "x = {}", self.x)
    }
}

/// Pretty-printed JSON followed by a newline.
pub fn json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value).map(|mut text| {
        text.push('\n');
        text
    })
}
