//! Migration capacity planning.
//!
//! Given a total capacity, a target remaining capacity, and a migration
//! window, this crate solves for the monthly migration rate and projects
//! remaining, migrated, and organically added capacity month by month.
//!
//! The rate comes from a goal seek on the formula `"<capacity> - <months>*x"`
//! (see [`goal_seek`]). Any whitelisted formula can be solved the same way.

mod error;
pub mod goal_seek;
mod inputs;
mod month;
mod plan;
mod projection;

pub use error::{PlanError, ValidationError};
pub use goal_seek::GoalSeekError;
pub use inputs::PlanInputs;
pub use month::{Month, MonthSequence};
pub use plan::{Plan, plan};
pub use projection::{ProjectionRow, project};

pub use migcap_solvers::equation::secant::Config as SolverConfig;
