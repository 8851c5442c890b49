use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{Month, MonthSequence, ValidationError};

/// One month of the capacity projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionRow {
    pub month: Month,
    /// Capacity still to migrate at the end of the month, floored at zero.
    pub remaining: f64,
    /// Capacity migrated so far.
    pub migrated: f64,
    /// Capacity added organically so far.
    pub added: f64,
    /// `migrated + added`.
    pub total: f64,
}

impl Serialize for ProjectionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("ProjectionRow", 6)?;
        row.serialize_field("month", &self.month)?;
        row.serialize_field("label", &self.month.label())?;
        row.serialize_field("remaining", &self.remaining)?;
        row.serialize_field("migrated", &self.migrated)?;
        row.serialize_field("added", &self.added)?;
        row.serialize_field("total", &self.total)?;
        row.end()
    }
}

/// Projects capacity month by month at a constant migration rate.
///
/// Row `i` (counting from 1) describes the end of the `i`-th month:
///
/// ```text
/// remaining = max(total - rate * i, 0)
/// migrated  = total - remaining
/// added     = added_per_month * i
/// total     = migrated + added
/// ```
///
/// There is one row per month, in order.
///
/// # Errors
///
/// Returns an error if `total` or `added_per_month` is negative or not
/// finite, or if `rate` is not finite.
pub fn project(
    total: f64,
    rate: f64,
    added_per_month: f64,
    months: &MonthSequence,
) -> Result<Vec<ProjectionRow>, ValidationError> {
    ValidationError::check_non_negative("total capacity", total)?;
    ValidationError::check_non_negative("added capacity per month", added_per_month)?;
    if !rate.is_finite() {
        return Err(ValidationError::NonFiniteRate { value: rate });
    }

    let rows = months
        .iter()
        .zip(1_u32..)
        .map(|(month, index)| {
            let elapsed = f64::from(index);
            let remaining = (total - rate * elapsed).max(0.0);
            let migrated = total - remaining;
            let added = added_per_month * elapsed;
            ProjectionRow {
                month,
                remaining,
                migrated,
                added,
                total: migrated + added,
            }
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn months(start: &str, end: &str) -> MonthSequence {
        MonthSequence::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    #[test]
    fn rows_follow_the_months() {
        let months = months("2025-11", "2026-02");
        let rows = project(100.0, 10.0, 5.0, &months).unwrap();

        assert_eq!(rows.len(), months.len());
        for (row, month) in rows.iter().zip(&months) {
            assert_eq!(row.month, month);
        }

        assert_relative_eq!(rows[0].remaining, 90.0);
        assert_relative_eq!(rows[3].remaining, 60.0);
        assert_relative_eq!(rows[3].migrated, 40.0);
        assert_relative_eq!(rows[3].added, 20.0);
        assert_relative_eq!(rows[3].total, 60.0);
    }

    #[test]
    fn remaining_is_floored_at_zero() {
        let rows = project(100.0, 40.0, 0.0, &months("2025-01", "2025-06")).unwrap();

        assert_relative_eq!(rows[1].remaining, 20.0);
        for row in &rows[2..] {
            assert_relative_eq!(row.remaining, 0.0);
            assert_relative_eq!(row.migrated, 100.0);
        }
    }

    #[test]
    fn negative_rate_is_not_capped() {
        let rows = project(100.0, -10.0, 0.0, &months("2025-01", "2025-02")).unwrap();

        assert_relative_eq!(rows[1].remaining, 120.0);
        assert_relative_eq!(rows[1].migrated, -20.0);
        assert_relative_eq!(rows[1].total, -20.0);
    }

    #[test]
    fn rejects_invalid_values() {
        let months = months("2025-01", "2025-02");

        for (total, rate, added) in [
            (-1.0, 1.0, 0.0),
            (f64::NAN, 1.0, 0.0),
            (1.0, 1.0, -0.5),
            (1.0, 1.0, f64::INFINITY),
        ] {
            assert!(matches!(
                project(total, rate, added, &months),
                Err(ValidationError::Negative { .. })
            ));
        }

        for rate in [f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(
                project(1.0, rate, 0.0, &months),
                Err(ValidationError::NonFiniteRate { .. })
            ));
        }
    }

    #[test]
    fn serializes_month_and_label() {
        let rows = project(3100.0, 3100.0 / 12.0, 60.0, &months("2025-07", "2025-07")).unwrap();
        let json = serde_json::to_value(rows[0]).unwrap();

        assert_eq!(json["month"], "2025-07");
        assert_eq!(json["label"], "Jul 2025");
        assert_eq!(json["added"], 60.0);
    }
}
