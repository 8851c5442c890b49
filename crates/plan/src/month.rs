use std::{fmt, str::FromStr};

use jiff::{
    ToSpan, Unit,
    civil::{Date, date},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValidationError;

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(Date);

impl Month {
    /// Creates a month from a year and a month number (1-12).
    ///
    /// # Errors
    ///
    /// Returns an error if the month number or year is out of range.
    pub fn new(year: i16, month: i8) -> Result<Self, ValidationError> {
        Ok(Self(Date::new(year, month, 1)?))
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self(date.first_of_month())
    }

    /// Const constructor for known-good months. Panics on an invalid month.
    pub(crate) const fn known(year: i16, month: i8) -> Self {
        Self(date(year, month, 1))
    }

    /// Returns the first day of the month.
    #[must_use]
    pub fn date(self) -> Date {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i16 {
        self.0.year()
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub fn month(self) -> i8 {
        self.0.month()
    }

    /// Returns the following month.
    ///
    /// # Errors
    ///
    /// Returns an error past the last representable month.
    pub fn next(self) -> Result<Self, ValidationError> {
        Ok(Self(self.0.checked_add(1.month())?))
    }

    /// Returns the number of whole months from `self` to `later`.
    ///
    /// The count is negative if `later` is before `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar difference cannot be computed.
    pub fn months_until(self, later: Month) -> Result<i32, ValidationError> {
        let span = self.0.until((Unit::Month, later.0))?;
        Ok(span.get_months())
    }

    /// Returns a display label such as `Jul 2025`.
    #[must_use]
    pub fn label(self) -> String {
        self.0.strftime("%b %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = ValidationError;

    /// Parses `YYYY-MM` or `YYYY-MM-DD`; a day is discarded.
    ///
    /// Anything else, including a date followed by a time, is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth { text: s.to_owned() };
        let text = s.trim();
        if !is_date_shaped(text) {
            return Err(invalid());
        }
        let parsed = if text.len() == 7 {
            format!("{text}-01").parse::<Date>()
        } else {
            text.parse::<Date>()
        };
        parsed.map(Self::from_date).map_err(|_| invalid())
    }
}

/// Returns true for exactly `DDDD-DD` or `DDDD-DD-DD` in ASCII digits.
fn is_date_shaped(text: &str) -> bool {
    let bytes = text.as_bytes();
    (bytes.len() == 7 || bytes.len() == 10)
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Consecutive calendar months from a start month to an end month inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSequence {
    months: Vec<Month>,
}

impl MonthSequence {
    /// Builds the sequence `start, start + 1 month, ..., end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn new(start: Month, end: Month) -> Result<Self, ValidationError> {
        ValidationError::check_order("start", start, "end", end)?;

        let months = start
            .0
            .series(1.month())
            .take_while(|date| *date <= end.0)
            .map(Month)
            .collect();

        Ok(Self { months })
    }

    /// Returns the number of months, which is never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Always `false`; a sequence contains at least its start month.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<Month> {
        self.months.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<Month> {
        self.months.last().copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Month> + '_ {
        self.months.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Month] {
        &self.months
    }
}

impl<'a> IntoIterator for &'a MonthSequence {
    type Item = Month;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Month>>;

    fn into_iter(self) -> Self::IntoIter {
        self.months.iter().copied()
    }
}
