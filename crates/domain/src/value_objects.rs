//! Value objects for the trainer workload domain.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalized trainer identifier.
///
/// Usernames are trimmed and case-folded on construction, so equality and
/// storage keys never depend on the casing of the inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainerId(String);

impl TrainerId {
    /// Creates a trainer ID from a raw username.
    ///
    /// Fails with `BlankField` if the username is empty or whitespace-only.
    pub fn new(username: impl AsRef<str>) -> Result<Self, DomainError> {
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(DomainError::BlankField {
                name: "trainerUsername",
            });
        }
        Ok(Self(username.to_lowercase()))
    }

    /// Returns the normalized username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TrainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A calendar (year, month-of-year) pair.
///
/// Ordering is ascending by year, then month, which is the order monthly
/// summaries are reported in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TrainingMonth {
    year: i32,
    month: u32,
}

impl TrainingMonth {
    /// Creates a training month, validating the month-of-year.
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Derives the training month from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        // NaiveDate months are always 1..=12
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month-of-year (1..=12).
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for TrainingMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The kind of change a training event applies to a trainer's workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "ADD")]
    Add,
    #[serde(rename = "DELETE")]
    Delete,
}

impl ActionType {
    /// Returns the wire-format name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Add => "ADD",
            ActionType::Delete => "DELETE",
        }
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    /// Parses the wire-format action name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADD" => Ok(ActionType::Add),
            "DELETE" => Ok(ActionType::Delete),
            other => Err(DomainError::UnsupportedAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
