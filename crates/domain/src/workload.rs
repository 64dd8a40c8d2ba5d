//! The trainer workload aggregate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{TrainerId, TrainingMonth};

/// Denormalized trainer identity carried alongside the monthly totals.
///
/// These fields always reflect the latest event's payload: both ADD and
/// DELETE overwrite them (last-write-wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
}

impl TrainerIdentity {
    /// Creates a trainer identity, rejecting blank names.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        active: bool,
    ) -> Result<Self, DomainError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() {
            return Err(DomainError::BlankField { name: "firstName" });
        }
        if last_name.trim().is_empty() {
            return Err(DomainError::BlankField { name: "lastName" });
        }
        Ok(Self {
            first_name,
            last_name,
            active,
        })
    }
}

/// Aggregate root: a trainer's running total of training minutes per month.
///
/// Pure in-memory logic, no I/O. Instances are rehydrated from storage for
/// each operation and discarded once the resulting total is persisted.
///
/// Invariant: no month entry with a total of zero or less ever exists in
/// the mapping. `delete` removes the entry instead of storing a
/// non-positive value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerWorkload {
    id: TrainerId,
    identity: TrainerIdentity,
    minutes_by_month: BTreeMap<TrainingMonth, i64>,
}

impl TrainerWorkload {
    /// Creates an empty workload aggregate for a trainer.
    pub fn new(id: TrainerId, identity: TrainerIdentity) -> Self {
        Self {
            id,
            identity,
            minutes_by_month: BTreeMap::new(),
        }
    }

    /// Adds `minutes` to the month's running total, creating the entry if
    /// absent.
    ///
    /// Fails with `NonPositiveMinutes` for a zero or negative delta.
    pub fn record(&mut self, month: TrainingMonth, minutes: i64) -> Result<(), DomainError> {
        require_positive(minutes)?;
        *self.minutes_by_month.entry(month).or_insert(0) += minutes;
        Ok(())
    }

    /// Subtracts `minutes` from the month's total. If the result is zero or
    /// below, the entry is removed entirely.
    ///
    /// Fails with `NonPositiveMinutes` for a zero or negative delta.
    pub fn delete(&mut self, month: TrainingMonth, minutes: i64) -> Result<(), DomainError> {
        require_positive(minutes)?;
        let remaining = self.minutes_by_month.get(&month).copied().unwrap_or(0) - minutes;
        if remaining <= 0 {
            self.minutes_by_month.remove(&month);
        } else {
            self.minutes_by_month.insert(month, remaining);
        }
        Ok(())
    }

    /// Returns the trainer's identifier.
    pub fn id(&self) -> &TrainerId {
        &self.id
    }

    /// Returns the trainer's identity fields.
    pub fn identity(&self) -> &TrainerIdentity {
        &self.identity
    }

    /// Returns the total minutes for a month, or 0 if absent.
    pub fn monthly_minutes(&self, month: TrainingMonth) -> i64 {
        self.minutes_by_month.get(&month).copied().unwrap_or(0)
    }

    /// Iterates month totals in ascending (year, month) order.
    pub fn months(&self) -> impl Iterator<Item = (TrainingMonth, i64)> + '_ {
        self.minutes_by_month.iter().map(|(m, t)| (*m, *t))
    }

    /// Returns the number of months with a positive total.
    pub fn month_count(&self) -> usize {
        self.minutes_by_month.len()
    }
}

fn require_positive(minutes: i64) -> Result<(), DomainError> {
    if minutes <= 0 {
        return Err(DomainError::NonPositiveMinutes(minutes));
    }
    Ok(())
}
