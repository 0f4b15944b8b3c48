//! Metered-call budget for the area search API.
//!
//! The budget is an explicit resource object owned by the caller of metered
//! operations: check-then-act (`has_remaining` before a call, `record` after).
//! The ceiling is advisory — the type never blocks a call on its own — and
//! calendar-month rollover is the persistence collaborator's job.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Calendar month used as the budget accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub year: i32,
    pub month: u32,
}

impl BudgetPeriod {
    #[must_use]
    pub fn current() -> Self {
        let now = Utc::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Monotonically increasing call counter plus a ceiling for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBudget {
    used: u32,
    ceiling: u32,
    period: BudgetPeriod,
}

impl RequestBudget {
    /// Fresh budget for the current calendar month.
    #[must_use]
    pub fn new(ceiling: u32) -> Self {
        Self {
            used: 0,
            ceiling,
            period: BudgetPeriod::current(),
        }
    }

    /// Rehydrate a budget from persisted state.
    #[must_use]
    pub fn with_usage(used: u32, ceiling: u32, period: BudgetPeriod) -> Self {
        Self {
            used,
            ceiling,
            period,
        }
    }

    #[must_use]
    pub fn used(&self) -> u32 {
        self.used
    }

    #[must_use]
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    #[must_use]
    pub fn period(&self) -> BudgetPeriod {
        self.period
    }

    /// True while at least one metered call fits under the ceiling.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.used < self.ceiling
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.ceiling.saturating_sub(self.used)
    }

    /// Record `calls` completed metered calls. The counter only grows; it may
    /// pass the ceiling when a multi-page unit was already in flight.
    pub fn record(&mut self, calls: u32) {
        self.used = self.used.saturating_add(calls);
    }

    /// Fresh counter for a new period, keeping the ceiling.
    #[must_use]
    pub fn reset_for(&self, period: BudgetPeriod) -> Self {
        Self {
            used: 0,
            ceiling: self.ceiling,
            period,
        }
    }
}
