//! Process-wide usage budget.
//!
//! Tracks the cumulative cost of model-invoking operations (measured in
//! whitespace-delimited words of model output) against a fixed ceiling.
//! The check is advisory: callers ask [`UsageBudget::is_exhausted`] before
//! starting an expensive operation and record the cost afterwards, so a
//! single operation may overshoot the ceiling. Nothing ever decrements the
//! counter; it resets only with the process.

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counter of consumed usage against a fixed limit.
#[derive(Debug)]
pub struct UsageBudget {
    used: AtomicU64,
    limit: u64,
}

impl UsageBudget {
    /// Create a budget with the given ceiling.
    pub fn new(limit: u64) -> Self {
        Self {
            used: AtomicU64::new(0),
            limit,
        }
    }

    /// Pre-flight check: true once cumulative usage has reached the ceiling.
    pub fn is_exhausted(&self) -> bool {
        self.used.load(Ordering::Relaxed) >= self.limit
    }

    /// Record cost consumed by a completed operation.
    pub fn record(&self, cost: u64) {
        let total = self.used.fetch_add(cost, Ordering::Relaxed) + cost;
        tracing::debug!(cost, total, limit = self.limit, "usage recorded");
        if total >= self.limit {
            tracing::warn!(total, limit = self.limit, "usage budget exhausted");
        }
    }

    /// Cumulative usage recorded so far.
    pub fn used(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    /// The fixed ceiling.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// Count whitespace-delimited words, the unit the budget is charged in.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
