//! Upstream request budget
//!
//! Counts upstream calls since process start against a soft ceiling. The
//! counter is informational: nothing is ever refused because of it.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide upstream call counter, owned by the hosting process
#[derive(Debug)]
pub struct RequestBudget {
    count: AtomicU64,
    limit: u64,
}

/// Point-in-time view of the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub count: u64,
    pub limit: u64,
    pub remaining: u64,
}

impl RequestBudget {
    /// Create a budget starting at zero
    pub fn new(limit: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            limit,
        }
    }

    /// Record one upstream call attempt, returning the new count
    pub fn record(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Calls recorded so far
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> BudgetSnapshot {
        let count = self.count();
        BudgetSnapshot {
            count,
            limit: self.limit,
            remaining: self.limit.saturating_sub(count),
        }
    }
}
