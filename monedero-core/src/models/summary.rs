//! Derived financial summary.

use serde::{Deserialize, Serialize};

/// Global income/expense totals. Derived from the event collection on every
/// read, never persisted. `balance` always equals
/// `total_income - total_expenses`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// Sum of income amounts.
    pub total_income: f64,
    /// Sum of expense amounts.
    pub total_expenses: f64,
    /// Running difference.
    pub balance: f64,
}

impl FinancialSummary {
    /// Builds a summary from totals, deriving the balance.
    pub fn new(total_income: f64, total_expenses: f64) -> Self {
        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }
}
