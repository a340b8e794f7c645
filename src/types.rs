use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// unique identifier for a single payment entry
pub type PaymentId = Uuid;

/// loan lifecycle status, always derived from payment history and terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// inside the repayment window and not fully paid
    Active,
    /// past the repayment window and not fully paid
    Pending,
    /// fully repaid
    Deactivated,
}

impl LoanStatus {
    pub fn is_deactivated(&self) -> bool {
        matches!(self, LoanStatus::Deactivated)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanStatus::Active => "active",
            LoanStatus::Pending => "pending",
            LoanStatus::Deactivated => "deactivated",
        };
        write!(f, "{}", label)
    }
}

/// the days figure that accompanies a derived status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RepaymentProgress {
    /// loan fully repaid
    Completed,
    /// past the repayment window; days is at least 1
    Overdue { days: u32 },
    /// inside the repayment window
    OnTrack { days_left: u32 },
}

impl RepaymentProgress {
    /// the bare day count, as shown to the owner regardless of direction
    pub fn days(&self) -> u32 {
        match self {
            RepaymentProgress::Completed => 0,
            RepaymentProgress::Overdue { days } => *days,
            RepaymentProgress::OnTrack { days_left } => *days_left,
        }
    }
}

/// full output of a status derivation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: LoanStatus,
    pub progress: RepaymentProgress,
    pub total_paid: Money,
    pub remaining: Money,
    pub days_since_start: i64,
}
