use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::config::LedgerConfig;
use crate::customer::Customer;
use crate::decimal::Money;
use crate::types::{LoanStatus, RepaymentProgress, StatusReport};

/// derives lifecycle status from loan terms and payment history
///
/// the derivation is pure: the same customer and the same today always
/// produce the same report, and nothing is mutated
#[derive(Debug, Clone)]
pub struct StatusEngine {
    config: LedgerConfig,
}

impl StatusEngine {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// derive status and days figure for the given calendar day
    pub fn derive(&self, customer: &Customer, today: NaiveDate) -> StatusReport {
        let total_paid = customer.total_paid();
        let remaining = (customer.total_loan_amount - total_paid).max(Money::ZERO);
        let days_since_start = (today - customer.loan_start_date).num_days();
        let window = i64::from(self.config.repayment_window_days);

        // full repayment wins over any date-based rule
        if total_paid >= customer.total_loan_amount {
            return StatusReport {
                status: LoanStatus::Deactivated,
                progress: RepaymentProgress::Completed,
                total_paid,
                remaining,
                days_since_start,
            };
        }

        if days_since_start > window {
            return StatusReport {
                status: LoanStatus::Pending,
                progress: RepaymentProgress::Overdue {
                    days: (days_since_start - window) as u32,
                },
                total_paid,
                remaining,
                days_since_start,
            };
        }

        StatusReport {
            status: LoanStatus::Active,
            progress: RepaymentProgress::OnTrack {
                days_left: (window - days_since_start).max(0) as u32,
            },
            total_paid,
            remaining,
            days_since_start,
        }
    }

    /// derive against the time provider's current calendar day
    pub fn derive_at(&self, customer: &Customer, time: &SafeTimeProvider) -> StatusReport {
        self.derive(customer, time.now().date_naive())
    }
}
