use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// fixed repayment term; a loan still unpaid after this many days is pending
    pub repayment_window_days: u32,
    /// fraction of the loan amount suggested as the daily installment
    pub daily_payment_rate: Rate,
    /// refresh the cached status field when a read derives deactivated
    pub write_back_status: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            repayment_window_days: 100,
            daily_payment_rate: Rate::from_percentage(1),
            write_back_status: true,
        }
    }
}
