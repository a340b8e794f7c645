use crate::errors::{LedgerError, Result};
use crate::types::{CustomerId, LoanStatus, StatusReport};

/// gates operations that are only valid in specific derived states
pub struct LifecycleGuard;

impl LifecycleGuard {
    /// a customer may be deleted only once the loan is fully repaid
    pub fn ensure_deletable(report: &StatusReport) -> Result<()> {
        if report.status != LoanStatus::Deactivated {
            return Err(LedgerError::DeletionNotAllowed {
                status: report.status,
            });
        }
        Ok(())
    }

    /// a fully repaid loan accepts no further payments
    pub fn ensure_accepts_payment(report: &StatusReport, id: CustomerId) -> Result<()> {
        if report.status == LoanStatus::Deactivated {
            return Err(LedgerError::LoanAlreadyClosed { id });
        }
        Ok(())
    }
}
