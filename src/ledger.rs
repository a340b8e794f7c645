use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::config::LedgerConfig;
use crate::customer::{Customer, Payment};
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::lifecycle::LifecycleGuard;
use crate::status::StatusEngine;
use crate::types::{LoanStatus, PaymentId, StatusReport};

/// result of a recorded payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub report: StatusReport,
    /// true when this payment brought the loan to full repayment
    pub settled: bool,
}

/// validates and applies payment mutations against a customer's ledger
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    engine: StatusEngine,
}

impl PaymentLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            engine: StatusEngine::new(config),
        }
    }

    /// record a cash payment against the loan
    ///
    /// rejects non-positive amounts, payments against a deactivated loan,
    /// and any amount exceeding the remaining balance
    pub fn record_payment(
        &self,
        customer: &mut Customer,
        date: NaiveDate,
        amount: Money,
        principal: Option<Money>,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<PaymentReceipt> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }

        let before = self.engine.derive_at(customer, time);
        LifecycleGuard::ensure_accepts_payment(&before, customer.id)?;

        if amount > before.remaining {
            return Err(LedgerError::OverpaymentRejected {
                remaining: before.remaining,
                requested: amount,
            });
        }

        // no de-duplication by date: several payments may share a calendar day
        let payment = Payment::new(date, amount, principal);
        customer.push_payment(payment.clone());

        let report = self.engine.derive_at(customer, time);
        events.emit(Event::PaymentRecorded {
            customer_id: customer.id,
            payment_id: payment.id,
            date,
            amount,
            total_paid: report.total_paid,
            remaining: report.remaining,
            timestamp: time.now(),
        });

        let settled = report.status == LoanStatus::Deactivated;
        if settled {
            self.refresh_cached_status(customer, &report, time, events);
            events.emit(Event::LoanSettled {
                customer_id: customer.id,
                total_paid: report.total_paid,
                timestamp: time.now(),
            });
        }

        Ok(PaymentReceipt {
            payment,
            report,
            settled,
        })
    }

    /// remove every payment entry recorded on the given date
    ///
    /// legal in any state; removing from a deactivated loan can revert its
    /// derived status on the next read
    pub fn remove_payments_on(
        &self,
        customer: &mut Customer,
        date: NaiveDate,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Vec<Payment>> {
        let removed = customer.remove_payments_on(date);
        if removed.is_empty() {
            return Err(LedgerError::NoPaymentOnDate { date });
        }

        for payment in &removed {
            events.emit(Event::PaymentRemoved {
                customer_id: customer.id,
                payment_id: payment.id,
                date: payment.date,
                amount: payment.amount,
                timestamp: time.now(),
            });
        }

        let report = self.engine.derive_at(customer, time);
        self.refresh_cached_status(customer, &report, time, events);

        Ok(removed)
    }

    /// remove a single payment entry by its identifier
    pub fn remove_payment(
        &self,
        customer: &mut Customer,
        id: PaymentId,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Payment> {
        let payment = customer
            .remove_payment(id)
            .ok_or(LedgerError::PaymentNotFound { id })?;

        events.emit(Event::PaymentRemoved {
            customer_id: customer.id,
            payment_id: payment.id,
            date: payment.date,
            amount: payment.amount,
            timestamp: time.now(),
        });

        let report = self.engine.derive_at(customer, time);
        self.refresh_cached_status(customer, &report, time, events);

        Ok(payment)
    }

    /// sync the cached status flag with the derived value
    fn refresh_cached_status(
        &self,
        customer: &mut Customer,
        report: &StatusReport,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) {
        if customer.status != report.status {
            events.emit(Event::StatusChanged {
                customer_id: customer.id,
                old_status: customer.status,
                new_status: report.status,
                timestamp: time.now(),
            });
            customer.status = report.status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn customer(amount: i64, started_days_ago: i64, time: &SafeTimeProvider) -> Customer {
        Customer::builder()
            .name("Priya Sharma")
            .phone("8765432109")
            .address("456 Oak Avenue, Mumbai")
            .loan_start_date(time.now().date_naive() - Duration::days(started_days_ago))
            .total_loan_amount(Money::from_major(amount))
            .build(&LedgerConfig::default(), time)
            .unwrap()
    }

    fn ledger() -> PaymentLedger {
        PaymentLedger::new(LedgerConfig::default())
    }

    #[test]
    fn test_record_payment() {
        let time = test_time();
        let mut customer = customer(50_000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();

        let receipt = ledger()
            .record_payment(
                &mut customer,
                date,
                Money::from_major(500),
                None,
                &time,
                &mut events,
            )
            .unwrap();

        assert!(!receipt.settled);
        assert_eq!(receipt.payment.principal, Money::from_major(500));
        assert_eq!(receipt.report.total_paid, Money::from_major(500));
        assert_eq!(customer.payments.len(), 1);
        assert!(matches!(events.events()[0], Event::PaymentRecorded { .. }));
    }

    #[test]
    fn test_explicit_principal_is_kept() {
        let time = test_time();
        let mut customer = customer(50_000, 10, &time);
        let mut events = EventStore::new();

        let receipt = ledger()
            .record_payment(
                &mut customer,
                time.now().date_naive(),
                Money::from_major(500),
                Some(Money::from_major(450)),
                &time,
                &mut events,
            )
            .unwrap();

        assert_eq!(receipt.payment.principal, Money::from_major(450));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let time = test_time();
        let mut customer = customer(50_000, 10, &time);
        let mut events = EventStore::new();

        let result = ledger().record_payment(
            &mut customer,
            time.now().date_naive(),
            Money::ZERO,
            None,
            &time,
            &mut events,
        );

        assert!(matches!(
            result,
            Err(LedgerError::InvalidPaymentAmount { .. })
        ));
        assert!(customer.payments.is_empty());
    }

    #[test]
    fn test_overpayment_rejected_and_balance_unchanged() {
        let time = test_time();
        let mut customer = customer(1000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();
        let l = ledger();

        l.record_payment(
            &mut customer,
            date,
            Money::from_major(700),
            None,
            &time,
            &mut events,
        )
        .unwrap();

        // remaining is 300, an attempted 500 must be rejected
        let result = l.record_payment(
            &mut customer,
            date,
            Money::from_major(500),
            None,
            &time,
            &mut events,
        );

        match result {
            Err(LedgerError::OverpaymentRejected {
                remaining,
                requested,
            }) => {
                assert_eq!(remaining, Money::from_major(300));
                assert_eq!(requested, Money::from_major(500));
            }
            other => panic!("expected overpayment rejection, got {:?}", other),
        }
        assert_eq!(customer.remaining_balance(), Money::from_major(300));
    }

    #[test]
    fn test_final_payment_settles_loan() {
        let time = test_time();
        let mut customer = customer(1000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();

        let receipt = ledger()
            .record_payment(
                &mut customer,
                date,
                Money::from_major(1000),
                None,
                &time,
                &mut events,
            )
            .unwrap();

        assert!(receipt.settled);
        assert_eq!(receipt.report.status, LoanStatus::Deactivated);
        assert_eq!(customer.status, LoanStatus::Deactivated);

        let kinds = events.take_events();
        assert!(kinds.iter().any(|e| matches!(e, Event::LoanSettled { .. })));
        assert!(kinds
            .iter()
            .any(|e| matches!(e, Event::StatusChanged { .. })));
    }

    #[test]
    fn test_payment_against_settled_loan_rejected() {
        let time = test_time();
        let mut customer = customer(1000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();
        let l = ledger();

        l.record_payment(
            &mut customer,
            date,
            Money::from_major(1000),
            None,
            &time,
            &mut events,
        )
        .unwrap();

        let result = l.record_payment(
            &mut customer,
            date,
            Money::from_major(100),
            None,
            &time,
            &mut events,
        );

        assert!(matches!(result, Err(LedgerError::LoanAlreadyClosed { .. })));
        assert_eq!(customer.payments.len(), 1);
    }

    #[test]
    fn test_remove_payments_on_date_is_multi_match() {
        let time = test_time();
        let mut customer = customer(50_000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();
        let l = ledger();

        l.record_payment(
            &mut customer,
            date,
            Money::from_major(500),
            None,
            &time,
            &mut events,
        )
        .unwrap();
        l.record_payment(
            &mut customer,
            date,
            Money::from_major(300),
            None,
            &time,
            &mut events,
        )
        .unwrap();
        l.record_payment(
            &mut customer,
            date - Duration::days(1),
            Money::from_major(200),
            None,
            &time,
            &mut events,
        )
        .unwrap();
        events.clear();

        let removed = l
            .remove_payments_on(&mut customer, date, &time, &mut events)
            .unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(customer.payments.len(), 1);
        assert_eq!(customer.total_paid(), Money::from_major(200));
        assert_eq!(
            events
                .events()
                .iter()
                .filter(|e| matches!(e, Event::PaymentRemoved { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_remove_missing_date_is_not_found() {
        let time = test_time();
        let mut customer = customer(50_000, 10, &time);
        let mut events = EventStore::new();

        let result = ledger().remove_payments_on(
            &mut customer,
            time.now().date_naive(),
            &time,
            &mut events,
        );

        assert!(matches!(result, Err(LedgerError::NoPaymentOnDate { .. })));
    }

    #[test]
    fn test_removal_reverts_settled_loan() {
        let time = test_time();
        let mut customer = customer(1000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();
        let l = ledger();

        l.record_payment(
            &mut customer,
            date,
            Money::from_major(1000),
            None,
            &time,
            &mut events,
        )
        .unwrap();
        assert_eq!(customer.status, LoanStatus::Deactivated);

        l.remove_payments_on(&mut customer, date, &time, &mut events)
            .unwrap();

        // status is recomputed, never frozen
        assert_eq!(customer.status, LoanStatus::Active);
        let report = StatusEngine::new(LedgerConfig::default()).derive_at(&customer, &time);
        assert_eq!(report.status, LoanStatus::Active);
    }

    #[test]
    fn test_remove_single_payment_by_id() {
        let time = test_time();
        let mut customer = customer(50_000, 10, &time);
        let mut events = EventStore::new();
        let date = time.now().date_naive();
        let l = ledger();

        let receipt = l
            .record_payment(
                &mut customer,
                date,
                Money::from_major(500),
                None,
                &time,
                &mut events,
            )
            .unwrap();
        l.record_payment(
            &mut customer,
            date,
            Money::from_major(300),
            None,
            &time,
            &mut events,
        )
        .unwrap();

        let removed = l
            .remove_payment(&mut customer, receipt.payment.id, &time, &mut events)
            .unwrap();

        assert_eq!(removed.amount, Money::from_major(500));
        assert_eq!(customer.payments.len(), 1);

        let missing = l.remove_payment(&mut customer, Uuid::new_v4(), &time, &mut events);
        assert!(matches!(missing, Err(LedgerError::PaymentNotFound { .. })));
    }
}
