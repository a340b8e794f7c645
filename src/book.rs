use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::analytics::BookAnalytics;
use crate::config::LedgerConfig;
use crate::customer::{Customer, Payment};
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::{PaymentLedger, PaymentReceipt};
use crate::lifecycle::LifecycleGuard;
use crate::query::{filter_customers, CustomerFilter, CustomerRow, SortKey};
use crate::status::StatusEngine;
use crate::store::CustomerStore;
use crate::types::{CustomerId, LoanStatus, PaymentId, StatusReport};

/// input for registering a new customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub loan_start_date: NaiveDate,
    pub total_loan_amount: Money,
    /// suggested daily installment; derived from the loan amount when omitted
    pub daily_payment: Option<Money>,
}

/// replacement loan terms; applied wholesale, in any state
#[derive(Debug, Clone)]
pub struct TermsUpdate {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub loan_start_date: NaiveDate,
    pub total_loan_amount: Money,
    pub daily_payment: Money,
}

/// the loan book: customers, their ledgers, and the rules tying them together
///
/// every read recomputes status through the status engine; the persisted
/// status field is only an opportunistically refreshed cache
pub struct LoanBook<S: CustomerStore> {
    store: S,
    config: LedgerConfig,
    engine: StatusEngine,
    ledger: PaymentLedger,
    events: EventStore,
}

impl<S: CustomerStore> LoanBook<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            engine: StatusEngine::new(config.clone()),
            ledger: PaymentLedger::new(config.clone()),
            config,
            events: EventStore::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// register a new customer with an empty payment ledger
    pub fn register_customer(
        &mut self,
        new: NewCustomer,
        time: &SafeTimeProvider,
    ) -> Result<Customer> {
        let mut builder = Customer::builder()
            .name(new.name)
            .phone(new.phone)
            .address(new.address)
            .loan_start_date(new.loan_start_date)
            .total_loan_amount(new.total_loan_amount);
        if let Some(daily) = new.daily_payment {
            builder = builder.daily_payment(daily);
        }

        let customer = builder.build(&self.config, time)?;
        let customer = self.store.save(customer)?;

        self.events.emit(Event::CustomerRegistered {
            customer_id: customer.id,
            phone: customer.phone.clone(),
            loan_amount: customer.total_loan_amount,
            loan_start_date: customer.loan_start_date,
            timestamp: time.now(),
        });

        Ok(customer)
    }

    /// fetch one customer with freshly derived status
    pub fn customer(
        &mut self,
        id: &CustomerId,
        time: &SafeTimeProvider,
    ) -> Result<(Customer, StatusReport)> {
        let customer = self.store.find_by_id(id)?;
        self.refreshed(customer, time)
    }

    /// fetch by phone number, the customer-login lookup
    pub fn customer_by_phone(
        &mut self,
        phone: &str,
        time: &SafeTimeProvider,
    ) -> Result<(Customer, StatusReport)> {
        let customer = self.store.find_by_phone(phone)?;
        self.refreshed(customer, time)
    }

    /// all customers, newest first, each with freshly derived status
    pub fn customers(&mut self, time: &SafeTimeProvider) -> Result<Vec<CustomerRow>> {
        self.store
            .list()
            .into_iter()
            .map(|customer| self.refreshed(customer, time))
            .collect()
    }

    /// filtered and sorted customer rows
    pub fn query(
        &mut self,
        filter: &CustomerFilter,
        sort: SortKey,
        time: &SafeTimeProvider,
    ) -> Result<Vec<CustomerRow>> {
        let rows = self.customers(time)?;
        let selected = filter_customers(&rows, filter, sort, time.now().date_naive());
        Ok(selected.into_iter().cloned().collect())
    }

    /// replace loan terms; allowed in any state
    ///
    /// existing payments are not re-validated against a lowered amount; the
    /// derived status simply flips on the next read
    pub fn update_terms(
        &mut self,
        id: &CustomerId,
        update: TermsUpdate,
        time: &SafeTimeProvider,
    ) -> Result<Customer> {
        let mut customer = self.store.find_by_id(id)?;

        validate_terms(&update)?;

        let old_amount = customer.total_loan_amount;
        customer.name = update.name;
        customer.phone = update.phone;
        customer.address = update.address;
        customer.loan_start_date = update.loan_start_date;
        customer.total_loan_amount = update.total_loan_amount;
        customer.daily_payment = update.daily_payment;

        let customer = self.store.save(customer)?;

        self.events.emit(Event::LoanTermsUpdated {
            customer_id: customer.id,
            old_amount,
            new_amount: customer.total_loan_amount,
            timestamp: time.now(),
        });

        Ok(customer)
    }

    /// record a cash payment against a customer's loan
    pub fn record_payment(
        &mut self,
        id: &CustomerId,
        date: NaiveDate,
        amount: Money,
        principal: Option<Money>,
        time: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        let mut customer = self.store.find_by_id(id)?;
        let receipt = self.ledger.record_payment(
            &mut customer,
            date,
            amount,
            principal,
            time,
            &mut self.events,
        )?;
        self.store.save(customer)?;
        Ok(receipt)
    }

    /// remove every payment recorded on the given date
    pub fn remove_payments_on(
        &mut self,
        id: &CustomerId,
        date: NaiveDate,
        time: &SafeTimeProvider,
    ) -> Result<Vec<Payment>> {
        let mut customer = self.store.find_by_id(id)?;
        let removed =
            self.ledger
                .remove_payments_on(&mut customer, date, time, &mut self.events)?;
        self.store.save(customer)?;
        Ok(removed)
    }

    /// remove a single payment by its identifier
    pub fn remove_payment(
        &mut self,
        id: &CustomerId,
        payment_id: PaymentId,
        time: &SafeTimeProvider,
    ) -> Result<Payment> {
        let mut customer = self.store.find_by_id(id)?;
        let removed =
            self.ledger
                .remove_payment(&mut customer, payment_id, time, &mut self.events)?;
        self.store.save(customer)?;
        Ok(removed)
    }

    /// permanently delete a customer; only settled loans may be removed
    pub fn delete_customer(
        &mut self,
        id: &CustomerId,
        time: &SafeTimeProvider,
    ) -> Result<Customer> {
        let customer = self.store.find_by_id(id)?;
        let report = self.engine.derive_at(&customer, time);
        LifecycleGuard::ensure_deletable(&report)?;

        let deleted = self.store.delete(id)?;
        self.events.emit(Event::CustomerDeleted {
            customer_id: deleted.id,
            payment_count: deleted.payments.len(),
            timestamp: time.now(),
        });

        Ok(deleted)
    }

    /// aggregate figures across the book
    pub fn analytics(&mut self, time: &SafeTimeProvider) -> Result<BookAnalytics> {
        let rows = self.customers(time)?;
        Ok(BookAnalytics::compute(&rows))
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// derive, and opportunistically persist a newly settled status
    fn refreshed(
        &mut self,
        mut customer: Customer,
        time: &SafeTimeProvider,
    ) -> Result<(Customer, StatusReport)> {
        let report = self.engine.derive_at(&customer, time);

        if self.config.write_back_status
            && report.status == LoanStatus::Deactivated
            && customer.status != LoanStatus::Deactivated
        {
            self.events.emit(Event::StatusChanged {
                customer_id: customer.id,
                old_status: customer.status,
                new_status: LoanStatus::Deactivated,
                timestamp: time.now(),
            });
            customer.status = LoanStatus::Deactivated;
            customer = self.store.save(customer)?;
        }

        Ok((customer, report))
    }
}

fn validate_terms(update: &TermsUpdate) -> Result<()> {
    for (field, value) in [
        ("name", &update.name),
        ("phone", &update.phone),
        ("address", &update.address),
    ] {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidField {
                field,
                message: "is required".to_string(),
            });
        }
    }
    if update.phone.chars().filter(|c| c.is_ascii_digit()).count() < 10 {
        return Err(LedgerError::InvalidField {
            field: "phone",
            message: "must contain at least 10 digits".to_string(),
        });
    }
    if !update.total_loan_amount.is_positive() {
        return Err(LedgerError::InvalidField {
            field: "total_loan_amount",
            message: format!("must be positive, got {}", update.total_loan_amount),
        });
    }
    Ok(())
}
