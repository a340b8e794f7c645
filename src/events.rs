use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CustomerId, LoanStatus, PaymentId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    CustomerRegistered {
        customer_id: CustomerId,
        phone: String,
        loan_amount: Money,
        loan_start_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    LoanTermsUpdated {
        customer_id: CustomerId,
        old_amount: Money,
        new_amount: Money,
        timestamp: DateTime<Utc>,
    },
    CustomerDeleted {
        customer_id: CustomerId,
        payment_count: usize,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        customer_id: CustomerId,
        payment_id: PaymentId,
        date: NaiveDate,
        amount: Money,
        total_paid: Money,
        remaining: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentRemoved {
        customer_id: CustomerId,
        payment_id: PaymentId,
        date: NaiveDate,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    // status events
    LoanSettled {
        customer_id: CustomerId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        customer_id: CustomerId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
}

/// in-memory event buffer drained by the caller
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
