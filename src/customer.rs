use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{CustomerId, LoanStatus, PaymentId};

/// one recorded cash payment against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub date: NaiveDate,
    pub amount: Money,
    pub principal: Money,
}

impl Payment {
    pub fn new(date: NaiveDate, amount: Money, principal: Option<Money>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            principal: principal.unwrap_or(amount),
        }
    }
}

/// one loan account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub loan_start_date: NaiveDate,
    pub total_loan_amount: Money,
    pub daily_payment: Money,
    pub payments: Vec<Payment>,
    /// cached lifecycle flag; the derived value always wins on read
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// builder for registering new customers
    pub fn builder() -> CustomerBuilder {
        CustomerBuilder::new()
    }

    /// sum of all recorded payment amounts
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// amount still owed, floored at zero
    pub fn remaining_balance(&self) -> Money {
        (self.total_loan_amount - self.total_paid()).max(Money::ZERO)
    }

    /// all payment entries recorded on the given date
    pub fn payments_on(&self, date: NaiveDate) -> Vec<&Payment> {
        self.payments.iter().filter(|p| p.date == date).collect()
    }

    /// append a payment entry; validation is the ledger's concern
    pub(crate) fn push_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    /// remove every payment entry on the given date, returning the removed entries
    pub(crate) fn remove_payments_on(&mut self, date: NaiveDate) -> Vec<Payment> {
        let (removed, kept): (Vec<Payment>, Vec<Payment>) = std::mem::take(&mut self.payments)
            .into_iter()
            .partition(|p| p.date == date);
        self.payments = kept;
        removed
    }

    /// remove a single payment entry by id
    pub(crate) fn remove_payment(&mut self, id: PaymentId) -> Option<Payment> {
        let index = self.payments.iter().position(|p| p.id == id)?;
        Some(self.payments.remove(index))
    }
}

/// parse a calendar date exchanged in YYYY-MM-DD form
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| LedgerError::InvalidDate {
        message: format!("{}: {}", s, e),
    })
}

/// builder for creating customers
#[derive(Debug, Default)]
pub struct CustomerBuilder {
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    loan_start_date: Option<NaiveDate>,
    total_loan_amount: Option<Money>,
    daily_payment: Option<Money>,
}

impl CustomerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn loan_start_date(mut self, date: NaiveDate) -> Self {
        self.loan_start_date = Some(date);
        self
    }

    pub fn total_loan_amount(mut self, amount: Money) -> Self {
        self.total_loan_amount = Some(amount);
        self
    }

    pub fn daily_payment(mut self, amount: Money) -> Self {
        self.daily_payment = Some(amount);
        self
    }

    pub fn build(self, config: &LedgerConfig, time: &SafeTimeProvider) -> Result<Customer> {
        let name = required_text("name", self.name)?;
        let phone = required_text("phone", self.phone)?;
        let address = required_text("address", self.address)?;

        if phone.chars().filter(|c| c.is_ascii_digit()).count() < 10 {
            return Err(LedgerError::InvalidField {
                field: "phone",
                message: "must contain at least 10 digits".to_string(),
            });
        }

        let loan_start_date = self.loan_start_date.ok_or(LedgerError::InvalidField {
            field: "loan_start_date",
            message: "is required".to_string(),
        })?;

        let total_loan_amount = self.total_loan_amount.ok_or(LedgerError::InvalidField {
            field: "total_loan_amount",
            message: "is required".to_string(),
        })?;
        if !total_loan_amount.is_positive() {
            return Err(LedgerError::InvalidField {
                field: "total_loan_amount",
                message: format!("must be positive, got {}", total_loan_amount),
            });
        }

        // suggested installment defaults to a fraction of the loan, whole units
        let daily_payment = self.daily_payment.unwrap_or_else(|| {
            total_loan_amount
                .percentage(config.daily_payment_rate.as_percentage())
                .round_dp(0)
        });

        Ok(Customer {
            id: Uuid::new_v4(),
            name,
            phone,
            address,
            loan_start_date,
            total_loan_amount,
            daily_payment,
            payments: Vec::new(),
            status: LoanStatus::Active,
            created_at: time.now(),
        })
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LedgerError::InvalidField {
            field,
            message: "is required".to_string(),
        }),
    }
}
