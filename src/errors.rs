use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::{CustomerId, LoanStatus, PaymentId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("customer not found: {id}")]
    CustomerNotFound {
        id: CustomerId,
    },

    #[error("no customer registered with phone {phone}")]
    PhoneNotFound {
        phone: String,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: PaymentId,
    },

    #[error("no payment recorded on {date}")]
    NoPaymentOnDate {
        date: NaiveDate,
    },

    #[error("phone number already exists: {phone}")]
    DuplicatePhone {
        phone: String,
    },

    #[error("payment of {requested} exceeds remaining amount of {remaining}")]
    OverpaymentRejected {
        remaining: Money,
        requested: Money,
    },

    #[error("loan already deactivated, no further payments accepted: {id}")]
    LoanAlreadyClosed {
        id: CustomerId,
    },

    #[error("only deactivated loans can be deleted, current status is {status}")]
    DeletionNotAllowed {
        status: LoanStatus,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
