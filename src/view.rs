use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::customer::{Customer, Payment};
use crate::decimal::Money;
use crate::types::{CustomerId, LoanStatus, PaymentId, RepaymentProgress, StatusReport};

/// serializable view of a customer with derived figures, for the presentation layer
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub loan_start_date: NaiveDate,
    pub total_loan_amount: Money,
    pub daily_payment: Money,
    pub status: LoanStatus,
    pub progress: RepaymentProgress,
    pub total_paid: Money,
    pub remaining: Money,
    /// share of the loan repaid, capped at 100
    pub percent_repaid: Decimal,
    pub payments: Vec<PaymentEntryView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentEntryView {
    pub id: PaymentId,
    pub date: NaiveDate,
    pub amount: Money,
    pub principal: Money,
}

impl CustomerView {
    pub fn from_parts(customer: &Customer, report: &StatusReport) -> Self {
        let percent_repaid = if customer.total_loan_amount.is_zero() {
            Decimal::ZERO
        } else {
            (report.total_paid.as_decimal() / customer.total_loan_amount.as_decimal()
                * Decimal::from(100))
            .round_dp(2)
            .min(Decimal::from(100))
        };

        CustomerView {
            id: customer.id,
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            loan_start_date: customer.loan_start_date,
            total_loan_amount: customer.total_loan_amount,
            daily_payment: customer.daily_payment,
            status: report.status,
            progress: report.progress,
            total_paid: report.total_paid,
            remaining: report.remaining,
            percent_repaid,
            payments: customer.payments.iter().map(PaymentEntryView::from).collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Payment> for PaymentEntryView {
    fn from(payment: &Payment) -> Self {
        PaymentEntryView {
            id: payment.id,
            date: payment.date,
            amount: payment.amount,
            principal: payment.principal,
        }
    }
}
