use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::query::CustomerRow;
use crate::types::LoanStatus;

/// collections received in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCollection {
    /// YYYY-MM
    pub month: String,
    pub amount: Money,
}

/// aggregate figures across the whole loan book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAnalytics {
    pub total_customers: usize,
    pub active_loans: usize,
    pub total_loan_amount: Money,
    pub amount_received: Money,
    /// collections from customers whose loans are still active
    pub active_loans_received: Money,
    pub monthly: Vec<MonthlyCollection>,
}

impl BookAnalytics {
    pub fn compute(rows: &[CustomerRow]) -> Self {
        let mut total_loan_amount = Money::ZERO;
        let mut amount_received = Money::ZERO;
        let mut active_loans_received = Money::ZERO;
        let mut active_loans = 0;
        let mut by_month: BTreeMap<String, Money> = BTreeMap::new();

        for (customer, report) in rows {
            total_loan_amount += customer.total_loan_amount;
            amount_received += report.total_paid;

            if report.status == LoanStatus::Active {
                active_loans += 1;
                active_loans_received += report.total_paid;
            }

            for payment in &customer.payments {
                let month = payment.date.format("%Y-%m").to_string();
                let entry = by_month.entry(month).or_insert(Money::ZERO);
                *entry += payment.amount;
            }
        }

        BookAnalytics {
            total_customers: rows.len(),
            active_loans,
            total_loan_amount,
            amount_received,
            active_loans_received,
            monthly: by_month
                .into_iter()
                .map(|(month, amount)| MonthlyCollection { month, amount })
                .collect(),
        }
    }
}
