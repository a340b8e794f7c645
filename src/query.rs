use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::customer::Customer;
use crate::decimal::Money;
use crate::types::{LoanStatus, StatusReport};

/// a customer joined with its freshly derived status
pub type CustomerRow = (Customer, StatusReport);

/// loan-amount bands used by the owner dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountBand {
    #[default]
    All,
    /// 50,000 and above
    High,
    /// 25,000 up to 50,000
    Medium,
    /// below 25,000
    Low,
}

impl AmountBand {
    fn matches(&self, amount: Money) -> bool {
        let high = Money::from_major(50_000);
        let medium = Money::from_major(25_000);
        match self {
            AmountBand::All => true,
            AmountBand::High => amount >= high,
            AmountBand::Medium => amount >= medium && amount < high,
            AmountBand::Low => amount < medium,
        }
    }
}

/// loan-age bands, measured from the loan start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    #[default]
    All,
    /// started within the last 30 days
    Recent,
    /// started more than 30 days ago
    Established,
}

impl AgeBand {
    fn matches(&self, start_date: NaiveDate, today: NaiveDate) -> bool {
        let days_since_start = (today - start_date).num_days();
        match self {
            AgeBand::All => true,
            AgeBand::Recent => days_since_start <= 30,
            AgeBand::Established => days_since_start > 30,
        }
    }
}

/// sort orders offered on the customer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    AmountDesc,
    AmountAsc,
    StartDateDesc,
    StartDateAsc,
    /// by the bare days figure, smallest first
    DaysAsc,
}

/// filter parameters for the customer list
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub status: Option<LoanStatus>,
    pub amount: AmountBand,
    pub age: AgeBand,
    /// case-insensitive match on name, phone, or address
    pub search: Option<String>,
}

/// return a fresh filtered and sorted view over the given rows
pub fn filter_customers<'a>(
    rows: &'a [CustomerRow],
    filter: &CustomerFilter,
    sort: SortKey,
    today: NaiveDate,
) -> Vec<&'a CustomerRow> {
    let mut selected: Vec<&CustomerRow> = rows
        .iter()
        .filter(|(customer, report)| {
            if let Some(status) = filter.status {
                if report.status != status {
                    return false;
                }
            }
            if !filter.amount.matches(customer.total_loan_amount) {
                return false;
            }
            if !filter.age.matches(customer.loan_start_date, today) {
                return false;
            }
            if let Some(term) = &filter.search {
                let term = term.to_lowercase();
                if !term.is_empty()
                    && !customer.name.to_lowercase().contains(&term)
                    && !customer.phone.contains(&term)
                    && !customer.address.to_lowercase().contains(&term)
                {
                    return false;
                }
            }
            true
        })
        .collect();

    selected.sort_by(|(a, ra), (b, rb)| match sort {
        SortKey::NameAsc => a.name.cmp(&b.name),
        SortKey::NameDesc => b.name.cmp(&a.name),
        SortKey::AmountDesc => b.total_loan_amount.cmp(&a.total_loan_amount),
        SortKey::AmountAsc => a.total_loan_amount.cmp(&b.total_loan_amount),
        SortKey::StartDateDesc => b.loan_start_date.cmp(&a.loan_start_date),
        SortKey::StartDateAsc => a.loan_start_date.cmp(&b.loan_start_date),
        SortKey::DaysAsc => ra.progress.days().cmp(&rb.progress.days()),
    });

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::status::StatusEngine;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn row(name: &str, phone: &str, amount: i64, started_days_ago: i64, paid: i64) -> CustomerRow {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ));
        let mut customer = Customer::builder()
            .name(name)
            .phone(phone)
            .address("12 Market Road, Chennai")
            .loan_start_date(today() - Duration::days(started_days_ago))
            .total_loan_amount(Money::from_major(amount))
            .build(&LedgerConfig::default(), &time)
            .unwrap();
        if paid > 0 {
            customer.payments.push(crate::customer::Payment::new(
                customer.loan_start_date,
                Money::from_major(paid),
                None,
            ));
        }
        let report = StatusEngine::new(LedgerConfig::default()).derive(&customer, today());
        (customer, report)
    }

    fn sample_rows() -> Vec<CustomerRow> {
        vec![
            // active, high amount, recent
            row("Rajesh Kumar", "9876543210", 60_000, 10, 1_000),
            // pending, medium amount, established
            row("Priya Sharma", "8765432109", 30_000, 120, 1_000),
            // deactivated, low amount
            row("Anil Verma", "7654321098", 10_000, 50, 10_000),
        ]
    }

    #[test]
    fn test_status_filter() {
        let rows = sample_rows();
        let filter = CustomerFilter {
            status: Some(LoanStatus::Pending),
            ..CustomerFilter::default()
        };

        let result = filter_customers(&rows, &filter, SortKey::default(), today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].0.name, "Priya Sharma");
    }

    #[test]
    fn test_amount_bands() {
        let rows = sample_rows();

        let high = CustomerFilter {
            amount: AmountBand::High,
            ..CustomerFilter::default()
        };
        let medium = CustomerFilter {
            amount: AmountBand::Medium,
            ..CustomerFilter::default()
        };
        let low = CustomerFilter {
            amount: AmountBand::Low,
            ..CustomerFilter::default()
        };

        assert_eq!(
            filter_customers(&rows, &high, SortKey::default(), today()).len(),
            1
        );
        assert_eq!(
            filter_customers(&rows, &medium, SortKey::default(), today()).len(),
            1
        );
        assert_eq!(
            filter_customers(&rows, &low, SortKey::default(), today()).len(),
            1
        );
    }

    #[test]
    fn test_age_bands() {
        let rows = sample_rows();
        let recent = CustomerFilter {
            age: AgeBand::Recent,
            ..CustomerFilter::default()
        };

        let result = filter_customers(&rows, &recent, SortKey::default(), today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].0.name, "Rajesh Kumar");
    }

    #[test]
    fn test_search_matches_name_phone_address() {
        let rows = sample_rows();

        let by_name = CustomerFilter {
            search: Some("priya".to_string()),
            ..CustomerFilter::default()
        };
        assert_eq!(
            filter_customers(&rows, &by_name, SortKey::default(), today()).len(),
            1
        );

        let by_phone = CustomerFilter {
            search: Some("76543210".to_string()),
            ..CustomerFilter::default()
        };
        assert_eq!(
            filter_customers(&rows, &by_phone, SortKey::default(), today()).len(),
            2
        );

        let by_address = CustomerFilter {
            search: Some("market road".to_string()),
            ..CustomerFilter::default()
        };
        assert_eq!(
            filter_customers(&rows, &by_address, SortKey::default(), today()).len(),
            3
        );
    }

    #[test]
    fn test_sort_orders() {
        let rows = sample_rows();
        let filter = CustomerFilter::default();

        let by_name = filter_customers(&rows, &filter, SortKey::NameAsc, today());
        assert_eq!(by_name[0].0.name, "Anil Verma");

        let by_amount = filter_customers(&rows, &filter, SortKey::AmountDesc, today());
        assert_eq!(by_amount[0].0.total_loan_amount, Money::from_major(60_000));

        let by_start = filter_customers(&rows, &filter, SortKey::StartDateAsc, today());
        assert_eq!(by_start[0].0.name, "Priya Sharma");

        // completed loans carry a zero days figure and sort first
        let by_days = filter_customers(&rows, &filter, SortKey::DaysAsc, today());
        assert_eq!(by_days[0].0.name, "Anil Verma");
    }

    #[test]
    fn test_filters_compose() {
        let rows = sample_rows();
        let filter = CustomerFilter {
            status: Some(LoanStatus::Active),
            amount: AmountBand::High,
            age: AgeBand::Recent,
            search: Some("rajesh".to_string()),
        };

        let result = filter_customers(&rows, &filter, SortKey::default(), today());
        assert_eq!(result.len(), 1);

        let mismatched = CustomerFilter {
            status: Some(LoanStatus::Active),
            amount: AmountBand::Low,
            ..CustomerFilter::default()
        };
        assert!(filter_customers(&rows, &mismatched, SortKey::default(), today()).is_empty());
    }
}
