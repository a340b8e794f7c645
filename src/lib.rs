pub mod analytics;
pub mod book;
pub mod config;
pub mod customer;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod lifecycle;
pub mod query;
pub mod status;
pub mod store;
pub mod types;
pub mod view;

// re-export key types
pub use analytics::{BookAnalytics, MonthlyCollection};
pub use book::{LoanBook, NewCustomer, TermsUpdate};
pub use config::LedgerConfig;
pub use customer::{parse_date, Customer, CustomerBuilder, Payment};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ledger::{PaymentLedger, PaymentReceipt};
pub use lifecycle::LifecycleGuard;
pub use query::{filter_customers, AgeBand, AmountBand, CustomerFilter, CustomerRow, SortKey};
pub use status::StatusEngine;
pub use store::{CustomerStore, MemoryStore};
pub use types::{
    CustomerId, LoanStatus, PaymentId, RepaymentProgress, StatusReport,
};
pub use view::{CustomerView, PaymentEntryView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
