pub mod approval;
pub mod config;
pub mod dashboard;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod loan;
pub mod schedule;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use config::{JournalFilter, LoanFilter, LoanTerm, MemberFilter};
pub use dashboard::{collect_pending_counts, PendingCountSource, RefreshSchedule};
pub use ledger::InstallmentLedger;
pub use loan::{Installment, LoanAccount, LoanApplication, LoanSnapshot, Payment};
pub use schedule::{AmortizationSchedule, ScheduledInstallment};
pub use types::{
    InstallmentStatus, LoanId, LoanStatus, LoanSummary, MemberId, PaymentId, PendingCounts, Role,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
