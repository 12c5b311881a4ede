use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LoanTerm;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::ledger::InstallmentLedger;
use crate::schedule::{AmortizationSchedule, ScheduledInstallment};
use crate::types::{
    InstallmentStatus, LoanId, LoanStatus, LoanSummary, MemberId, PaymentId, Role,
};

/// a member's loan application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: LoanId,
    pub member_id: MemberId,
    pub loan_type_id: Uuid,
    pub term: LoanTerm,
    pub principal: Money,
    pub submitted_date: DateTime<Utc>,
    pub status: LoanStatus,
}

impl LoanApplication {
    /// submit a new application; it starts in Pending
    ///
    /// A rejected loan is never reopened: resubmission means calling this
    /// again for a fresh application with its own id.
    pub fn submit(
        member_id: MemberId,
        loan_type_id: Uuid,
        term: LoanTerm,
        principal: Money,
        submitted_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            loan_type_id,
            term,
            principal,
            submitted_date,
            status: LoanStatus::Pending,
        }
    }
}

/// one month's installment row, materialized at approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: DateTime<Utc>,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub total_due: Money,
    pub status: InstallmentStatus,
    pub payment_id: Option<PaymentId>,
}

impl Installment {
    pub fn from_scheduled(scheduled: &ScheduledInstallment) -> Self {
        Self {
            number: scheduled.number,
            due_date: scheduled.due_date,
            principal_portion: scheduled.principal_portion,
            interest_portion: scheduled.interest_portion,
            total_due: scheduled.total_due,
            status: InstallmentStatus::Unpaid,
            payment_id: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }
}

/// a recorded installment payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    pub installment_number: u32,
    pub amount_paid: Money,
    pub payment_date: DateTime<Utc>,
}

/// loan aggregate: application, schedule, installments, payments
///
/// The caller serializes access per loan and wraps each mutating call plus
/// its drained events in one storage transaction.
pub struct LoanAccount {
    pub application: LoanApplication,
    pub schedule: Option<AmortizationSchedule>,
    pub installments: Vec<Installment>,
    pub payments: Vec<Payment>,
    pub events: EventStore,
}

impl LoanAccount {
    pub fn new(application: LoanApplication) -> Self {
        Self {
            application,
            schedule: None,
            installments: Vec::new(),
            payments: Vec::new(),
            events: EventStore::new(),
        }
    }

    pub fn id(&self) -> LoanId {
        self.application.id
    }

    pub fn status(&self) -> LoanStatus {
        self.application.status
    }

    pub fn tenor(&self) -> u32 {
        self.application.term.tenor_months
    }

    /// check if every installment is paid
    pub fn fully_paid(&self) -> bool {
        !self.installments.is_empty() && self.installments.iter().all(Installment::is_paid)
    }

    pub fn installment(&self, number: u32) -> Option<&Installment> {
        self.installments.iter().find(|i| i.number == number)
    }

    pub(crate) fn installment_mut(&mut self, number: u32) -> Option<&mut Installment> {
        self.installments.iter_mut().find(|i| i.number == number)
    }

    /// apply a role-gated status transition
    pub fn transition(
        &mut self,
        target: LoanStatus,
        acting_role: Role,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        crate::approval::transition(self, target, acting_role, time_provider)
    }

    /// record a payment against one unpaid installment
    pub fn record_payment(
        &mut self,
        installment_number: u32,
        amount: Money,
        payment_date: DateTime<Utc>,
    ) -> Result<Payment> {
        InstallmentLedger::record_payment(self, installment_number, amount, payment_date)
    }

    /// record a payment stamped with system time
    pub fn record_payment_now(&mut self, installment_number: u32, amount: Money) -> Result<Payment> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        let now = time.now();
        InstallmentLedger::record_payment(self, installment_number, amount, now)
    }

    /// cancel a recorded payment, reverting its installment
    pub fn cancel_payment(
        &mut self,
        payment_id: PaymentId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        InstallmentLedger::cancel_payment(self, payment_id, time_provider.now())
    }

    /// live repayment position
    pub fn summary(&self) -> LoanSummary {
        InstallmentLedger::summary(self)
    }

    /// drain events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// serializable snapshot for the storage collaborator
    pub fn snapshot(&self) -> LoanSnapshot {
        LoanSnapshot {
            application: self.application.clone(),
            schedule: self.schedule.clone(),
            installments: self.installments.clone(),
            payments: self.payments.clone(),
        }
    }

    /// restore an aggregate from a stored snapshot
    ///
    /// The event store starts empty: events belong to the transaction that
    /// produced them, not to the snapshot.
    pub fn from_snapshot(snapshot: LoanSnapshot) -> Self {
        Self {
            application: snapshot.application,
            schedule: snapshot.schedule,
            installments: snapshot.installments,
            payments: snapshot.payments,
            events: EventStore::new(),
        }
    }
}

/// persistent view of a loan aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSnapshot {
    pub application: LoanApplication,
    pub schedule: Option<AmortizationSchedule>,
    pub installments: Vec<Installment>,
    pub payments: Vec<Payment>,
}

impl LoanSnapshot {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;

    fn submitted() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn account() -> LoanAccount {
        LoanAccount::new(LoanApplication::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            LoanTerm::new(6, Rate::from_percentage(12)),
            Money::from_major(6_000_000),
            submitted(),
        ))
    }

    #[test]
    fn test_new_account_is_pending_and_empty() {
        let account = account();
        assert_eq!(account.status(), LoanStatus::Pending);
        assert!(account.schedule.is_none());
        assert!(account.installments.is_empty());
        assert!(!account.fully_paid());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let time = SafeTimeProvider::new(TimeSource::Test(submitted()));
        let mut account = account();
        account
            .transition(LoanStatus::ApprovedByAccounting, Role::Akunting, &time)
            .unwrap();
        account
            .transition(LoanStatus::Approved, Role::Manager, &time)
            .unwrap();
        account
            .record_payment(1, Money::from_major(1_060_000), time.now())
            .unwrap();

        let json = account.snapshot().to_json_pretty().unwrap();
        let restored = LoanAccount::from_snapshot(LoanSnapshot::from_json(&json).unwrap());

        assert_eq!(restored.application, account.application);
        assert_eq!(restored.installments, account.installments);
        assert_eq!(restored.payments, account.payments);
        assert!(restored.events.events().is_empty());
    }
}
