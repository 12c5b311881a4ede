use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InstallmentStatus, LoanId, LoanStatus, PaymentId, Role};

/// all events emitted by loan operations
///
/// The caller drains these inside its transaction boundary. PaymentRecorded
/// and PaymentCancelled are the subscription points for the journal and
/// inventory collaborator: a cancellation must reverse the journal entry and
/// stock adjustment created for the matching recorded payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        acting_role: Option<Role>,
        timestamp: DateTime<Utc>,
    },
    ScheduleGenerated {
        loan_id: LoanId,
        installment_count: u32,
        total_repayment: Money,
        timestamp: DateTime<Utc>,
    },
    ScheduleDiscarded {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    SettlementReversed {
        loan_id: LoanId,
        cause_payment_id: PaymentId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        loan_id: LoanId,
        payment_id: PaymentId,
        installment_number: u32,
        amount: Money,
        principal_portion: Money,
        interest_portion: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentCancelled {
        loan_id: LoanId,
        payment_id: PaymentId,
        installment_number: u32,
        amount: Money,
        installment_status: InstallmentStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
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

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_events_empties_store() {
        let mut store = EventStore::new();
        store.emit(Event::ScheduleDiscarded {
            loan_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        });

        assert_eq!(store.events().len(), 1);
        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }
}
