use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan application
pub type LoanId = Uuid;

/// unique identifier for an installment payment
pub type PaymentId = Uuid;

/// unique identifier for a cooperative member
pub type MemberId = Uuid;

/// acting role supplied by the authentication collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Akunting,
    Manager,
    Member,
}

/// loan application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// submitted, waiting for accounting review
    Pending,
    /// passed accounting review, waiting for manager finalization
    ApprovedByAccounting,
    /// finalized and disbursed, installments due
    Approved,
    /// turned down at either review stage
    Rejected,
    /// every installment paid off
    Lunas,
}

impl LoanStatus {
    /// check if no further transition can leave this status
    ///
    /// Lunas is settled but not terminal: cancelling the closing payment
    /// moves the loan back to Approved.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Rejected)
    }

    /// check if installment payments may be recorded
    pub fn accepts_payment(&self) -> bool {
        matches!(self, LoanStatus::Approved)
    }
}

/// per-installment payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    Unpaid,
    Paid,
}

/// live repayment position of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_paid: Money,
    pub remaining_principal: Money,
    pub next_due_installment: Option<u32>,
}

/// pending-item counts across subsystems for the approvals badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PendingCounts {
    pub members: u64,
    pub savings: u64,
    pub withdrawals: u64,
    pub loans: u64,
    pub loan_payments: u64,
    pub resignations: u64,
}

impl PendingCounts {
    pub fn total(&self) -> u64 {
        self.members
            + self.savings
            + self.withdrawals
            + self.loans
            + self.loan_payments
            + self.resignations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_status() {
        assert!(LoanStatus::Rejected.is_terminal());
        assert!(!LoanStatus::Lunas.is_terminal());
        assert!(!LoanStatus::Pending.is_terminal());
    }

    #[test]
    fn test_only_approved_accepts_payment() {
        assert!(LoanStatus::Approved.accepts_payment());
        assert!(!LoanStatus::Pending.accepts_payment());
        assert!(!LoanStatus::ApprovedByAccounting.accepts_payment());
        assert!(!LoanStatus::Lunas.accepts_payment());
    }

    #[test]
    fn test_badge_total() {
        let counts = PendingCounts {
            members: 2,
            savings: 1,
            withdrawals: 0,
            loans: 3,
            loan_payments: 4,
            resignations: 1,
        };
        assert_eq!(counts.total(), 11);
    }
}
