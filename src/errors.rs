use thiserror::Error;
use uuid::Uuid;

use crate::types::{LoanStatus, Role};

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("role {role:?} may not move a loan from {from:?} to {to:?}")]
    UnauthorizedTransition {
        from: LoanStatus,
        to: LoanStatus,
        role: Role,
    },

    #[error("no transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: LoanStatus,
        to: LoanStatus,
    },

    #[error("installment {installment_number} is already paid")]
    AlreadyPaid {
        installment_number: u32,
    },

    #[error("loan not payable: current status is {status:?}")]
    LoanNotPayable {
        status: LoanStatus,
    },

    #[error("installment {installment_number} not found: loan has {tenor} installments")]
    InstallmentNotFound {
        installment_number: u32,
        tenor: u32,
    },

    #[error("payment not found: {payment_id}")]
    PaymentNotFound {
        payment_id: Uuid,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
