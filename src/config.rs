use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{LoanStatus, MemberId};

/// loan term reference data: tenor plus annual rate
///
/// Owned by configuration; the loan subsystem only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerm {
    pub tenor_months: u32,
    pub annual_rate: Rate,
}

impl LoanTerm {
    pub fn new(tenor_months: u32, annual_rate: Rate) -> Self {
        Self {
            tenor_months,
            annual_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tenor_months == 0 {
            return Err(LoanError::InvalidInput {
                message: "tenor must be at least one month".to_string(),
            });
        }
        if self.annual_rate.is_negative() {
            return Err(LoanError::InvalidInput {
                message: format!("annual rate must not be negative: {}", self.annual_rate),
            });
        }
        Ok(())
    }
}

/// filter over loan applications
///
/// Every field is optional; an unset field matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
    pub member_id: Option<MemberId>,
    pub loan_type_id: Option<Uuid>,
    pub submitted_after: Option<DateTime<Utc>>,
    pub submitted_before: Option<DateTime<Utc>>,
    pub min_principal: Option<Money>,
    pub max_principal: Option<Money>,
}

impl LoanFilter {
    pub fn matches(&self, loan: &crate::loan::LoanApplication) -> bool {
        if self.status.map_or(false, |s| s != loan.status) {
            return false;
        }
        if self.member_id.map_or(false, |m| m != loan.member_id) {
            return false;
        }
        if self.loan_type_id.map_or(false, |t| t != loan.loan_type_id) {
            return false;
        }
        if self.submitted_after.map_or(false, |d| loan.submitted_date < d) {
            return false;
        }
        if self.submitted_before.map_or(false, |d| loan.submitted_date > d) {
            return false;
        }
        if self.min_principal.map_or(false, |p| loan.principal < p) {
            return false;
        }
        if self.max_principal.map_or(false, |p| loan.principal > p) {
            return false;
        }
        true
    }
}

/// filter over member records held by the storage collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberFilter {
    pub name_contains: Option<String>,
    pub registered_after: Option<DateTime<Utc>>,
    pub registered_before: Option<DateTime<Utc>>,
    pub active_only: bool,
}

/// filter over journal entries held by the accounting collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalFilter {
    pub account_code: Option<String>,
    pub posted_after: Option<DateTime<Utc>>,
    pub posted_before: Option<DateTime<Utc>>,
    pub reference_loan: Option<crate::types::LoanId>,
}
