use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LoanTerm;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// one scheduled installment in a repayment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub number: u32,
    pub due_date: DateTime<Utc>,
    pub beginning_balance: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub total_due: Money,
    pub ending_balance: Money,
}

/// flat-principal repayment schedule with interest on the declining balance
///
/// Principal repayment is equal each month; interest is charged on the
/// balance outstanding before the installment, so the total due declines
/// over the tenor. The same projection backs both the commitment-letter
/// preview and the installment rows materialized at approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub term: LoanTerm,
    pub start_date: DateTime<Utc>,
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
    pub total_repayment: Money,
}

impl AmortizationSchedule {
    /// generate the repayment schedule
    ///
    /// Deterministic and side-effect free; safe to call repeatedly for
    /// previews before anything is persisted.
    pub fn generate(principal: Money, term: LoanTerm, start_date: DateTime<Utc>) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LoanError::InvalidInput {
                message: format!("principal must be positive: {principal}"),
            });
        }
        term.validate()?;

        let monthly_rate = term.annual_rate.monthly_rate();
        let installments = build_installments(principal, term.tenor_months, monthly_rate, start_date);

        let total_interest = installments.iter().map(|i| i.interest_portion).sum();
        let total_repayment = installments.iter().map(|i| i.total_due).sum();

        Ok(Self {
            principal,
            term,
            start_date,
            installments,
            total_interest,
            total_repayment,
        })
    }

    /// get the scheduled installment for a month number (1-based)
    pub fn installment(&self, number: u32) -> Option<&ScheduledInstallment> {
        if number == 0 {
            return None;
        }
        self.installments.get((number - 1) as usize)
    }

    /// balance outstanding after an installment is paid
    pub fn balance_after(&self, number: u32) -> Money {
        self.installment(number)
            .map(|i| i.ending_balance)
            .unwrap_or(self.principal)
    }
}

fn build_installments(
    principal: Money,
    tenor_months: u32,
    monthly_rate: Rate,
    start_date: DateTime<Utc>,
) -> Vec<ScheduledInstallment> {
    // equal principal portions; the final one absorbs the rounding
    // remainder so the portions sum to the principal exactly
    let flat_principal = principal / rust_decimal::Decimal::from(tenor_months);
    let last_principal =
        principal - flat_principal * rust_decimal::Decimal::from(tenor_months - 1);

    let mut installments = Vec::with_capacity(tenor_months as usize);
    let mut balance = principal;

    for number in 1..=tenor_months {
        let principal_portion = if number == tenor_months {
            last_principal
        } else {
            flat_principal
        };
        let interest_portion = balance * monthly_rate.as_decimal();
        let ending_balance = balance - principal_portion;

        installments.push(ScheduledInstallment {
            number,
            due_date: add_months(start_date, number),
            beginning_balance: balance,
            principal_portion,
            interest_portion,
            total_due: principal_portion + interest_portion,
            ending_balance,
        });

        balance = ending_balance;
    }

    installments
}

/// add calendar months to a date, clamping to the end of shorter months
fn add_months(date: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}
