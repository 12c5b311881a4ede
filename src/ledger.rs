use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::Event;
use crate::loan::{LoanAccount, Payment};
use crate::types::{InstallmentStatus, LoanStatus, LoanSummary, PaymentId};

/// installment payment processor
///
/// Stateless: every operation works on the loan aggregate the caller holds
/// inside its transaction. Recording the closing payment and the Lunas flip
/// happen in the same call, as do cancellation and the status reversion, so
/// the caller's transaction commits or rolls back both together.
pub struct InstallmentLedger;

impl InstallmentLedger {
    /// record a payment for one unpaid installment
    pub fn record_payment(
        account: &mut LoanAccount,
        installment_number: u32,
        amount: Money,
        payment_date: DateTime<Utc>,
    ) -> Result<Payment> {
        let status = account.status();
        if !status.accepts_payment() {
            return Err(LoanError::LoanNotPayable { status });
        }

        if !amount.is_positive() {
            return Err(LoanError::InvalidInput {
                message: format!("payment amount must be positive: {amount}"),
            });
        }

        let tenor = account.tenor();
        let loan_id = account.id();
        let payment_id = Uuid::new_v4();

        let installment = account.installment_mut(installment_number).ok_or(
            LoanError::InstallmentNotFound {
                installment_number,
                tenor,
            },
        )?;

        if installment.is_paid() {
            return Err(LoanError::AlreadyPaid { installment_number });
        }

        installment.status = InstallmentStatus::Paid;
        installment.payment_id = Some(payment_id);
        let principal_portion = installment.principal_portion;
        let interest_portion = installment.interest_portion;

        let payment = Payment {
            id: payment_id,
            loan_id,
            installment_number,
            amount_paid: amount,
            payment_date,
        };
        account.payments.push(payment.clone());

        account.events.emit(Event::PaymentRecorded {
            loan_id,
            payment_id,
            installment_number,
            amount,
            principal_portion,
            interest_portion,
            timestamp: payment_date,
        });

        if account.fully_paid() {
            crate::approval::settle(account, payment_date);
            account.events.emit(Event::LoanSettled {
                loan_id,
                total_paid: account.payments.iter().map(|p| p.amount_paid).sum(),
                timestamp: payment_date,
            });
        }

        Ok(payment)
    }

    /// cancel a recorded payment and revert its installment
    ///
    /// Emits PaymentCancelled for the journal/inventory collaborator to
    /// reverse its entries. A settled loan un-settles back to Approved.
    pub fn cancel_payment(
        account: &mut LoanAccount,
        payment_id: PaymentId,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let position = account
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or(LoanError::PaymentNotFound { payment_id })?;
        let payment = account.payments.remove(position);

        let tenor = account.tenor();
        let installment = account.installment_mut(payment.installment_number).ok_or(
            LoanError::InstallmentNotFound {
                installment_number: payment.installment_number,
                tenor,
            },
        )?;

        installment.status = InstallmentStatus::Unpaid;
        installment.payment_id = None;

        account.events.emit(Event::PaymentCancelled {
            loan_id: account.id(),
            payment_id,
            installment_number: payment.installment_number,
            amount: payment.amount_paid,
            installment_status: InstallmentStatus::Unpaid,
            timestamp,
        });

        if account.status() == LoanStatus::Lunas {
            crate::approval::reopen(account, timestamp);
            account.events.emit(Event::SettlementReversed {
                loan_id: account.id(),
                cause_payment_id: payment_id,
                timestamp,
            });
        }

        Ok(())
    }

    /// live repayment position; pure read
    pub fn summary(account: &LoanAccount) -> LoanSummary {
        let total_paid = account.payments.iter().map(|p| p.amount_paid).sum();

        let principal_paid: Money = account
            .installments
            .iter()
            .filter(|i| i.is_paid())
            .map(|i| i.principal_portion)
            .sum();

        let next_due_installment = account
            .installments
            .iter()
            .filter(|i| !i.is_paid())
            .map(|i| i.number)
            .min();

        LoanSummary {
            total_paid,
            remaining_principal: account.application.principal - principal_paid,
            next_due_installment,
        }
    }
}
