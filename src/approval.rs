use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::errors::{LoanError, Result};
use crate::events::Event;
use crate::loan::{Installment, LoanAccount};
use crate::schedule::AmortizationSchedule;
use crate::types::{LoanStatus, Role};

/// role-gated status graph
///
/// Edges not listed do not exist; requesting one fails as an invalid
/// transition, which also makes a retried approval a clean rejection
/// instead of a double-application. Approved -> Lunas carries no roles:
/// settlement is driven by the ledger when the last installment is paid,
/// never by an external request.
const TRANSITIONS: &[(LoanStatus, LoanStatus, &[Role])] = &[
    (
        LoanStatus::Pending,
        LoanStatus::ApprovedByAccounting,
        &[Role::Admin, Role::Akunting],
    ),
    (
        LoanStatus::Pending,
        LoanStatus::Rejected,
        &[Role::Admin, Role::Akunting],
    ),
    (
        LoanStatus::ApprovedByAccounting,
        LoanStatus::Approved,
        &[Role::Admin, Role::Manager],
    ),
    (
        LoanStatus::ApprovedByAccounting,
        LoanStatus::Rejected,
        &[Role::Admin, Role::Manager],
    ),
    (LoanStatus::Approved, LoanStatus::Lunas, &[]),
];

/// roles allowed to drive an edge, if the edge exists at all
pub fn allowed_roles(from: LoanStatus, to: LoanStatus) -> Option<&'static [Role]> {
    TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, roles)| *roles)
}

/// apply a role-gated status transition to a loan
///
/// Entering Approved materializes the installment rows from the same
/// schedule generation the preview path uses; the rows are only created if
/// none exist yet, so re-approval can never duplicate them. Entering
/// Rejected discards any schedule: a rejected loan is never disbursed.
pub fn transition(
    account: &mut LoanAccount,
    target: LoanStatus,
    acting_role: Role,
    time_provider: &SafeTimeProvider,
) -> Result<()> {
    let current = account.status();

    let roles = allowed_roles(current, target).ok_or(LoanError::InvalidTransition {
        from: current,
        to: target,
    })?;

    if !roles.contains(&acting_role) {
        return Err(LoanError::UnauthorizedTransition {
            from: current,
            to: target,
            role: acting_role,
        });
    }

    let now = time_provider.now();

    if target == LoanStatus::Approved {
        materialize_schedule(account, now)?;
    }
    if target == LoanStatus::Rejected {
        discard_schedule(account, now);
    }

    apply_status(account, target, Some(acting_role), now);
    Ok(())
}

/// mark an approved loan settled; ledger-internal, last installment paid
pub(crate) fn settle(account: &mut LoanAccount, timestamp: DateTime<Utc>) {
    apply_status(account, LoanStatus::Lunas, None, timestamp);
}

/// revert a settled loan to approved; ledger-internal, payment cancelled
pub(crate) fn reopen(account: &mut LoanAccount, timestamp: DateTime<Utc>) {
    apply_status(account, LoanStatus::Approved, None, timestamp);
}

fn apply_status(
    account: &mut LoanAccount,
    new_status: LoanStatus,
    acting_role: Option<Role>,
    timestamp: DateTime<Utc>,
) {
    let old_status = account.status();
    account.application.status = new_status;
    account.events.emit(Event::StatusChanged {
        loan_id: account.id(),
        old_status,
        new_status,
        acting_role,
        timestamp,
    });
}

fn materialize_schedule(account: &mut LoanAccount, start_date: DateTime<Utc>) -> Result<()> {
    if !account.installments.is_empty() {
        return Ok(());
    }

    let schedule = AmortizationSchedule::generate(
        account.application.principal,
        account.application.term,
        start_date,
    )?;

    account.installments = schedule
        .installments
        .iter()
        .map(Installment::from_scheduled)
        .collect();

    account.events.emit(Event::ScheduleGenerated {
        loan_id: account.id(),
        installment_count: schedule.term.tenor_months,
        total_repayment: schedule.total_repayment,
        timestamp: start_date,
    });

    account.schedule = Some(schedule);
    Ok(())
}

fn discard_schedule(account: &mut LoanAccount, timestamp: DateTime<Utc>) {
    if account.schedule.is_none() && account.installments.is_empty() {
        return;
    }

    account.schedule = None;
    account.installments.clear();
    account.events.emit(Event::ScheduleDiscarded {
        loan_id: account.id(),
        timestamp,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoanTerm;
    use crate::decimal::{Money, Rate};
    use crate::loan::LoanApplication;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn pending_account() -> LoanAccount {
        LoanAccount::new(LoanApplication::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            LoanTerm::new(12, Rate::from_percentage(12)),
            Money::from_major(12_000_000),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        ))
    }

    fn approved_account() -> LoanAccount {
        let time = time();
        let mut account = pending_account();
        transition(
            &mut account,
            LoanStatus::ApprovedByAccounting,
            Role::Akunting,
            &time,
        )
        .unwrap();
        transition(&mut account, LoanStatus::Approved, Role::Manager, &time).unwrap();
        account
    }

    #[test]
    fn test_full_approval_path() {
        let account = approved_account();
        assert_eq!(account.status(), LoanStatus::Approved);
        assert_eq!(account.installments.len(), 12);
        assert!(account.schedule.is_some());
    }

    #[test]
    fn test_approval_emits_schedule_event() {
        let mut account = approved_account();
        let events = account.take_events();

        assert!(events.iter().any(|e| matches!(
            e,
            Event::ScheduleGenerated {
                installment_count: 12,
                ..
            }
        )));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Event::StatusChanged { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_stage_skip_is_invalid() {
        let time = time();
        let mut account = pending_account();

        let result = transition(&mut account, LoanStatus::Approved, Role::Admin, &time);
        assert!(matches!(result, Err(LoanError::InvalidTransition { .. })));
        assert_eq!(account.status(), LoanStatus::Pending);
    }

    #[test]
    fn test_repeated_approval_is_cleanly_rejected() {
        let time = time();
        let mut account = approved_account();

        let result = transition(&mut account, LoanStatus::Approved, Role::Manager, &time);
        assert!(matches!(result, Err(LoanError::InvalidTransition { .. })));
        assert_eq!(account.installments.len(), 12);
    }

    #[test]
    fn test_member_is_always_unauthorized() {
        let time = time();
        let mut account = pending_account();

        for target in [LoanStatus::ApprovedByAccounting, LoanStatus::Rejected] {
            let result = transition(&mut account, target, Role::Member, &time);
            assert!(matches!(
                result,
                Err(LoanError::UnauthorizedTransition { .. })
            ));
        }
        assert_eq!(account.status(), LoanStatus::Pending);
    }

    #[test]
    fn test_akunting_cannot_finalize() {
        let time = time();
        let mut account = pending_account();
        transition(
            &mut account,
            LoanStatus::ApprovedByAccounting,
            Role::Akunting,
            &time,
        )
        .unwrap();

        let result = transition(&mut account, LoanStatus::Approved, Role::Akunting, &time);
        assert!(matches!(
            result,
            Err(LoanError::UnauthorizedTransition { .. })
        ));

        // admin may finalize in the manager's place
        transition(&mut account, LoanStatus::Approved, Role::Admin, &time).unwrap();
        assert_eq!(account.status(), LoanStatus::Approved);
    }

    #[test]
    fn test_lunas_cannot_be_requested_externally() {
        let time = time();
        let mut account = approved_account();

        for role in [Role::Admin, Role::Akunting, Role::Manager, Role::Member] {
            let result = transition(&mut account, LoanStatus::Lunas, role, &time);
            assert!(matches!(
                result,
                Err(LoanError::UnauthorizedTransition { .. })
            ));
        }
    }

    #[test]
    fn test_rejection_is_terminal() {
        let time = time();
        let mut account = pending_account();
        transition(&mut account, LoanStatus::Rejected, Role::Admin, &time).unwrap();

        for target in [
            LoanStatus::Pending,
            LoanStatus::ApprovedByAccounting,
            LoanStatus::Approved,
            LoanStatus::Lunas,
        ] {
            let result = transition(&mut account, target, Role::Admin, &time);
            assert!(matches!(result, Err(LoanError::InvalidTransition { .. })));
        }
    }

    #[test]
    fn test_manager_rejection_leaves_no_schedule() {
        let time = time();
        let mut account = pending_account();
        transition(
            &mut account,
            LoanStatus::ApprovedByAccounting,
            Role::Admin,
            &time,
        )
        .unwrap();
        transition(&mut account, LoanStatus::Rejected, Role::Manager, &time).unwrap();

        assert_eq!(account.status(), LoanStatus::Rejected);
        assert!(account.schedule.is_none());
        assert!(account.installments.is_empty());
    }

    #[test]
    fn test_materialization_uses_approval_date() {
        let account = approved_account();
        let schedule = account.schedule.as_ref().unwrap();

        // first due date one month after the manager finalized
        assert_eq!(
            schedule.installments[0].due_date,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }
}
