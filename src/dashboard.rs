use chrono::{DateTime, Duration, Utc};

use crate::errors::Result;
use crate::types::PendingCounts;

/// storage collaborator queries behind the approvals badge
///
/// One independent read-only count per subsystem; the implementations run
/// against whatever store the caller uses. Counts may be stale, the badge
/// is refreshed on the caller's poll cadence.
pub trait PendingCountSource {
    fn pending_members(&self) -> Result<u64>;
    fn pending_savings(&self) -> Result<u64>;
    fn pending_withdrawals(&self) -> Result<u64>;
    fn pending_loans(&self) -> Result<u64>;
    fn pending_loan_payments(&self) -> Result<u64>;
    fn pending_resignations(&self) -> Result<u64>;
}

/// gather pending-item counts for the approvals dashboard
pub fn collect_pending_counts<S: PendingCountSource>(source: &S) -> Result<PendingCounts> {
    Ok(PendingCounts {
        members: source.pending_members()?,
        savings: source.pending_savings()?,
        withdrawals: source.pending_withdrawals()?,
        loans: source.pending_loans()?,
        loan_payments: source.pending_loan_payments()?,
        resignations: source.pending_resignations()?,
    })
}

/// refresh cadence for the badge poll
///
/// Owns the interval and the cancellation flag instead of a bare timer
/// handle: `is_due` answers whether a refresh should run now, and after
/// `cancel` it never fires again.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    last_refresh: Option<DateTime<Utc>>,
    cancelled: bool,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_refresh: None,
            cancelled: false,
        }
    }

    /// check whether a refresh is due at the given instant
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        if self.cancelled {
            return false;
        }
        match self.last_refresh {
            None => true,
            Some(last) => now - last >= self.interval,
        }
    }

    /// record a completed refresh
    pub fn mark_refreshed(&mut self, now: DateTime<Utc>) {
        self.last_refresh = Some(now);
    }

    /// stop the schedule for good; called on teardown
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoanError;
    use chrono::TimeZone;

    struct StubSource {
        loans: u64,
        fail_savings: bool,
    }

    impl PendingCountSource for StubSource {
        fn pending_members(&self) -> Result<u64> {
            Ok(2)
        }

        fn pending_savings(&self) -> Result<u64> {
            if self.fail_savings {
                return Err(LoanError::InvalidInput {
                    message: "savings query failed".to_string(),
                });
            }
            Ok(1)
        }

        fn pending_withdrawals(&self) -> Result<u64> {
            Ok(0)
        }

        fn pending_loans(&self) -> Result<u64> {
            Ok(self.loans)
        }

        fn pending_loan_payments(&self) -> Result<u64> {
            Ok(4)
        }

        fn pending_resignations(&self) -> Result<u64> {
            Ok(1)
        }
    }

    #[test]
    fn test_collect_counts() {
        let source = StubSource {
            loans: 3,
            fail_savings: false,
        };

        let counts = collect_pending_counts(&source).unwrap();
        assert_eq!(counts.loans, 3);
        assert_eq!(counts.total(), 11);
    }

    #[test]
    fn test_query_error_propagates() {
        let source = StubSource {
            loans: 0,
            fail_savings: true,
        };

        assert!(collect_pending_counts(&source).is_err());
    }

    #[test]
    fn test_refresh_schedule_cadence() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut schedule = RefreshSchedule::new(Duration::seconds(30));

        // first poll always fires
        assert!(schedule.is_due(t0));
        schedule.mark_refreshed(t0);

        assert!(!schedule.is_due(t0 + Duration::seconds(10)));
        assert!(schedule.is_due(t0 + Duration::seconds(30)));
    }

    #[test]
    fn test_cancelled_schedule_never_fires() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut schedule = RefreshSchedule::new(Duration::seconds(30));

        schedule.cancel();
        assert!(schedule.is_cancelled());
        assert!(!schedule.is_due(t0));
        assert!(!schedule.is_due(t0 + Duration::days(365)));
    }
}
