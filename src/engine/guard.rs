// DocChat Engine — Pending-Request Guard
//
// Two states, Idle and Awaiting. `begin` arms a fixed deadline, a reply
// resolves it, and `expire` fires only once the deadline has passed while
// still awaiting. Expiry never cancels the turn: a late reply is still
// accepted by the chat controller.

use crate::atoms::constants::RESPONSE_TIMEOUT;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingGuard {
    #[default]
    Idle,
    Awaiting { deadline: Instant },
}

impl PendingGuard {
    /// Arm (or re-arm) the timer for a turn sent at `now`.
    pub fn begin(&mut self, now: Instant) {
        *self = PendingGuard::Awaiting { deadline: now + RESPONSE_TIMEOUT };
    }

    /// A reply arrived. Returns true if a turn was still awaited.
    pub fn resolve(&mut self) -> bool {
        let was_awaiting = self.is_awaiting();
        *self = PendingGuard::Idle;
        was_awaiting
    }

    /// Returns true exactly once per armed turn, when `now` reaches the deadline.
    pub fn expire(&mut self, now: Instant) -> bool {
        match *self {
            PendingGuard::Awaiting { deadline } if now >= deadline => {
                *self = PendingGuard::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, PendingGuard::Awaiting { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            PendingGuard::Awaiting { deadline } => Some(*deadline),
            PendingGuard::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn begin_arms_ten_second_deadline() {
        let t0 = Instant::now();
        let mut guard = PendingGuard::default();
        guard.begin(t0);
        assert_eq!(guard.deadline(), Some(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn expire_before_deadline_is_noop() {
        let t0 = Instant::now();
        let mut guard = PendingGuard::default();
        guard.begin(t0);
        assert!(!guard.expire(t0 + Duration::from_secs(9)));
        assert!(guard.is_awaiting());
    }

    #[test]
    fn expire_fires_once() {
        let t0 = Instant::now();
        let mut guard = PendingGuard::default();
        guard.begin(t0);
        assert!(guard.expire(t0 + Duration::from_secs(10)));
        assert!(!guard.expire(t0 + Duration::from_secs(11)));
        assert_eq!(guard, PendingGuard::Idle);
    }

    #[test]
    fn reply_before_deadline_prevents_expiry() {
        let t0 = Instant::now();
        let mut guard = PendingGuard::default();
        guard.begin(t0);
        assert!(guard.resolve());
        assert!(!guard.expire(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn resolve_when_idle_reports_late_reply() {
        let mut guard = PendingGuard::default();
        assert!(!guard.resolve());
    }

    #[test]
    fn second_send_rearms() {
        let t0 = Instant::now();
        let mut guard = PendingGuard::default();
        guard.begin(t0);
        guard.begin(t0 + Duration::from_secs(8));
        assert!(!guard.expire(t0 + Duration::from_secs(12)));
        assert!(guard.expire(t0 + Duration::from_secs(18)));
    }
}
