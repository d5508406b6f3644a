//! Cancellable one-shot dwell timer.
//!
//! The timer holds at most one pending ticket. Each schedule hands out a new
//! token; a fire request only succeeds for the token currently pending, so a
//! late callback from an external scheduler cannot act on a cancelled timer.

/// Handle for one scheduled dwell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellTicket {
    pub token: u64,
    /// Epoch milliseconds at which the dwell elapses.
    pub due_at_ms: i64,
}

#[derive(Debug, Default)]
pub struct DwellTimer {
    pending: Option<DwellTicket>,
    last_token: u64,
}

impl DwellTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a dwell, replacing any pending one.
    pub fn schedule(&mut self, now_ms: i64, duration_ms: i64) -> DwellTicket {
        self.last_token += 1;
        let ticket = DwellTicket {
            token: self.last_token,
            due_at_ms: now_ms.saturating_add(duration_ms.max(0)),
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Cancels the pending dwell. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<DwellTicket> {
        self.pending
    }

    /// Consumes the pending ticket when its deadline has been reached.
    pub fn take_due(&mut self, now_ms: i64) -> Option<DwellTicket> {
        match self.pending {
            Some(ticket) if now_ms >= ticket.due_at_ms => self.pending.take(),
            _ => None,
        }
    }

    /// Consumes the pending ticket when `token` still identifies it.
    pub fn take_token(&mut self, token: u64) -> Option<DwellTicket> {
        match self.pending {
            Some(ticket) if ticket.token == token => self.pending.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DwellTimer;

    #[test]
    fn cancel_is_idempotent() {
        let mut timer = DwellTimer::new();
        timer.schedule(0, 2_000);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.take_due(10_000), None);
    }

    #[test]
    fn stale_token_does_not_fire_rescheduled_timer() {
        let mut timer = DwellTimer::new();
        let first = timer.schedule(0, 2_000);
        let second = timer.schedule(500, 2_000);
        assert_eq!(timer.take_token(first.token), None);
        assert_eq!(timer.take_token(second.token), Some(second));
    }

    #[test]
    fn take_due_waits_for_deadline() {
        let mut timer = DwellTimer::new();
        let ticket = timer.schedule(1_000, 2_000);
        assert_eq!(timer.take_due(2_999), None);
        assert_eq!(timer.take_due(3_000), Some(ticket));
        assert_eq!(timer.pending(), None);
    }
}
