//! Unread-message badge visibility controller.
//!
//! # Responsibility
//! - Decide whether the unread badge is shown for the current count.
//! - Dismiss the badge after the user dwells on the messages view.
//! - Persist `{last_seen_count, dismissed}` write-through to a key-value store.
//!
//! # Invariants
//! - A count above `last_seen_count` clears `dismissed` immediately, even while
//!   a dwell is pending.
//! - `dismissed` becomes true only when a dwell fires while the messages view
//!   is still focused; `last_seen_count` is then the count at fire time.
//! - Unfocus, refocus elsewhere and shutdown cancel the pending dwell.
//! - Storage failures never surface; the controller degrades to memory-only.

use crate::badge::dwell::{DwellTicket, DwellTimer};
use crate::store::kv_store::{KeyValueStore, StoreResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// View name whose focus starts the dwell.
pub const MESSAGES_VIEW: &str = "messages";
/// Default time on the messages view before the badge is dismissed.
pub const DEFAULT_DWELL_MS: i64 = 2_000;
/// Storage key for the dismissed flag (`"true"` / `"false"`).
pub const BADGE_HIDDEN_KEY: &str = "admin-messages-badge-hidden";
/// Storage key for the acknowledged unread count (decimal integer).
pub const LAST_SEEN_COUNT_KEY: &str = "admin-last-seen-count";

/// Persisted badge state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadState {
    pub last_seen_count: u32,
    pub dismissed: bool,
}

/// Inputs accepted by `BadgeController::handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeEvent {
    CountUpdated(u32),
    ViewFocused(String),
    ViewUnfocused,
    /// Clock advanced; fires the dwell when due.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    WriteThrough,
    /// Storage failed once; state lives in memory only from then on.
    MemoryOnly,
}

/// Read-only view of the controller for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeSnapshot {
    pub visible: bool,
    pub count: u32,
    pub last_seen_count: u32,
    pub dismissed: bool,
    pub dwell_due_at_ms: Option<i64>,
}

pub struct BadgeController<S: KeyValueStore> {
    store: S,
    persistence: PersistenceMode,
    state: UnreadState,
    current_count: u32,
    focused_view: Option<String>,
    dwell: DwellTimer,
    dwell_ms: i64,
    shut_down: bool,
}

impl<S: KeyValueStore> BadgeController<S> {
    /// Creates a controller and reads persisted state once.
    ///
    /// Unreadable storage yields default state and memory-only mode.
    pub fn open(store: S, dwell_ms: i64) -> Self {
        let (state, persistence) = match load_state(&store) {
            Ok(state) => (state, PersistenceMode::WriteThrough),
            Err(err) => {
                warn!(
                    "event=badge_load module=badge status=degraded error_code=store_read_failed error={}",
                    err
                );
                (UnreadState::default(), PersistenceMode::MemoryOnly)
            }
        };
        debug!(
            "event=badge_load module=badge status=ok last_seen_count={} dismissed={}",
            state.last_seen_count, state.dismissed
        );

        Self {
            store,
            persistence,
            state,
            current_count: 0,
            focused_view: None,
            dwell: DwellTimer::new(),
            dwell_ms: dwell_ms.max(0),
            shut_down: false,
        }
    }

    pub fn state(&self) -> UnreadState {
        self.state
    }

    pub fn current_count(&self) -> u32 {
        self.current_count
    }

    pub fn focused_view(&self) -> Option<&str> {
        self.focused_view.as_deref()
    }

    pub fn pending_dwell(&self) -> Option<DwellTicket> {
        self.dwell.pending()
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        self.persistence
    }

    /// `count > 0 && !dismissed`.
    pub fn is_visible(&self, count: u32) -> bool {
        count > 0 && !self.state.dismissed
    }

    /// Count to render on the badge, if it is shown.
    pub fn visible_count(&self) -> Option<u32> {
        self.is_visible(self.current_count)
            .then_some(self.current_count)
    }

    pub fn snapshot(&self) -> BadgeSnapshot {
        BadgeSnapshot {
            visible: self.is_visible(self.current_count),
            count: self.current_count,
            last_seen_count: self.state.last_seen_count,
            dismissed: self.state.dismissed,
            dwell_due_at_ms: self.dwell.pending().map(|ticket| ticket.due_at_ms),
        }
    }

    /// Dispatches one event at host time `now_ms`.
    pub fn handle(&mut self, event: BadgeEvent, now_ms: i64) {
        match event {
            BadgeEvent::CountUpdated(count) => {
                self.count_updated(count, now_ms);
            }
            BadgeEvent::ViewFocused(view) => {
                self.view_focused(&view, now_ms);
            }
            BadgeEvent::ViewUnfocused => self.view_unfocused(),
            BadgeEvent::Tick => {
                self.advance(now_ms);
            }
        }
    }

    /// Records a new unread count; new messages un-dismiss the badge.
    ///
    /// A changed count while the messages view stays focused re-arms the
    /// dwell, unless one is already pending (a pending dwell keeps its due
    /// time). Returns the newly scheduled ticket, if any.
    pub fn count_updated(&mut self, count: u32, now_ms: i64) -> Option<DwellTicket> {
        if self.shut_down {
            return None;
        }
        let changed = count != self.current_count;
        self.current_count = count;
        if count > self.state.last_seen_count {
            let was_dismissed = self.state.dismissed;
            self.state.dismissed = false;
            self.persist();
            if was_dismissed {
                info!(
                    "event=badge_reshow module=badge status=ok count={} last_seen_count={}",
                    count, self.state.last_seen_count
                );
            }
        }

        let on_messages = self.focused_view.as_deref() == Some(MESSAGES_VIEW);
        if !changed || !on_messages || self.dwell.pending().is_some() {
            return None;
        }
        let ticket = self.dwell.schedule(now_ms, self.dwell_ms);
        debug!(
            "event=badge_dwell module=badge status=rearmed token={} due_at_ms={} count={}",
            ticket.token, ticket.due_at_ms, count
        );
        Some(ticket)
    }

    /// Records focus on `view`; the messages view starts a dwell.
    ///
    /// Returns the dwell ticket for hosts that schedule the callback
    /// themselves (see `dwell_elapsed`).
    pub fn view_focused(&mut self, view: &str, now_ms: i64) -> Option<DwellTicket> {
        if self.shut_down {
            return None;
        }
        let already_on_messages = self.focused_view.as_deref() == Some(MESSAGES_VIEW);
        self.focused_view = Some(view.to_string());

        if view != MESSAGES_VIEW {
            self.cancel_dwell("view_changed");
            return None;
        }
        if already_on_messages {
            if let Some(ticket) = self.dwell.pending() {
                return Some(ticket);
            }
        }

        let ticket = self.dwell.schedule(now_ms, self.dwell_ms);
        debug!(
            "event=badge_dwell module=badge status=scheduled token={} due_at_ms={}",
            ticket.token, ticket.due_at_ms
        );
        Some(ticket)
    }

    pub fn view_unfocused(&mut self) {
        self.focused_view = None;
        self.cancel_dwell("view_unfocused");
    }

    /// Fires the pending dwell if it is due at `now_ms`.
    pub fn advance(&mut self, now_ms: i64) -> bool {
        if self.shut_down {
            return false;
        }
        match self.dwell.take_due(now_ms) {
            Some(ticket) => self.commit_dwell(ticket),
            None => false,
        }
    }

    /// Fires the dwell identified by `token` from an external scheduler.
    ///
    /// Stale or cancelled tokens are ignored.
    pub fn dwell_elapsed(&mut self, token: u64) -> bool {
        if self.shut_down {
            return false;
        }
        match self.dwell.take_token(token) {
            Some(ticket) => self.commit_dwell(ticket),
            None => {
                debug!("event=badge_dwell module=badge status=stale token={token}");
                false
            }
        }
    }

    /// Cancels any pending dwell and stops reacting to further events.
    pub fn shutdown(&mut self) {
        self.cancel_dwell("shutdown");
        self.focused_view = None;
        self.shut_down = true;
    }

    fn commit_dwell(&mut self, ticket: DwellTicket) -> bool {
        if self.focused_view.as_deref() != Some(MESSAGES_VIEW) {
            return false;
        }
        self.state = UnreadState {
            last_seen_count: self.current_count,
            dismissed: true,
        };
        self.persist();
        info!(
            "event=badge_dismiss module=badge status=ok token={} last_seen_count={}",
            ticket.token, self.state.last_seen_count
        );
        true
    }

    fn cancel_dwell(&mut self, reason: &str) {
        if self.dwell.cancel() {
            debug!("event=badge_dwell module=badge status=cancelled reason={reason}");
        }
    }

    fn persist(&mut self) {
        if self.persistence == PersistenceMode::MemoryOnly {
            return;
        }
        let dismissed = if self.state.dismissed { "true" } else { "false" };
        let last_seen = self.state.last_seen_count.to_string();
        let entries = [
            (BADGE_HIDDEN_KEY, dismissed),
            (LAST_SEEN_COUNT_KEY, last_seen.as_str()),
        ];
        if let Err(err) = self.store.set_many(&entries) {
            warn!(
                "event=badge_persist module=badge status=degraded error_code=store_write_failed error={}",
                err
            );
            self.persistence = PersistenceMode::MemoryOnly;
        }
    }
}

impl<S: KeyValueStore> Drop for BadgeController<S> {
    fn drop(&mut self) {
        self.dwell.cancel();
    }
}

/// Reads both keys; a missing or corrupt value falls back to its default.
fn load_state(store: &impl KeyValueStore) -> StoreResult<UnreadState> {
    let dismissed = store.get(BADGE_HIDDEN_KEY)?.as_deref() == Some("true");
    let last_seen_count = match store.get(LAST_SEEN_COUNT_KEY)? {
        Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
            warn!("event=badge_load module=badge status=degraded error_code=corrupt_last_seen_count");
            0
        }),
        None => 0,
    };
    Ok(UnreadState {
        last_seen_count,
        dismissed,
    })
}
