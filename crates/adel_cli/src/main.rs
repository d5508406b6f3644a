//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `adel_core` linkage without the Flutter host.
//! - Replay the unread-badge dwell scenario against an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use adel_core::{
    BadgeController, BadgeEvent, KeyValueStore, MemoryKeyValueStore, BADGE_HIDDEN_KEY,
    DEFAULT_DWELL_MS, LAST_SEEN_COUNT_KEY, MESSAGES_VIEW,
};

fn main() {
    println!("adel_core ping={}", adel_core::ping());
    println!("adel_core version={}", adel_core::core_version());

    let store = MemoryKeyValueStore::new();
    let seeded = store.set_many(&[(LAST_SEEN_COUNT_KEY, "3"), (BADGE_HIDDEN_KEY, "true")]);
    if let Err(err) = seeded {
        eprintln!("badge replay skipped: {err}");
        return;
    }

    let mut badge = BadgeController::open(&store, DEFAULT_DWELL_MS);
    let script = [
        (0, BadgeEvent::CountUpdated(5)),
        (1_000, BadgeEvent::ViewFocused(MESSAGES_VIEW.to_string())),
        (1_000 + DEFAULT_DWELL_MS, BadgeEvent::Tick),
        (4_000, BadgeEvent::CountUpdated(5)),
        (5_000, BadgeEvent::CountUpdated(6)),
        (5_000 + DEFAULT_DWELL_MS, BadgeEvent::Tick),
        (8_000, BadgeEvent::ViewFocused("projects".to_string())),
        (9_000, BadgeEvent::CountUpdated(7)),
    ];

    for (now_ms, event) in script {
        let label = format!("{event:?}");
        badge.handle(event, now_ms);
        let snapshot = badge.snapshot();
        println!(
            "t={now_ms} event={label} visible={} count={} last_seen={} dismissed={}",
            snapshot.visible, snapshot.count, snapshot.last_seen_count, snapshot.dismissed
        );
    }
    badge.shutdown();
}
