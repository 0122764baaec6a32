//! Short-lived duplicate suppression for action submissions.
//!
//! A scanner bounce or a double tap can fire the same request twice before the
//! database write from the first one is reflected in the page the station is
//! looking at. This window remembers (attendee, action, day) for ten seconds
//! after an accepted action so the second submission is refused locally.
//!
//! Per-process state only. The persisted flag plus the conditional UPDATE in
//! the attendee repo is what actually guarantees at-most-once across stations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::services::category_rules::{EventAction, EventDay};

const SUPPRESSION_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecentKey {
    attendee_id: String,
    action: EventAction,
    day: EventDay,
}

#[derive(Clone)]
pub struct RecentActions {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<RecentKey, Instant>>>,
}

impl RecentActions {
    pub fn new() -> Self {
        Self::with_ttl(SUPPRESSION_WINDOW)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn was_just_performed(&self, attendee_id: &str, action: EventAction, day: EventDay) -> bool {
        let mut entries = self.entries.lock().expect("recent-actions lock poisoned");
        let ttl = self.ttl;
        entries.retain(|_, inserted| inserted.elapsed() < ttl);
        entries.contains_key(&RecentKey {
            attendee_id: attendee_id.to_string(),
            action,
            day,
        })
    }

    pub fn remember(&self, attendee_id: &str, action: EventAction, day: EventDay) {
        let mut entries = self.entries.lock().expect("recent-actions lock poisoned");
        entries.insert(
            RecentKey {
                attendee_id: attendee_id.to_string(),
                action,
                day,
            },
            Instant::now(),
        );
    }
}

impl Default for RecentActions {
    fn default() -> Self {
        Self::new()
    }
}
