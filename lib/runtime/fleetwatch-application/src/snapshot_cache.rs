use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;

use fleetwatch_domain::GlobalSnapshot;

struct Entry {
    snapshot: Arc<GlobalSnapshot>,
    expires_at: Instant,
}

/// Holds the current global snapshot.
///
/// Snapshots are swapped in whole behind an `Arc`, so a reader never sees a
/// mix of two cycles. Expired entries read as the empty snapshot.
pub struct SnapshotCache {
    ttl: Duration,
    entry: RwLock<Option<Entry>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn set(&self, snapshot: Arc<GlobalSnapshot>) {
        let entry = Entry {
            snapshot,
            expires_at: Instant::now() + self.ttl,
        };
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    pub fn get(&self) -> Arc<GlobalSnapshot> {
        let now = Instant::now();
        {
            let guard = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                Some(entry) if now < entry.expires_at => return Arc::clone(&entry.snapshot),
                None => return Arc::new(GlobalSnapshot::empty()),
                Some(_) => {}
            }
        }

        let mut guard = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        // A writer may have replaced the stale entry meanwhile.
        match guard.as_ref() {
            Some(entry) if now < entry.expires_at => Arc::clone(&entry.snapshot),
            _ => {
                *guard = None;
                Arc::new(GlobalSnapshot::empty())
            }
        }
    }
}
