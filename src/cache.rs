//! Short-lived memoization of upstream responses.
//!
//! Every key owns a slot guarded by an async mutex. A caller holds the slot
//! for the whole check-fetch-store sequence, so concurrent misses on the same
//! key collapse into one upstream call: later callers wait, then find the
//! freshly stored value.
//!
//! The key count is bounded by `max_entries` and `sweep` drops entries that
//! have outlived every TTL in use.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

struct Entry<V> {
    fetched_at: Instant,
    value: V,
}

type Slot<V> = Arc<Mutex<Option<Entry<V>>>>;

/// Thread-safe TTL cache keyed by strings.
pub struct TtlCache<V> {
    max_entries: usize,
    slots: RwLock<HashMap<String, Slot<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(max_entries: usize) -> Self {
        TtlCache {
            max_entries: max_entries.max(1),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Return the value stored under `key` if it was fetched less than `ttl`
    /// ago, otherwise run `fetch` and store its result.
    ///
    /// Errors from `fetch` are returned as-is and nothing is stored; a stale
    /// value already in the slot stays there until a later fetch succeeds.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        let now = Instant::now();
        if let Some(cached) = entry.as_ref() {
            if now.duration_since(cached.fetched_at) < ttl {
                debug!("cache hit: {}", key);
                return Ok(cached.value.clone());
            }
        }

        debug!("cache miss: {}", key);
        let value = fetch().await?;
        *entry = Some(Entry {
            fetched_at: now,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Drop entries fetched more than `max_age` ago, and slots left empty by
    /// failed fetches. Slots somebody is waiting on or fetching are kept.
    /// Returns the number of keys removed.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        let now = Instant::now();
        slots.retain(|_, slot| match idle_fetched_at(slot) {
            Some(Some(fetched_at)) => now.duration_since(fetched_at) <= max_age,
            Some(None) => false,
            None => true,
        });
        let removed = before - slots.len();
        if removed > 0 {
            debug!("cache sweep removed {} entries, {} left", removed, slots.len());
        }
        removed
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    async fn slot(&self, key: &str) -> Slot<V> {
        if let Some(slot) = self.slots.read().await.get(key) {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().await;
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
        if slots.len() >= self.max_entries {
            evict_oldest(&mut slots);
        }
        let slot: Slot<V> = Arc::new(Mutex::new(None));
        slots.insert(key.to_string(), Arc::clone(&slot));
        slot
    }
}

/// `None` when the slot is in use, otherwise the time of its last successful
/// fetch (`Some(None)` if it never had one).
///
/// Only called with the map's write lock held, so the reference count cannot
/// grow underneath us.
fn idle_fetched_at<V>(slot: &Slot<V>) -> Option<Option<Instant>> {
    if Arc::strong_count(slot) > 1 {
        return None;
    }
    let entry = slot.try_lock().ok()?;
    Some(entry.as_ref().map(|e| e.fetched_at))
}

/// Remove the idle slot with the oldest fetch. Empty slots go first. If
/// every slot is busy the map temporarily grows past its bound.
fn evict_oldest<V>(slots: &mut HashMap<String, Slot<V>>) {
    let victim = slots
        .iter()
        .filter_map(|(key, slot)| idle_fetched_at(slot).map(|at| (key, at)))
        .min_by_key(|(_, at)| *at)
        .map(|(key, _)| key.clone());

    if let Some(key) = victim {
        debug!("cache full, evicting {}", key);
        slots.remove(&key);
    }
}
