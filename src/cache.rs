//! Process-wide key/value cache with a fixed time-to-live.
//!
//! Expiry is checked lazily on read; there is no background sweep. The cache
//! serves the read-through service layer only; registry writes mutate
//! in-memory state directly and do not invalidate entries here, so a stale
//! window of up to one TTL exists between the two (see `services::clients`).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default entry lifetime: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the stored value, or `None` when the key is absent or its
    /// entry has outlived the TTL (expired entries are dropped on read).
    pub fn get(&self, key: &str) -> Option<V> {
        // A poisoned lock degrades to a cache miss.
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.into(),
                Entry {
                    stored_at: Instant::now(),
                    value,
                },
            );
        }
    }

    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    pub fn invalidate_all(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
