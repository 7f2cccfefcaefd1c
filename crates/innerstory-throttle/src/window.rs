//! Fixed-window counting.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// How many requests a window admits, and how long the window lasts.
#[derive(Debug, Clone, Copy)]
pub struct RatePolicy {
    /// Admissions per window.
    pub limit: u32,
    /// Window length.
    pub window: Duration,
}

/// One identity's counter within the current window.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window counters for one route class, keyed by caller identity.
///
/// Entries live only in process memory and vanish on restart. The table
/// is bounded: before a previously unseen key is inserted past `cap`,
/// expired entries are swept out. No timer thread is needed.
#[derive(Debug)]
pub struct FixedWindowTable {
    policy: RatePolicy,
    cap: usize,
    entries: HashMap<String, WindowEntry>,
}

impl FixedWindowTable {
    /// Creates an empty table with the given policy and size cap.
    #[must_use]
    pub fn new(policy: RatePolicy, cap: usize) -> Self {
        Self {
            policy,
            cap,
            entries: HashMap::new(),
        }
    }

    /// Admits or rejects one request for `key` at time `now`.
    ///
    /// A fresh or expired window restarts the count at 1. Within a
    /// window, the count stops incrementing once the limit is reached,
    /// so a rejected caller cannot inflate the counter.
    pub fn admit(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        if let Some(entry) = self.entries.get_mut(key) {
            if now < entry.reset_at {
                if entry.count < self.policy.limit {
                    entry.count += 1;
                    true
                } else {
                    false
                }
            } else {
                entry.count = 1;
                entry.reset_at = now + self.policy.window;
                true
            }
        } else {
            if self.entries.len() >= self.cap {
                self.entries.retain(|_, entry| entry.reset_at > now);
            }
            self.entries.insert(
                key.to_owned(),
                WindowEntry {
                    count: 1,
                    reset_at: now + self.policy.window,
                },
            );
            true
        }
    }

    /// Number of tracked identities (expired entries included until the
    /// next sweep).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no identities are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn per_minute(limit: u32) -> RatePolicy {
        RatePolicy {
            limit,
            window: Duration::seconds(60),
        }
    }

    #[test]
    fn test_exactly_limit_admits_then_rejects() {
        let mut table = FixedWindowTable::new(per_minute(3), 100);
        let now = fixed_now();

        assert!(table.admit("ip:203.0.113.9", now));
        assert!(table.admit("ip:203.0.113.9", now));
        assert!(table.admit("ip:203.0.113.9", now));
        assert!(!table.admit("ip:203.0.113.9", now));
        assert!(!table.admit("ip:203.0.113.9", now));
    }

    #[test]
    fn test_window_expiry_resets_the_count() {
        let mut table = FixedWindowTable::new(per_minute(2), 100);
        let now = fixed_now();

        assert!(table.admit("user:u-1", now));
        assert!(table.admit("user:u-1", now));
        assert!(!table.admit("user:u-1", now));

        // Past reset_at the next call is window 1 again.
        let later = now + Duration::seconds(61);
        assert!(table.admit("user:u-1", later));
        assert!(table.admit("user:u-1", later));
        assert!(!table.admit("user:u-1", later));
    }

    #[test]
    fn test_identities_are_counted_separately() {
        let mut table = FixedWindowTable::new(per_minute(1), 100);
        let now = fixed_now();

        assert!(table.admit("ip:a", now));
        assert!(table.admit("ip:b", now));
        assert!(!table.admit("ip:a", now));
    }

    #[test]
    fn test_eviction_sweeps_expired_entries_at_cap() {
        let mut table = FixedWindowTable::new(per_minute(1), 2);
        let now = fixed_now();

        assert!(table.admit("ip:a", now));
        assert!(table.admit("ip:b", now));
        assert_eq!(table.len(), 2);

        // Both windows have expired; inserting a third key sweeps them.
        let later = now + Duration::seconds(120);
        assert!(table.admit("ip:c", later));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_eviction_keeps_live_entries() {
        let mut table = FixedWindowTable::new(per_minute(1), 1);
        let now = fixed_now();

        assert!(table.admit("ip:a", now));
        // Cap reached but ip:a's window is still live; it must survive.
        assert!(table.admit("ip:b", now + Duration::seconds(1)));
        assert_eq!(table.len(), 2);
        assert!(!table.admit("ip:a", now + Duration::seconds(2)));
    }
}
