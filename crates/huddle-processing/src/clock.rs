//! Millisecond clock for storage keys.

use std::sync::{Arc, Mutex};

use chrono::Utc;

/// Source of wall-clock milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hands out strictly increasing millisecond values.
///
/// Follows the wall clock, but when two calls land in the same millisecond
/// (or the clock steps backwards) the next value is the previous one plus one.
/// Keys built from it never repeat within a process.
pub struct KeyClock {
    source: Arc<dyn Clock>,
    last: Mutex<i64>,
}

impl KeyClock {
    pub fn new(source: Arc<dyn Clock>) -> Self {
        Self {
            source,
            last: Mutex::new(i64::MIN),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn next_millis(&self) -> i64 {
        let now = self.source.now_millis();
        // The guarded value is a plain integer; a poisoned lock still holds a valid one.
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let next = if now > *last { now } else { *last + 1 };
        *last = next;
        next
    }
}

impl Default for KeyClock {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for KeyClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyClock").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FrozenClock(i64);

    impl Clock for FrozenClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_same_millisecond_is_bumped() {
        let clock = KeyClock::new(Arc::new(FrozenClock(1_700_000_000_000)));
        assert_eq!(clock.next_millis(), 1_700_000_000_000);
        assert_eq!(clock.next_millis(), 1_700_000_000_001);
        assert_eq!(clock.next_millis(), 1_700_000_000_002);
    }

    #[test]
    fn test_system_clock_is_strictly_increasing() {
        let clock = KeyClock::system();
        let values: Vec<i64> = (0..1000).map(|_| clock.next_millis()).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }
}
