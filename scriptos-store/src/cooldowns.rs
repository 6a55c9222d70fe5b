use std::{collections::HashMap, time::Duration};

use tokio::{sync::Mutex, time::Instant};

/// Default window between two successful reservations for the same user.
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Result of a cooldown reservation attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reservation {
    /// The user passed the gate and `now` was recorded for them.
    Granted,
    /// The user is still inside the window; nothing was recorded.
    Blocked { remaining_secs: u64 },
}

/// Per-user rate limiter for the `/script` command.
///
/// Entries are keyed by user snowflake and hold the instant of the last
/// granted reservation. A reservation is made before the upload outcome is
/// known and must be released again if the upload fails.
#[derive(Debug)]
pub struct CooldownTracker {
    window: Duration,
    entries: Mutex<HashMap<u64, Instant>>,
}

impl CooldownTracker {
    /// Create a tracker with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a tracker with a window expressed in whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Reserve the window for `user_id` if it is free.
    ///
    /// The read of the previous timestamp and the write of the new one happen
    /// under a single lock acquisition, so two concurrent invocations from the
    /// same user can never both be granted.
    pub async fn check_and_reserve(&self, user_id: u64) -> Reservation {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        if let Some(last) = entries.get(&user_id) {
            let age = now.saturating_duration_since(*last);
            if age < self.window {
                return Reservation::Blocked {
                    remaining_secs: ceil_secs(self.window - age),
                };
            }
        }

        entries.insert(user_id, now);
        Reservation::Granted
    }

    /// Drop the reservation for `user_id`. No-op when there is none.
    pub async fn release(&self, user_id: u64) {
        self.entries.lock().await.remove(&user_id);
    }

    /// Number of users currently holding an entry.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::from_secs(DEFAULT_COOLDOWN_SECS)
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let whole = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        whole.saturating_add(1)
    } else {
        whole
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::advance;

    use super::*;

    const USER: u64 = 1_000_000_000_000_001;

    #[tokio::test(start_paused = true)]
    async fn first_reservation_is_granted() {
        let tracker = CooldownTracker::default();

        assert_eq!(tracker.check_and_reserve(USER).await, Reservation::Granted);
        assert_eq!(tracker.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_reservation_inside_window_is_blocked() {
        let tracker = CooldownTracker::default();
        tracker.check_and_reserve(USER).await;

        advance(Duration::from_secs(20)).await;

        assert_eq!(
            tracker.check_and_reserve(USER).await,
            Reservation::Blocked { remaining_secs: 40 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_seconds_round_up() {
        let tracker = CooldownTracker::default();
        tracker.check_and_reserve(USER).await;

        advance(Duration::from_millis(20_500)).await;

        assert_eq!(
            tracker.check_and_reserve(USER).await,
            Reservation::Blocked { remaining_secs: 40 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_attempt_does_not_extend_the_window() {
        let tracker = CooldownTracker::default();
        tracker.check_and_reserve(USER).await;

        advance(Duration::from_secs(59)).await;
        assert_eq!(
            tracker.check_and_reserve(USER).await,
            Reservation::Blocked { remaining_secs: 1 }
        );

        advance(Duration::from_secs(1)).await;
        assert_eq!(tracker.check_and_reserve(USER).await, Reservation::Granted);
    }

    #[tokio::test(start_paused = true)]
    async fn release_allows_immediate_reservation() {
        let tracker = CooldownTracker::default();
        tracker.check_and_reserve(USER).await;

        tracker.release(USER).await;

        assert_eq!(tracker.check_and_reserve(USER).await, Reservation::Granted);
    }

    #[tokio::test(start_paused = true)]
    async fn release_is_idempotent() {
        let tracker = CooldownTracker::default();

        tracker.release(USER).await;
        tracker.release(USER).await;

        assert!(tracker.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn users_do_not_share_windows() {
        let tracker = CooldownTracker::from_secs(30);
        tracker.check_and_reserve(USER).await;

        assert_eq!(
            tracker.check_and_reserve(USER + 1).await,
            Reservation::Granted
        );
    }

    #[tokio::test]
    async fn concurrent_reservations_grant_exactly_one() {
        let tracker = Arc::new(CooldownTracker::default());

        let handles = (0..16)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move { tracker.check_and_reserve(USER).await })
            })
            .collect::<Vec<_>>();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() == Reservation::Granted {
                granted += 1;
            }
        }

        assert_eq!(granted, 1);
    }
}
