//! GoodForDay sweeper
//!
//! A long-lived background task that cancels every resting GoodForDay order
//! at session close. The close instant is resolved through a real time zone,
//! so the sweep fires at 16:00 Eastern on both sides of a DST transition.
//!
//! Each pass is two-phase: collect the expiring ids under the book lock,
//! release it, then cancel them through a bulk path that reacquires the lock
//! once. The collection walk never races the cancellations that way.

use std::sync::atomic::Ordering;
use std::sync::PoisonError;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::engine::Shared;

/// When the trading session ends, in exchange-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSchedule {
    timezone: Tz,
    close: NaiveTime,
    grace: Duration,
}

impl SessionSchedule {
    /// Session closing at `close` local time in `timezone`, with the default
    /// 100 ms grace added to every sweep deadline.
    pub fn new(timezone: Tz, close: NaiveTime) -> Self {
        Self {
            timezone,
            close,
            grace: Duration::from_millis(100),
        }
    }

    /// Override the grace period added to the sweep deadline.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// The next session close strictly after `now`: today's close if still
    /// ahead, otherwise tomorrow's. Local-time resolution goes through the
    /// configured zone, so the UTC instant shifts across DST transitions.
    pub fn next_close(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = now.with_timezone(&self.timezone).date_naive();
        loop {
            // 16:00 never lands inside a DST gap in practice; earliest()
            // resolves an ambiguous local time to its first occurrence.
            if let Some(close) = self
                .timezone
                .from_local_datetime(&date.and_time(self.close))
                .earliest()
            {
                let close = close.with_timezone(&Utc);
                if close > now {
                    return close;
                }
            }
            date = date + Days::new(1);
        }
    }

    /// How long the sweeper should wait from `now` before its next pass.
    pub fn wait_from(&self, now: DateTime<Utc>) -> Duration {
        let until_close = (self.next_close(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        until_close + self.grace
    }
}

impl Default for SessionSchedule {
    /// 16:00 America/New_York, the equity session close.
    fn default() -> Self {
        Self::new(
            chrono_tz::America::New_York,
            NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        )
    }
}

/// Sweeper loop body. Runs on the engine's pruner thread until shutdown is
/// signalled.
pub(crate) fn run(shared: &Shared, schedule: &SessionSchedule) {
    let mut guard = shared
        .book
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    loop {
        if shared.shutdown.load(Ordering::Acquire) {
            return;
        }

        let timeout = schedule.wait_from(Utc::now());
        let (reacquired, wait) = shared
            .wakeup
            .wait_timeout(guard, timeout)
            .unwrap_or_else(PoisonError::into_inner);
        guard = reacquired;

        if shared.shutdown.load(Ordering::Acquire) {
            return;
        }
        if !wait.timed_out() {
            // Spurious wakeup: recompute the deadline and keep waiting.
            continue;
        }

        // Phase one: collect expiring ids while holding the lock.
        let expired = guard.good_for_day_ids();
        drop(guard);

        if !expired.is_empty() {
            info!(count = expired.len(), "session close: pruning good-for-day orders");
        }

        // Phase two: the bulk-cancel path takes the lock once for the batch.
        guard = shared
            .book
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        guard.cancel_orders(&expired);
    }
}
