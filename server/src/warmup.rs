//! Scheduled cache refresh.
//!
//! The upstream publishes daily rates, so the cache is re-warmed once a
//! day at 01:00 UTC, shortly after new quotes become available.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use forex_rates::RateEngine;
use tokio::task::JoinHandle;
use tracing::info;

/// Hour of day (UTC) at which the daily refresh runs.
const REFRESH_HOUR: u32 = 1;

/// Spawn the daily refresh loop.
pub fn spawn_daily_refresh(engine: Arc<RateEngine>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_refresh(Utc::now());
            tokio::time::sleep(wait).await;

            info!("Starting scheduled cache refresh");
            engine.evict_expired();
            engine.warmup().await;
        }
    })
}

/// Time until the next 01:00 UTC after `now`.
fn duration_until_next_refresh(now: DateTime<Utc>) -> std::time::Duration {
    let refresh_time = NaiveTime::from_hms_opt(REFRESH_HOUR, 0, 0)
        .unwrap_or(NaiveTime::MIN);

    let mut next = now.date_naive().and_time(refresh_time).and_utc();
    if next <= now {
        next += Duration::days(1);
    }

    (next - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(24 * 60 * 60))
}
