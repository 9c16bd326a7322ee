//! Daily expiration sweep scheduler.
//!
//! Sleeps until the next local midnight, runs [`ExpirationSweep`] for the
//! new day, logs the report and repeats.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use portal_core::clock::{Clock, SystemClock};
use portal_events::Mailer;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::engine::lifecycle::{ExpirationSweep, PgLifecycleStore, SweepReport};

/// Used when the next midnight cannot be resolved (e.g. a DST gap).
const FALLBACK_INTERVAL: Duration = Duration::from_secs(24 * 3600);

/// Run the scheduler loop until `cancel` is triggered.
pub async fn run(pool: PgPool, mailer: Arc<dyn Mailer>, cancel: CancellationToken) {
    let sweep = ExpirationSweep::new(Arc::new(PgLifecycleStore::new(pool)), mailer);
    let clock = SystemClock;

    tracing::info!("Expiration sweep scheduler started");

    loop {
        let wait = until_next_midnight(&chrono::Local::now());
        tracing::debug!(wait_secs = wait.as_secs(), "Expiration sweep: waiting for midnight");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiration sweep scheduler stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                let report = sweep.run(clock.today()).await;
                log_report(&report);
            }
        }
    }
}

/// Time from `now` until the start of the next calendar day in `now`'s zone.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let next = now
        .date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest());

    match next {
        Some(next) => (next - now.clone()).to_std().unwrap_or(FALLBACK_INTERVAL),
        None => FALLBACK_INTERVAL,
    }
}

fn log_report(report: &SweepReport) {
    for stage in &report.stages {
        match &stage.error {
            Some(error) => tracing::error!(
                as_of = %report.as_of,
                stage = %stage.stage,
                error = %error,
                "Expiration sweep: stage failed",
            ),
            None => tracing::info!(
                as_of = %report.as_of,
                stage = %stage.stage,
                offers_selected = stage.offers_selected,
                offers_marked = stage.offers_marked,
                emails_sent = stage.emails_sent,
                emails_failed = stage.emails_failed,
                "Expiration sweep: stage complete",
            ),
        }
    }
}
