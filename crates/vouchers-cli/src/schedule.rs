//! Watch mode: a forced pass at startup, then one pass per scheduled slot
//! until shutdown is requested.

use std::future::Future;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeDelta};
use vouchers_core::Schedule;
use vouchers_scraper::PageSegmenter;
use vouchers_store::DocumentStore;

use crate::collect::{Collector, RunSummary};

const STAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Time to wait from `now` until the next pass.
///
/// `unit` is a uniform sample from `[0, 1)` that places the daily run within
/// `±deviation_secs` of `hour:00`. Interval schedules ignore it.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn next_delay(schedule: &Schedule, now: NaiveDateTime, unit: f64) -> Duration {
    match *schedule {
        Schedule::Interval { secs } => Duration::from_secs(secs),
        Schedule::DailyAt {
            hour,
            deviation_secs,
        } => {
            let today = now.date().and_hms_opt(hour, 0, 0).unwrap_or(now);
            let target = if now < today {
                today
            } else {
                today + TimeDelta::days(1)
            };
            let base = (target - now).num_milliseconds() as f64 / 1000.0;
            let jitter = deviation_secs as f64 * (unit * 2.0 - 1.0);
            Duration::from_secs_f64((base + jitter).max(0.0))
        }
    }
}

/// Runs passes until `shutdown` resolves.
///
/// The first pass refreshes every shop; later passes honour `max_age`. A
/// failed pass is logged and the loop carries on with the next slot.
pub(crate) async fn watch<S, G, F>(
    collector: &Collector<S, G>,
    schedule: &Schedule,
    max_age: Duration,
    shutdown: F,
) where
    S: DocumentStore + Sync,
    G: PageSegmenter,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    tracing::info!("starting forced first pass");
    log_pass(collector.run_pass(Duration::ZERO).await);

    loop {
        let delay = next_delay(schedule, Local::now().naive_local(), rand::random::<f64>());
        let next_run = Local::now() + TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero());
        tracing::info!(
            next_run = %next_run.format(STAMP_FORMAT),
            delay_secs = delay.as_secs(),
            "waiting for next pass"
        );

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = &mut shutdown => {
                tracing::info!("received shutdown signal, stopping watch");
                return;
            }
        }

        log_pass(collector.run_pass(max_age).await);
    }
}

fn log_pass(result: anyhow::Result<RunSummary>) {
    let finished_at = Local::now().format(STAMP_FORMAT).to_string();
    match result {
        Ok(summary) => tracing::info!(
            finished_at = %finished_at,
            refreshed = summary.refreshed,
            failed = summary.failed,
            "vouchers updated"
        ),
        Err(e) => {
            let message = format!("{e:#}");
            tracing::error!(finished_at = %finished_at, error = %message, "voucher pass failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use vouchers_core::{FilterConfig, ShopEntry};
    use vouchers_scraper::{BlickSegmenter, VoucherClient};
    use vouchers_store::{CacheDir, MemoryStore};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const DAILY: Schedule = Schedule::DailyAt {
        hour: 19,
        deviation_secs: 600,
    };

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn daily_before_target_waits_until_today() {
        assert_eq!(
            next_delay(&DAILY, at(10, 0, 0), 0.5),
            Duration::from_secs(9 * 3600)
        );
    }

    #[test]
    fn daily_at_or_after_target_rolls_to_tomorrow() {
        assert_eq!(
            next_delay(&DAILY, at(19, 0, 0), 0.5),
            Duration::from_secs(24 * 3600)
        );
        assert_eq!(
            next_delay(&DAILY, at(20, 30, 0), 0.5),
            Duration::from_secs(22 * 3600 + 1800)
        );
    }

    #[test]
    fn daily_jitter_spans_deviation_both_ways() {
        let base = 9 * 3600;
        assert_eq!(
            next_delay(&DAILY, at(10, 0, 0), 0.0),
            Duration::from_secs(base - 600)
        );
        assert_eq!(
            next_delay(&DAILY, at(10, 0, 0), 1.0),
            Duration::from_secs(base + 600)
        );
    }

    #[test]
    fn daily_jitter_never_goes_negative() {
        assert_eq!(next_delay(&DAILY, at(18, 59, 50), 0.0), Duration::ZERO);
    }

    #[test]
    fn interval_ignores_clock_and_jitter() {
        let schedule = Schedule::Interval { secs: 90 };
        assert_eq!(
            next_delay(&schedule, at(3, 0, 0), 0.0),
            Duration::from_secs(90)
        );
        assert_eq!(
            next_delay(&schedule, at(23, 59, 59), 0.99),
            Duration::from_secs(90)
        );
    }

    #[tokio::test]
    async fn watch_forces_first_pass_then_stops_on_shutdown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alle-shops"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"id":1,"url":"/acme-gutscheine"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/acme-gutscheine"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"expired_codes":[{"code":"SPRING24"}],"expired_deals":[]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let collector = Collector {
            client: VoucherClient::new(5, "vouchers-test/0.1").unwrap(),
            segmenter: BlickSegmenter,
            cache: CacheDir::new(dir.path(), "blick"),
            store: MemoryStore::new(),
            filter: FilterConfig::default(),
            pacing: None,
            overview_url: format!("{}/alle-shops", server.uri()),
            site_origin: server.uri(),
        };

        // A fresh cache file would be skipped by a normal pass.
        let fresh = ShopEntry::new(&format!("{}/acme-gutscheine", server.uri()), vec![]);
        collector.cache.write(&fresh).unwrap();

        watch(
            &collector,
            &Schedule::Interval { secs: 3600 },
            Duration::from_secs(3600),
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await;

        let cached = collector.cache.read("acme-gutscheine").unwrap().unwrap();
        assert_eq!(cached.vouchers.len(), 1);
        assert_eq!(cached.vouchers[0].code.as_deref(), Some("SPRING24"));
    }

    #[tokio::test]
    async fn watch_retries_after_failed_pass() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alle-shops"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let collector = Collector {
            client: VoucherClient::new(5, "vouchers-test/0.1").unwrap(),
            segmenter: BlickSegmenter,
            cache: CacheDir::new(dir.path(), "blick"),
            store: MemoryStore::new(),
            filter: FilterConfig::default(),
            pacing: None,
            overview_url: format!("{}/alle-shops", server.uri()),
            site_origin: server.uri(),
        };

        watch(
            &collector,
            &Schedule::Interval { secs: 0 },
            Duration::from_secs(3600),
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await;

        let attempts = server.received_requests().await.unwrap().len();
        assert!(
            attempts >= 2,
            "expected a retry after the failed pass, got {attempts} request(s)"
        );
        assert!(collector.store.keys("log").is_empty());
    }
}
