//! Optional randomized pause between consecutive shop fetches.
//!
//! Spreads a pass's requests out so the site does not see a burst. The delay
//! is drawn uniformly from `mean ± spread` seconds and never drops below
//! `min`.

use std::time::Duration;

use vouchers_core::Pacing;

/// Paces fetches within one pass. The first fetch of a pass is never delayed.
#[derive(Debug)]
pub struct Throttle {
    pacing: Option<Pacing>,
    started: bool,
}

impl Throttle {
    #[must_use]
    pub fn new(pacing: Option<Pacing>) -> Self {
        Self {
            pacing,
            started: false,
        }
    }

    /// Waits before a fetch. No-op for the first call and when pacing is off.
    pub async fn pause(&mut self) {
        let first = !self.started;
        self.started = true;
        if first {
            return;
        }
        let Some(pacing) = self.pacing else {
            return;
        };
        let delay = delay_for(&pacing, rand::random::<f64>());
        tracing::debug!(delay_ms = delay.as_millis(), "pacing before next fetch");
        tokio::time::sleep(delay).await;
    }
}

/// Maps `unit` in `[0, 1)` onto `mean ± spread`, clamped to `min`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn delay_for(pacing: &Pacing, unit: f64) -> Duration {
    let mean = pacing.mean_secs as f64;
    let spread = pacing.spread_secs as f64;
    let secs = (mean + spread * (unit * 2.0 - 1.0)).max(pacing.min_secs as f64);
    Duration::from_secs_f64(secs.max(0.0))
}
