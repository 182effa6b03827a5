// Stream watchdog - bounded automatic recovery for the video feed
//
// A failure schedules a retry when the counter is not exhausted. When the
// retry comes due the counter is incremented and the stream source is
// reassigned to the base URL with a fresh `t=<unix_ms>` query parameter, so
// the client re-requests the resource instead of reusing a dead one.
//
// The counter is checked again when a retry fires: failures that arrive
// while earlier retries are still pending can never push the number of
// reassignments past `max_retries`.

use reqwest::Url;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Bounded retry counter; never resets for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryCounter {
    count: u32,
    max: u32,
}

impl RetryCounter {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.max
    }

    fn increment(&mut self) {
        self.count += 1;
    }
}

#[derive(Debug)]
pub struct StreamWatchdog {
    base: Url,
    counter: RetryCounter,
    delay: Duration,
    /// Due times of scheduled retries, earliest first
    pending: Vec<Instant>,
}

impl StreamWatchdog {
    pub fn new(base: Url, max_retries: u32, delay: Duration) -> Self {
        Self {
            base,
            counter: RetryCounter::new(max_retries),
            delay,
            pending: Vec::new(),
        }
    }

    /// Stream URL without any cache-busting parameter
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn counter(&self) -> RetryCounter {
        self.counter
    }

    /// Record a failure; returns whether a retry was scheduled
    pub fn on_failure(&mut self, now: Instant) -> bool {
        if self.counter.is_exhausted() {
            tracing::debug!(
                retries = self.counter.count(),
                "Stream retries exhausted, not scheduling another"
            );
            return false;
        }
        self.pending.push(now + self.delay);
        tracing::debug!(
            retries = self.counter.count(),
            delay_ms = self.delay.as_millis() as u64,
            "Stream retry scheduled"
        );
        true
    }

    /// Earliest pending retry, if any
    #[cfg(test)]
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().copied()
    }

    /// Fire every retry due at `now`. Returns the sources to assign, in order.
    pub fn fire_due(&mut self, now: Instant, unix_ms: i64) -> Vec<Url> {
        let due = self.pending.iter().take_while(|at| **at <= now).count();
        let mut sources = Vec::new();

        for _ in self.pending.drain(..due) {
            if self.counter.is_exhausted() {
                continue;
            }
            self.counter.increment();
            let source = cache_busted(&self.base, unix_ms);
            tracing::info!(
                attempt = self.counter.count(),
                max = self.counter.max(),
                "Reconnecting stream: {}",
                source
            );
            sources.push(source);
        }

        sources
    }
}

/// `base` with its `t` query parameter set to `unix_ms`
pub fn cache_busted(base: &Url, unix_ms: i64) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != "t")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("t", &unix_ms.to_string());
    }
    url
}
