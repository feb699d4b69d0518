//! Trigger state machine
//!
//! Converts poll ticks plus the scroll-changed flag into a bounded,
//! debounced, strictly sequential series of page triggers. It owns no
//! timers: the async controller drives it on a cadence, and tests drive
//! it directly with explicit instants.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::RetryPolicy;
use crate::viewport::ScrollSignal;

/// Outcome of applying a settled page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Page accepted; more pages may follow
    Idle,
    /// Page accepted and was short: the source is exhausted
    Exhausted,
    /// The page was no longer outstanding (a reset or detach raced it)
    Stale,
}

/// Pagination trigger state.
///
/// Owned by a single poll loop. At most one page is outstanding at any
/// time, page indices are 1-based and strictly increasing, and once a
/// short page marks the source exhausted no trigger ever fires again.
#[derive(Debug, Default)]
pub struct TriggerState {
    fire_count: u64,
    outstanding: Option<u64>,
    last_trigger: Option<Instant>,
    retry_after: Option<Instant>,
    exhausted: bool,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page index of the most recent trigger; 0 before the first
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    /// True while a triggered page has neither settled nor failed
    pub fn is_loading(&self) -> bool {
        self.outstanding.is_some()
    }

    /// True once the source reported a short page. Terminal.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Run one poll cycle against the scroll flag.
    ///
    /// The flag is consumed only when the machine is idle (not loading,
    /// not exhausted), so a scroll arriving mid-fetch survives until the
    /// next idle poll. A cycle skipped by the debounce or retry gate keeps
    /// the flag consumed: continued rapid scrolling re-raises it but never
    /// raises trigger probability beyond the configured interval. Geometry
    /// is queried last, only when every gate has passed.
    ///
    /// Returns the fired page index.
    pub fn poll(
        &mut self,
        now: Instant,
        min_trigger_interval: Duration,
        signal: &ScrollSignal,
        near_bottom: impl FnOnce() -> bool,
    ) -> Option<u64> {
        if self.exhausted || self.outstanding.is_some() {
            return None;
        }
        if !signal.take() {
            return None;
        }
        if let Some(last) = self.last_trigger {
            if now.duration_since(last) < min_trigger_interval {
                return None;
            }
        }
        if let Some(until) = self.retry_after {
            if now < until {
                return None;
            }
        }
        if !near_bottom() {
            return None;
        }

        self.fire_count += 1;
        self.outstanding = Some(self.fire_count);
        self.last_trigger = Some(now);
        self.retry_after = None;
        Some(self.fire_count)
    }

    /// Apply a settled page. A page shorter than `page_size` marks the
    /// source exhausted, permanently. Settlements for pages that are no
    /// longer outstanding are ignored.
    pub fn settle(&mut self, page: u64, item_count: usize, page_size: u32) -> Settled {
        if self.outstanding != Some(page) {
            return Settled::Stale;
        }
        self.outstanding = None;
        if item_count < page_size as usize {
            self.exhausted = true;
            Settled::Exhausted
        } else {
            Settled::Idle
        }
    }

    /// Apply a failed page: release the in-flight marker so the next
    /// qualifying poll may retry, arm the retry cooldown, leave exhaustion
    /// untouched. Failures for pages no longer outstanding are ignored.
    pub fn fail(&mut self, page: u64, now: Instant, retry: &RetryPolicy) {
        if self.outstanding != Some(page) {
            return;
        }
        self.outstanding = None;
        self.retry_after = retry.cooldown().map(|cooldown| now + cooldown);
    }

    /// Reset-hook action: clears the fire count and all trigger
    /// bookkeeping. Exhaustion is permanent and survives resets.
    pub fn reset(&mut self) {
        self.fire_count = 0;
        self.outstanding = None;
        self.last_trigger = None;
        self.retry_after = None;
    }
}
