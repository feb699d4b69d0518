//! Controller configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PagerError;

/// How soon after a failed page fetch the next trigger may fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// The next qualifying poll may retry immediately
    Immediate,
    /// Hold off triggering for the given number of milliseconds
    Delay { millis: u64 },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Immediate
    }
}

impl RetryPolicy {
    /// Cooldown applied after a failure, if any
    pub(crate) fn cooldown(&self) -> Option<Duration> {
        match self {
            RetryPolicy::Immediate => None,
            RetryPolicy::Delay { millis } => Some(Duration::from_millis(*millis)),
        }
    }
}

/// Pagination controller configuration
///
/// Immutable once the controller attaches. Every field has a default;
/// start from `PagerConfig::default()` and override what you need.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Results requested per page. A page shorter than this marks the
    /// source exhausted.
    pub page_size: u32,
    /// Trigger distance from the bottom of the content, in pixels
    pub bottom_pixels: u32,
    /// Polling cadence in milliseconds
    pub poll_interval_ms: u64,
    /// Minimum spacing between two triggers, in milliseconds
    pub min_trigger_interval_ms: u64,
    /// Only emit advance events; the owner performs the fetch and reports
    /// completion back through the handle
    pub trigger_only: bool,
    /// Explicit page URL. Takes precedence over the viewport's default.
    pub request_url: Option<String>,
    /// CSS selector counting items in a markup payload when the fetcher
    /// reports no explicit count
    pub result_selector: Option<String>,
    /// Content handed to the loading indicator while a fetch is in flight
    pub loading_content: String,
    /// Behavior after a failed fetch
    pub retry: RetryPolicy,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            bottom_pixels: 50,
            poll_interval_ms: 250,
            min_trigger_interval_ms: 150,
            trigger_only: false,
            request_url: None,
            result_selector: None,
            loading_content: "Loading...".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PagerConfig {
    /// Validate the invariants the controller relies on
    pub fn validate(&self) -> Result<(), PagerError> {
        if self.page_size == 0 {
            return Err(PagerError::configuration("page_size must be at least 1"));
        }
        if self.poll_interval_ms == 0 {
            return Err(PagerError::configuration(
                "poll_interval_ms must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn min_trigger_interval(&self) -> Duration {
        Duration::from_millis(self.min_trigger_interval_ms)
    }
}
