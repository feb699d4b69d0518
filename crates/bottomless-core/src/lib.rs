//! Bottomless Core - infinite-scroll pagination controller
//!
//! Attaches to a scrollable viewport, samples scroll activity at a fixed
//! polling cadence, and emits debounced, strictly sequential "load next page"
//! triggers until the data source reports a short page:
//! - at most one page fetch outstanding at any time
//! - a configurable minimum interval between two triggers
//! - terminal exhaustion once a page comes back short
//!
//! Host concerns stay behind capability traits: geometry and scroll events
//! ([`Viewport`]), transport ([`PageFetcher`]), content appending
//! ([`PageSink`]), and the loading indicator ([`LoadingIndicator`]).

pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod markup;
pub mod present;
pub mod state;
pub mod viewport;


// Re-exports for convenience
pub use config::{PagerConfig, RetryPolicy};
pub use controller::{Advance, PagerBuilder, PagerHandle, PagerStatus};
pub use error::PagerError;
pub use fetch::{FetchedPage, HttpPageFetcher, PageFetcher, PageWindow};
pub use geometry::{is_near_bottom, ViewportMeasurement};
pub use present::{LoadingIndicator, NoopIndicator, NoopSink, PageSink};
pub use state::{Settled, TriggerState};
pub use viewport::{ScrollSignal, Viewport};
