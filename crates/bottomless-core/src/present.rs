//! Presentation seams
//!
//! Appending fetched content and the loading indicator are host concerns;
//! the controller only calls through these traits.

/// Receives fetched payloads for appending into the host surface
pub trait PageSink: Send + Sync {
    fn render_page(&self, payload: &str);
}

/// Loading indicator shown while a fetch is in flight
pub trait LoadingIndicator: Send + Sync {
    fn show(&self, content: &str);
    fn hide(&self);
}

/// Sink that drops payloads, for owners that consume pages elsewhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl PageSink for NoopSink {
    fn render_page(&self, _payload: &str) {}
}

/// Indicator that presents nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIndicator;

impl LoadingIndicator for NoopIndicator {
    fn show(&self, _content: &str) {}
    fn hide(&self) {}
}
