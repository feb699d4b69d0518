//! Viewport capability and the scroll-changed signal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PagerError;
use crate::geometry::ViewportMeasurement;

/// Cross-context scroll-activity flag.
///
/// The host raises it from its scroll event handler; the poll task consumes
/// it at most once per eligible cycle. This is the only state shared between
/// the event source and the poll loop, and relaxed ordering is sufficient:
/// a lost or duplicated raise only delays or adds a single poll, it never
/// changes which pages get fetched.
#[derive(Debug, Clone, Default)]
pub struct ScrollSignal {
    raised: Arc<AtomicBool>,
}

impl ScrollSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark scroll activity. Cheap enough to call on every raw scroll event.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }

    /// Consume the flag, returning whether it was raised since the last take.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::Relaxed)
    }
}

/// A scrollable surface under observation.
///
/// One controller observes one viewport; multiple viewports need multiple
/// independent controllers.
pub trait Viewport: Send + Sync {
    /// Query the current scroll geometry
    fn measure(&self) -> Result<ViewportMeasurement, PagerError>;

    /// Register the scroll-changed signal. The viewport raises it on every
    /// scroll event until `off_scroll` is called.
    fn on_scroll(&self, signal: ScrollSignal);

    /// Remove the hook registered by `on_scroll`
    fn off_scroll(&self);

    /// Default page URL for this viewport, used when the configuration
    /// sets no explicit `request_url`
    fn page_url(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_take_consumes() {
        let signal = ScrollSignal::new();
        assert!(!signal.take());

        signal.raise();
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn test_clones_share_the_flag() {
        let signal = ScrollSignal::new();
        let raiser = signal.clone();

        raiser.raise();
        assert!(signal.take());
    }
}
