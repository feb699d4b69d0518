//! Simulated viewport and page source for the demo
//!
//! The viewport models a pixel-space surface whose content grows as pages
//! are appended; the demo's reader loop drifts toward the bottom, which is
//! what drives the controller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bottomless_core::{
    FetchedPage, LoadingIndicator, PageFetcher, PageSink, PageWindow, PagerError, ScrollSignal,
    Viewport, ViewportMeasurement,
};
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info};
use url::Url;

const ITEM_HEIGHT_PX: f64 = 24.0;

struct SurfaceState {
    content_px: f64,
    viewport_px: f64,
    scroll_px: f64,
    signal: Option<ScrollSignal>,
}

/// Scrollable surface whose reader drifts toward the bottom
pub struct SimViewport {
    state: Mutex<SurfaceState>,
}

impl SimViewport {
    pub fn new(viewport_px: f64) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                // Start with one screenful so the first pages load while
                // the reader is still near the top.
                content_px: viewport_px,
                viewport_px,
                scroll_px: 0.0,
                signal: None,
            }),
        }
    }

    /// Scroll down by a jittered step, raising the scroll signal
    pub fn scroll_down(&self, max_step_px: f64) {
        let step = rand::thread_rng().gen_range(0.0..max_step_px);
        let mut state = self.state.lock();
        let max = (state.content_px - state.viewport_px).max(0.0);
        state.scroll_px = (state.scroll_px + step).min(max);
        if let Some(signal) = &state.signal {
            signal.raise();
        }
    }

    /// Grow the content extent by `count` appended items
    pub fn append_items(&self, count: usize) {
        self.state.lock().content_px += count as f64 * ITEM_HEIGHT_PX;
    }
}

impl Viewport for SimViewport {
    fn measure(&self) -> Result<ViewportMeasurement, PagerError> {
        let state = self.state.lock();
        Ok(ViewportMeasurement {
            content_extent: state.content_px,
            viewport_extent: state.viewport_px,
            scroll_offset: state.scroll_px,
        })
    }

    fn on_scroll(&self, signal: ScrollSignal) {
        self.state.lock().signal = Some(signal);
    }

    fn off_scroll(&self) {
        self.state.lock().signal = None;
    }

    fn page_url(&self) -> Option<String> {
        Some("sim://feed".to_string())
    }
}

/// In-memory page source serving `total_items` generated entries with a
/// simulated latency
pub struct SimFetcher {
    total_items: usize,
    latency: Duration,
}

impl SimFetcher {
    pub fn new(total_items: usize, latency: Duration) -> Self {
        Self {
            total_items,
            latency,
        }
    }
}

#[async_trait]
impl PageFetcher for SimFetcher {
    async fn fetch_page(&self, _url: &Url, window: PageWindow) -> Result<FetchedPage, PagerError> {
        tokio::time::sleep(self.latency).await;
        let start = (window.offset as usize).min(self.total_items);
        let end = (start + window.limit as usize).min(self.total_items);
        let payload: String = (start..end)
            .map(|i| format!("<li>item {}</li>", i + 1))
            .collect();
        Ok(FetchedPage::with_count(payload, end - start))
    }
}

/// Appends fetched items into the simulated viewport
pub struct SimSink {
    viewport: Arc<SimViewport>,
}

impl SimSink {
    pub fn new(viewport: Arc<SimViewport>) -> Self {
        Self { viewport }
    }
}

impl PageSink for SimSink {
    fn render_page(&self, payload: &str) {
        let count = payload.matches("<li>").count();
        self.viewport.append_items(count);
        info!(count, "appended page");
    }
}

/// Indicator that logs show/hide transitions
pub struct LogIndicator;

impl LoadingIndicator for LogIndicator {
    fn show(&self, content: &str) {
        debug!("{content}");
    }

    fn hide(&self) {
        debug!("loading indicator hidden");
    }
}
