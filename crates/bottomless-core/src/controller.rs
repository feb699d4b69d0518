//! Scroll trigger controller
//!
//! Owns the poll loop: samples the scroll-changed flag at a fixed cadence,
//! applies the debounce gate and the geometry check, and keeps at most one
//! page request outstanding. Fetch completions come back over a channel
//! consumed by the same loop, so settle/fail application is serialized
//! with polling and the poll body is never re-entered.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::PagerConfig;
use crate::error::PagerError;
use crate::fetch::{FetchedPage, PageFetcher, PageWindow};
use crate::geometry::is_near_bottom;
use crate::markup;
use crate::present::{LoadingIndicator, NoopIndicator, NoopSink, PageSink};
use crate::state::{Settled, TriggerState};
use crate::viewport::{ScrollSignal, Viewport};

/// Reset hook invoked once per poll cycle; returning true clears the
/// controller's trigger counters (never exhaustion).
pub type ResetHook = Arc<dyn Fn() -> bool + Send + Sync>;

/// One emitted trigger: the page to load and its offset/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// 1-based page index
    pub page: u64,
    /// `offset = page_size * (page - 1)`, `limit = page_size`
    pub window: PageWindow,
}

/// Observable controller status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerStatus {
    /// Pages triggered so far
    pub fire_count: u64,
    /// A fetch is currently outstanding
    pub loading: bool,
    /// The source reported a short page; no further triggers will fire
    pub exhausted: bool,
}

/// Completion messages flowing back into the poll loop
enum PageOutcome {
    /// Internal fetch path resolved
    Fetched {
        page: u64,
        result: Result<FetchedPage, PagerError>,
    },
    /// Owner-reported completion (trigger-only mode)
    Settled { page: u64, item_count: usize },
    /// Owner-reported failure (trigger-only mode)
    Failed { page: u64, error: PagerError },
}

/// Builder wiring a controller to its collaborators.
///
/// `attach` must be called from within a tokio runtime; it validates the
/// configuration, registers the scroll hook on the viewport, and spawns
/// the poll task.
pub struct PagerBuilder {
    config: PagerConfig,
    viewport: Option<Arc<dyn Viewport>>,
    fetcher: Option<Arc<dyn PageFetcher>>,
    sink: Arc<dyn PageSink>,
    indicator: Arc<dyn LoadingIndicator>,
    reset_hook: ResetHook,
}

impl PagerBuilder {
    pub fn new(config: PagerConfig) -> Self {
        Self {
            config,
            viewport: None,
            fetcher: None,
            sink: Arc::new(NoopSink),
            indicator: Arc::new(NoopIndicator),
            reset_hook: Arc::new(|| false),
        }
    }

    /// The viewport to observe. Required.
    pub fn viewport(mut self, viewport: Arc<dyn Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Page source. Required unless `trigger_only` is set.
    pub fn fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Where fetched payloads get appended. Defaults to a no-op sink.
    pub fn sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Loading indicator hooks. Defaults to no-ops.
    pub fn indicator(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.indicator = indicator;
        self
    }

    /// Hook invoked at the start of every poll cycle; returning true
    /// clears the trigger counters (never exhaustion).
    pub fn reset_hook(mut self, hook: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.reset_hook = Arc::new(hook);
        self
    }

    /// Validate, register the scroll hook, and start polling
    pub fn attach(self) -> Result<PagerHandle, PagerError> {
        self.config.validate()?;
        let viewport = self
            .viewport
            .ok_or_else(|| PagerError::configuration("a viewport is required"))?;
        if !self.config.trigger_only && self.fetcher.is_none() {
            return Err(PagerError::configuration(
                "a fetcher is required unless trigger_only is set",
            ));
        }

        let signal = ScrollSignal::new();
        viewport.on_scroll(signal.clone());

        let (advance_tx, advance_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(PagerStatus::default());
        let cancel = CancellationToken::new();

        let task = PollTask {
            config: self.config,
            viewport,
            fetcher: self.fetcher,
            sink: self.sink,
            indicator: self.indicator,
            reset_hook: self.reset_hook,
            state: TriggerState::new(),
            signal,
            advance_tx,
            outcome_tx: outcome_tx.clone(),
            outcome_rx,
            status_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(task.run());

        Ok(PagerHandle {
            cancel,
            outcome_tx,
            advance_rx,
            status_rx,
        })
    }
}

/// Handle to an attached controller.
///
/// Dropping the handle detaches the controller.
#[derive(Debug)]
pub struct PagerHandle {
    cancel: CancellationToken,
    outcome_tx: mpsc::UnboundedSender<PageOutcome>,
    advance_rx: mpsc::UnboundedReceiver<Advance>,
    status_rx: watch::Receiver<PagerStatus>,
}

impl PagerHandle {
    /// Next emitted trigger. Returns None once the controller is detached.
    pub async fn next_advance(&mut self) -> Option<Advance> {
        self.advance_rx.recv().await
    }

    /// Report completion of a page the owner fetched itself (trigger-only
    /// mode). Ignored after detach.
    pub fn page_settled(&self, page: u64, item_count: usize) {
        let _ = self.outcome_tx.send(PageOutcome::Settled { page, item_count });
    }

    /// Report a failed page: releases the in-flight state so the next
    /// qualifying poll may retry. Ignored after detach.
    pub fn page_failed(&self, page: u64, error: PagerError) {
        let _ = self.outcome_tx.send(PageOutcome::Failed { page, error });
    }

    /// Current controller status
    pub fn status(&self) -> PagerStatus {
        *self.status_rx.borrow()
    }

    /// Wait for the status to change and return the new value. Returns
    /// None once the controller is detached.
    pub async fn status_changed(&mut self) -> Option<PagerStatus> {
        self.status_rx.changed().await.ok()?;
        Some(*self.status_rx.borrow_and_update())
    }

    /// Stop polling and remove the scroll hook. Idempotent; a completion
    /// delivered after detach mutates nothing.
    pub fn detach(&self) {
        self.cancel.cancel();
    }

    /// False once `detach` has been called
    pub fn is_attached(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for PagerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Event selected by one iteration of the poll loop
enum LoopEvent {
    Tick,
    Outcome(PageOutcome),
    Shutdown,
}

struct PollTask {
    config: PagerConfig,
    viewport: Arc<dyn Viewport>,
    fetcher: Option<Arc<dyn PageFetcher>>,
    sink: Arc<dyn PageSink>,
    indicator: Arc<dyn LoadingIndicator>,
    reset_hook: ResetHook,
    state: TriggerState,
    signal: ScrollSignal,
    advance_tx: mpsc::UnboundedSender<Advance>,
    outcome_tx: mpsc::UnboundedSender<PageOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<PageOutcome>,
    status_tx: watch::Sender<PagerStatus>,
    cancel: CancellationToken,
}

impl PollTask {
    async fn run(mut self) {
        let cancel = self.cancel.clone();
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => LoopEvent::Shutdown,
                _ = ticker.tick() => LoopEvent::Tick,
                outcome = self.outcome_rx.recv() => match outcome {
                    Some(outcome) => LoopEvent::Outcome(outcome),
                    None => LoopEvent::Shutdown,
                },
            };
            match event {
                LoopEvent::Tick => self.poll_cycle(),
                LoopEvent::Outcome(outcome) => self.apply_outcome(outcome),
                LoopEvent::Shutdown => break,
            }
        }

        self.viewport.off_scroll();
        debug!(pages = self.state.fire_count(), "pager detached");
    }

    fn poll_cycle(&mut self) {
        if (self.reset_hook)() {
            debug!("reset hook fired, clearing trigger counters");
            self.state.reset();
            self.publish_status();
        }

        let config = &self.config;
        let viewport = &self.viewport;
        let fired = self.state.poll(
            Instant::now(),
            config.min_trigger_interval(),
            &self.signal,
            || match viewport.measure() {
                Ok(measurement) => is_near_bottom(&measurement, f64::from(config.bottom_pixels)),
                Err(e) => {
                    debug!("measurement failed, treating as not near bottom: {e}");
                    false
                }
            },
        );

        if let Some(page) = fired {
            let window = PageWindow {
                offset: u64::from(config.page_size) * (page - 1),
                limit: config.page_size,
            };
            trace!(page, offset = window.offset, "trigger fired");
            let _ = self.advance_tx.send(Advance { page, window });
            self.publish_status();
            if !config.trigger_only {
                self.dispatch_fetch(page, window);
            }
        }
    }

    fn dispatch_fetch(&self, page: u64, window: PageWindow) {
        let Some(fetcher) = self.fetcher.clone() else {
            return;
        };
        let url = match self.resolve_url() {
            Ok(url) => url,
            Err(e) => {
                // Routed through the failure path so the trigger is
                // released and the poll loop keeps running.
                let _ = self.outcome_tx.send(PageOutcome::Failed { page, error: e });
                return;
            }
        };

        self.indicator.show(&self.config.loading_content);
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch_page(&url, window).await;
            let _ = outcome_tx.send(PageOutcome::Fetched { page, result });
        });
    }

    /// Explicit configured URL takes precedence over the viewport default
    fn resolve_url(&self) -> Result<Url, PagerError> {
        let raw = self
            .config
            .request_url
            .clone()
            .or_else(|| self.viewport.page_url())
            .ok_or_else(|| {
                PagerError::configuration(
                    "no request_url configured and the viewport has no default",
                )
            })?;
        Ok(Url::parse(&raw)?)
    }

    fn apply_outcome(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Fetched { page, result } => {
                let applied = result.and_then(|fetched| {
                    let item_count = self.resolve_item_count(&fetched)?;
                    Ok((fetched, item_count))
                });
                match applied {
                    Ok((fetched, item_count)) => {
                        self.apply_settled(page, item_count, Some(&fetched.payload))
                    }
                    Err(e) => self.apply_failed(page, e),
                }
                self.indicator.hide();
            }
            PageOutcome::Settled { page, item_count } => self.apply_settled(page, item_count, None),
            PageOutcome::Failed { page, error } => self.apply_failed(page, error),
        }
        self.publish_status();
    }

    /// Explicit fetcher count wins; otherwise the result selector counts
    /// matches in the payload.
    fn resolve_item_count(&self, fetched: &FetchedPage) -> Result<usize, PagerError> {
        if let Some(count) = fetched.item_count {
            return Ok(count);
        }
        match &self.config.result_selector {
            Some(selector) => markup::count_items(&fetched.payload, selector),
            None => Err(PagerError::configuration(
                "fetcher reported no item count and no result_selector is configured",
            )),
        }
    }

    fn apply_settled(&mut self, page: u64, item_count: usize, payload: Option<&str>) {
        match self.state.settle(page, item_count, self.config.page_size) {
            Settled::Stale => {
                debug!(page, "ignoring settlement for a page no longer outstanding");
            }
            settled => {
                if let Some(payload) = payload {
                    self.sink.render_page(payload);
                }
                if settled == Settled::Exhausted {
                    debug!(page, item_count, "short page, source exhausted");
                }
            }
        }
    }

    fn apply_failed(&mut self, page: u64, error: PagerError) {
        warn!(page, "page failed: {error}");
        self.state
            .fail(page, Instant::now(), &self.config.retry);
    }

    fn publish_status(&self) {
        let status = PagerStatus {
            fire_count: self.state.fire_count(),
            loading: self.state.is_loading(),
            exhausted: self.state.is_exhausted(),
        };
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
