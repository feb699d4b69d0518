//! Property-based tests for the trigger state machine.
//!
//! These drive random sequences of scroll events, poll cycles, settlements,
//! failures, and resets against `TriggerState` and check that the core
//! pagination invariants hold across all of them:
//! - at most one page outstanding at any time
//! - a minimum interval between any two consecutive triggers
//! - page indices strictly increasing within a reset span
//! - exhaustion is terminal

use std::time::Duration;

use proptest::prelude::*;
use tokio::time::Instant;

use bottomless_core::config::RetryPolicy;
use bottomless_core::state::{Settled, TriggerState};
use bottomless_core::viewport::ScrollSignal;

const PAGE_SIZE: u32 = 20;
const MIN_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
enum Op {
    Scroll,
    Poll { advance_ms: u64, near_bottom: bool },
    Settle { item_count: usize },
    Fail,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Scroll),
        5 => (0u64..400, any::<bool>()).prop_map(|(advance_ms, near_bottom)| Op::Poll {
            advance_ms,
            near_bottom,
        }),
        3 => (0usize..40).prop_map(|item_count| Op::Settle { item_count }),
        1 => Just(Op::Fail),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 300,
        ..ProptestConfig::default()
    })]

    /// Property: across any event sequence, no second trigger fires while
    /// one is outstanding, consecutive triggers are spaced by at least the
    /// minimum interval, page indices count up sequentially, and nothing
    /// fires after exhaustion.
    #[test]
    fn prop_trigger_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let signal = ScrollSignal::new();
        let mut state = TriggerState::new();
        let mut clock = Instant::now();

        // Shadow model of what the controller layer would track
        let mut outstanding: Option<u64> = None;
        let mut last_fired_at: Option<Instant> = None;
        let mut last_page: u64 = 0;
        let mut exhausted = false;

        for op in ops {
            match op {
                Op::Scroll => signal.raise(),
                Op::Poll { advance_ms, near_bottom } => {
                    clock += Duration::from_millis(advance_ms);
                    if let Some(page) = state.poll(clock, MIN_INTERVAL, &signal, || near_bottom) {
                        prop_assert!(
                            outstanding.is_none(),
                            "trigger fired while page {:?} was outstanding",
                            outstanding
                        );
                        prop_assert!(!exhausted, "trigger fired after exhaustion");
                        if let Some(previous) = last_fired_at {
                            prop_assert!(
                                clock.duration_since(previous) >= MIN_INTERVAL,
                                "triggers spaced closer than the minimum interval"
                            );
                        }
                        prop_assert_eq!(page, last_page + 1, "page index skipped or repeated");
                        outstanding = Some(page);
                        last_fired_at = Some(clock);
                        last_page = page;
                    }
                }
                Op::Settle { item_count } => {
                    if let Some(page) = outstanding.take() {
                        let settled = state.settle(page, item_count, PAGE_SIZE);
                        if item_count < PAGE_SIZE as usize {
                            prop_assert_eq!(settled, Settled::Exhausted);
                            exhausted = true;
                        } else {
                            prop_assert_eq!(settled, Settled::Idle);
                        }
                    }
                }
                Op::Fail => {
                    if let Some(page) = outstanding.take() {
                        state.fail(page, clock, &RetryPolicy::Immediate);
                    }
                }
                Op::Reset => {
                    state.reset();
                    outstanding = None;
                    last_fired_at = None;
                    last_page = 0;
                    // exhaustion survives the reset by design
                }
            }
        }

        prop_assert_eq!(state.is_exhausted(), exhausted);
        prop_assert_eq!(state.is_loading(), outstanding.is_some());
    }

    /// Property: settlements and failures for pages that were never
    /// outstanding are inert, whatever their index or count.
    #[test]
    fn prop_stale_reports_are_inert(
        pages in prop::collection::vec((0u64..100, 0usize..40), 1..50),
    ) {
        let mut state = TriggerState::new();
        let clock = Instant::now();

        for (page, item_count) in pages {
            prop_assert_eq!(state.settle(page, item_count, PAGE_SIZE), Settled::Stale);
            state.fail(page, clock, &RetryPolicy::Delay { millis: 60_000 });
        }

        prop_assert_eq!(state.fire_count(), 0);
        prop_assert!(!state.is_loading());
        prop_assert!(!state.is_exhausted());

        // The machine still works normally afterwards.
        let signal = ScrollSignal::new();
        signal.raise();
        prop_assert_eq!(state.poll(clock, MIN_INTERVAL, &signal, || true), Some(1));
    }

    /// Property: once any settlement comes back short, no continuation of
    /// scrolling and polling ever fires again.
    #[test]
    fn prop_exhaustion_is_terminal(
        short_count in 0usize..20,
        tail_polls in 1usize..60,
    ) {
        let signal = ScrollSignal::new();
        let mut state = TriggerState::new();
        let mut clock = Instant::now();

        signal.raise();
        let page = state.poll(clock, MIN_INTERVAL, &signal, || true).expect("first trigger");
        prop_assert_eq!(state.settle(page, short_count, PAGE_SIZE), Settled::Exhausted);

        for _ in 0..tail_polls {
            clock += Duration::from_secs(1);
            signal.raise();
            prop_assert_eq!(state.poll(clock, MIN_INTERVAL, &signal, || true), None);
        }
        prop_assert_eq!(state.fire_count(), 1);
    }
}
