//! Acquisition-stage tests: adaptive range subdivision against providers
//! with result caps, hints, and outright failures.

mod helpers;

use alloy_primitives::Address;
use claimscan::{
    AcquisitionError, AlchemyRangeHint, NoRangeHint, RangeFetcher, TransferFilter,
};
use helpers::{one_event_per_block, MockEventSource, RejectionStyle};
use proptest::prelude::*;

fn filter() -> TransferFilter {
    TransferFilter {
        token: Address::repeat_byte(0xaa),
        recipient: Address::repeat_byte(0xbb),
    }
}

/// Asserts the fetch covered `[from, to]` exactly once, ascending.
fn assert_exact_coverage(events: &[claimscan::TransferEvent], from: u64, to: u64) {
    let blocks: Vec<u64> = events.iter().map(|e| e.block_number).collect();
    let expected: Vec<u64> = (from..=to).collect();
    assert_eq!(blocks, expected);
}

#[tokio::test]
async fn fetches_whole_range_in_one_call_when_provider_allows() {
    let source =
        MockEventSource::new(100).with_events(filter(), one_event_per_block(0, 100));

    let fetcher = RangeFetcher::new(&source, &NoRangeHint);
    let events = fetcher.fetch_all(&filter(), 0, 100).await.unwrap();

    assert_exact_coverage(&events, 0, 100);
    assert_eq!(source.log_calls(), 1);
}

#[tokio::test]
async fn empty_range_returns_no_events_and_makes_no_calls() {
    let source = MockEventSource::new(100);
    let fetcher = RangeFetcher::new(&source, &NoRangeHint);

    let events = fetcher.fetch_all(&filter(), 10, 9).await.unwrap();

    assert!(events.is_empty());
    assert_eq!(source.log_calls(), 0);
}

#[tokio::test]
async fn bisects_until_provider_accepts() {
    let source = MockEventSource::new(200)
        .with_events(filter(), one_event_per_block(0, 200))
        .with_max_span(16, RejectionStyle::Generic);

    let fetcher = RangeFetcher::new(&source, &NoRangeHint);
    let events = fetcher.fetch_all(&filter(), 0, 200).await.unwrap();

    assert_exact_coverage(&events, 0, 200);
}

#[tokio::test]
async fn follows_provider_hints_when_available() {
    let source = MockEventSource::new(200)
        .with_events(filter(), one_event_per_block(0, 200))
        .with_max_span(16, RejectionStyle::AlchemyHint);

    let fetcher = RangeFetcher::new(&source, &AlchemyRangeHint);
    let events = fetcher.fetch_all(&filter(), 0, 200).await.unwrap();

    assert_exact_coverage(&events, 0, 200);
}

#[tokio::test]
async fn hints_cost_fewer_requests_than_bisection() {
    let build = |style| {
        MockEventSource::new(1000)
            .with_events(filter(), one_event_per_block(0, 1000))
            .with_max_span(10, style)
    };

    let hinted = build(RejectionStyle::AlchemyHint);
    RangeFetcher::new(&hinted, &AlchemyRangeHint)
        .fetch_all(&filter(), 0, 1000)
        .await
        .unwrap();

    let blind = build(RejectionStyle::Generic);
    RangeFetcher::new(&blind, &NoRangeHint)
        .fetch_all(&filter(), 0, 1000)
        .await
        .unwrap();

    assert!(
        hinted.log_calls() < blind.log_calls(),
        "hinted fetch took {} calls, bisection {}",
        hinted.log_calls(),
        blind.log_calls()
    );
}

#[tokio::test]
async fn hint_messages_without_a_hint_parser_still_converge() {
    // Provider emits hints but the pipeline was configured with the no-op
    // parser: bisection must still cover the range.
    let source = MockEventSource::new(100)
        .with_events(filter(), one_event_per_block(0, 100))
        .with_max_span(8, RejectionStyle::AlchemyHint);

    let fetcher = RangeFetcher::new(&source, &NoRangeHint);
    let events = fetcher.fetch_all(&filter(), 0, 100).await.unwrap();

    assert_exact_coverage(&events, 0, 100);
}

#[tokio::test]
async fn single_block_failure_is_fatal() {
    let source = MockEventSource::new(50)
        .with_events(filter(), one_event_per_block(0, 50))
        .with_poisoned_block(17);

    let fetcher = RangeFetcher::new(&source, &NoRangeHint);
    let result = fetcher.fetch_all(&filter(), 0, 50).await;

    match result {
        Err(AcquisitionError::SingleBlockFailed { block, .. }) => assert_eq!(block, 17),
        other => panic!("expected SingleBlockFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn single_block_range_success_needs_no_subdivision() {
    let source = MockEventSource::new(50)
        .with_events(filter(), one_event_per_block(0, 50))
        .with_max_span(1, RejectionStyle::Generic);

    let fetcher = RangeFetcher::new(&source, &NoRangeHint);
    let events = fetcher.fetch_all(&filter(), 7, 7).await.unwrap();

    assert_exact_coverage(&events, 7, 7);
    assert_eq!(source.log_calls(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // For any range and any provider cap, with or without hints, the
    // concatenated output covers every block exactly once, ascending.
    #[test]
    fn prop_range_coverage_is_exact(
        from in 0u64..300,
        len in 0u64..120,
        span in 1u64..40,
        hinted in any::<bool>(),
    ) {
        let to = from + len;
        let style = if hinted {
            RejectionStyle::AlchemyHint
        } else {
            RejectionStyle::Generic
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        runtime.block_on(async {
            let source = MockEventSource::new(to)
                .with_events(filter(), one_event_per_block(from, to))
                .with_max_span(span, style);

            let events = if hinted {
                RangeFetcher::new(&source, &AlchemyRangeHint)
                    .fetch_all(&filter(), from, to)
                    .await
                    .unwrap()
            } else {
                RangeFetcher::new(&source, &NoRangeHint)
                    .fetch_all(&filter(), from, to)
                    .await
                    .unwrap()
            };

            let blocks: Vec<u64> = events.iter().map(|e| e.block_number).collect();
            let expected: Vec<u64> = (from..=to).collect();
            assert_eq!(blocks, expected);
        });
    }
}
