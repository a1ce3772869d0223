//! Integration tests for severity threshold filtering.
//!
//! These tests verify that a logger writes exactly the events whose rank is at
//! or above its threshold, however the threshold was expressed.

use logging::{DEBUG, ERROR, FATAL, Filter, INFO, Logger, SeverityModel, WARN};
use logging_sink::{OutputChain, SharedBuffer};
use proptest::prelude::*;

fn capture() -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    (
        Logger::new(OutputChain::builder(buffer.clone()).build()),
        buffer,
    )
}

// ============================================================================
// Threshold Ordering
// ============================================================================

/// Verifies a warn threshold writes nothing for info and formats error.
#[test]
fn warn_threshold_drops_info_and_writes_error() {
    let (logger, buffer) = capture();
    logger.set_threshold(WARN).expect("known level");

    logger.info("x");
    assert_eq!(buffer.contents().len(), 0);

    logger.named("payments").error("card declined");
    let output = buffer.contents_lossy();
    assert!(output.contains("error: payments"));
    assert!(output.contains("| card declined"));
}

/// Verifies each standard level passes exactly the levels at or above it.
#[test]
fn each_threshold_passes_levels_at_or_above() {
    let levels = [DEBUG, INFO, WARN, ERROR, FATAL];
    for threshold in levels {
        let filter = Filter::standard();
        filter.set_threshold(threshold).expect("known level");
        for level in levels {
            assert_eq!(
                filter.accepts(level),
                level >= threshold,
                "threshold {threshold} level {level}"
            );
        }
    }
}

/// Verifies integers past the last rank silence even fatal.
#[test]
fn integer_above_max_silences_fatal() {
    let (logger, buffer) = capture();
    logger.set_threshold(5).expect("integer");
    logger.fatal("never");
    assert!(buffer.is_empty());
}

/// Verifies string integers behave like integers.
#[test]
fn string_integers_are_accepted() {
    let filter = Filter::standard();
    assert_eq!(filter.set_threshold("2"), Ok(2));
    assert!(!filter.accepts(INFO));
    assert!(filter.accepts(WARN));
}

// ============================================================================
// Shared Thresholds
// ============================================================================

/// Verifies a threshold change through one handle is seen by every clone.
#[test]
fn threshold_changes_are_shared_between_clones() {
    let (logger, buffer) = capture();
    let worker = logger.named("worker");
    logger.set_threshold(ERROR).expect("known level");

    worker.warn("dropped");
    worker.error("kept");

    let output = buffer.contents_lossy();
    assert!(!output.contains("dropped"));
    assert!(output.contains("kept"));
}

/// Verifies thresholds can be changed from other threads.
#[test]
fn threshold_is_visible_across_threads() {
    let (logger, _buffer) = capture();
    let remote = logger.clone();
    std::thread::spawn(move || remote.set_threshold(FATAL).expect("known level"))
        .join()
        .expect("thread");
    assert_eq!(logger.threshold(), 4);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The stored threshold is always a defined rank or the silent rank.
    #[test]
    fn stored_threshold_is_canonical(value in -100i32..100) {
        let filter = Filter::standard();
        let stored = filter.set_threshold(value).expect("integers never fail");
        prop_assert!((0..=5).contains(&stored));
    }

    /// Canonicalizing never changes which levels pass.
    #[test]
    fn canonical_threshold_preserves_acceptance(
        value in -20i32..60,
        ranks in proptest::collection::btree_set(0i32..50, 1..6),
    ) {
        const NAMES: [&str; 6] = ["l0", "l1", "l2", "l3", "l4", "l5"];
        let model = SeverityModel::new(NAMES.iter().copied().zip(ranks.iter().copied()))
            .expect("unique ranks and names");
        let filter = Filter::new(model.clone());
        filter.set_threshold(value).expect("integers never fail");

        for level in model.levels() {
            prop_assert_eq!(filter.accepts(*level), level.rank() >= value);
        }
    }

    /// Named thresholds and their ranks are interchangeable.
    #[test]
    fn names_and_ranks_agree(index in 0usize..5) {
        let level = SeverityModel::STANDARD.levels()[index];
        let by_name = Filter::standard();
        let by_rank = Filter::standard();
        by_name.set_threshold(level.name()).expect("known level");
        by_rank.set_threshold(level.rank()).expect("integer");
        prop_assert_eq!(by_name.threshold(), by_rank.threshold());
    }
}
