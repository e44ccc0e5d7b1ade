//! Core data types shared across the acquisition and assembly stages.

use alloy_primitives::{Address, B256, U256};

/// An inclusive range of block numbers.
///
/// Ranges are created by [`RangeFetcher`](crate::events::RangeFetcher) as it
/// subdivides a query and are never persisted. The invariant `from <= to`
/// holds for every range the fetcher issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRange {
    /// First block in the range (inclusive)
    pub from: u64,
    /// Last block in the range (inclusive)
    pub to: u64,
}

impl BlockRange {
    /// Creates a new inclusive block range.
    ///
    /// # Panics
    ///
    /// Panics if `from > to`; callers construct ranges only after checking
    /// the ordering (the fetcher's empty-range base case returns before any
    /// range is built).
    pub fn new(from: u64, to: u64) -> Self {
        assert!(from <= to, "invalid block range: {from} > {to}");
        Self { from, to }
    }

    /// Number of blocks covered by this range, always at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &BlockRange) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    /// Midpoint used when bisecting a failed query.
    pub fn midpoint(&self) -> u64 {
        self.from + (self.to - self.from) / 2
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

/// A decoded ERC-20 `Transfer` event relevant to one asset flow.
///
/// Produced by the fetcher, optionally dropped by the validator, and summed
/// into a [`Ledger`](crate::ledger::Ledger). Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// Address the tokens were sent from (the claimant)
    pub from: Address,
    /// Raw token amount transferred (not normalized for decimals)
    pub amount: U256,
    /// Block the transfer was mined in
    pub block_number: u64,
    /// Hash of the transaction that emitted the event
    pub transaction_hash: B256,
}
