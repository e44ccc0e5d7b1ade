//! Test helpers for claimscan integration tests
//!
//! Provides a mock event source so acquisition, validation, and assembly
//! can be exercised without a real blockchain connection.

// Each integration test binary compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use claimscan::{BlockRange, EventSource, ReceiptSummary, RpcError, TransferEvent, TransferFilter};

static TRACING: Once = Once::new();

/// Installs a fmt subscriber honoring `RUST_LOG`, once per test binary, so
/// pipeline logs are visible when a test is run with logging enabled.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// How the mock phrases its "range too large" rejections.
#[derive(Debug, Clone, Copy)]
pub enum RejectionStyle {
    /// Generic error text with no recoverable hint; forces bisection.
    Generic,
    /// Alchemy-style message embedding the prefix the server would accept.
    AlchemyHint,
}

/// Mock [`EventSource`] with controllable failure behavior.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockEventSource::new(1_000)
///     .with_max_span(100, RejectionStyle::AlchemyHint)
///     .with_events(filter, events)
///     .with_receipt(tx_hash, vec![topic]);
/// ```
pub struct MockEventSource {
    tip: u64,
    events: HashMap<(Address, Address), Vec<TransferEvent>>,
    /// Reject any query spanning more than this many blocks
    max_span: Option<(u64, RejectionStyle)>,
    /// Blocks whose queries always fail, even at span 1
    poisoned_blocks: HashSet<u64>,
    /// Receipt topics per transaction (absent means no logs)
    receipts: HashMap<B256, Vec<B256>>,
    /// Remaining failures to serve per transaction before succeeding
    receipt_failures: Mutex<HashMap<B256, u32>>,
    log_calls: Mutex<u64>,
    receipt_calls: Mutex<u64>,
}

impl MockEventSource {
    pub fn new(tip: u64) -> Self {
        init_tracing();
        Self {
            tip,
            events: HashMap::new(),
            max_span: None,
            poisoned_blocks: HashSet::new(),
            receipts: HashMap::new(),
            receipt_failures: Mutex::new(HashMap::new()),
            log_calls: Mutex::new(0),
            receipt_calls: Mutex::new(0),
        }
    }

    /// Registers events served for a filter, kept sorted by block.
    pub fn with_events(mut self, filter: TransferFilter, mut events: Vec<TransferEvent>) -> Self {
        events.sort_by_key(|e| e.block_number);
        self.events.insert((filter.token, filter.recipient), events);
        self
    }

    /// Rejects queries spanning more than `span` blocks.
    pub fn with_max_span(mut self, span: u64, style: RejectionStyle) -> Self {
        self.max_span = Some((span, style));
        self
    }

    /// Makes every query touching `block` fail, even single-block ones.
    pub fn with_poisoned_block(mut self, block: u64) -> Self {
        self.poisoned_blocks.insert(block);
        self
    }

    /// Sets the receipt topics for a transaction.
    pub fn with_receipt(mut self, tx_hash: B256, topics: Vec<B256>) -> Self {
        self.receipts.insert(tx_hash, topics);
        self
    }

    /// Makes the first `failures` receipt fetches for `tx_hash` fail.
    pub fn with_receipt_failures(self, tx_hash: B256, failures: u32) -> Self {
        self.receipt_failures
            .lock()
            .unwrap()
            .insert(tx_hash, failures);
        self
    }

    pub fn log_calls(&self) -> u64 {
        *self.log_calls.lock().unwrap()
    }

    pub fn receipt_calls(&self) -> u64 {
        *self.receipt_calls.lock().unwrap()
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn fetch_logs(
        &self,
        filter: &TransferFilter,
        range: BlockRange,
    ) -> Result<Vec<TransferEvent>, RpcError> {
        *self.log_calls.lock().unwrap() += 1;

        if self
            .poisoned_blocks
            .iter()
            .any(|b| range.from <= *b && *b <= range.to)
        {
            return Err(RpcError::get_logs_failed(range, "backend unavailable"));
        }

        if let Some((span, style)) = self.max_span {
            if range.len() > span {
                let message = match style {
                    RejectionStyle::Generic => "query returned more than 10000 results".to_string(),
                    RejectionStyle::AlchemyHint => format!(
                        "Log response size exceeded. this block range should work: \
                         [0x{:x}, 0x{:x}]",
                        range.from,
                        range.from + span - 1
                    ),
                };
                return Err(RpcError::get_logs_failed(range, message));
            }
        }

        Ok(self
            .events
            .get(&(filter.token, filter.recipient))
            .map(|events| {
                events
                    .iter()
                    .filter(|e| range.from <= e.block_number && e.block_number <= range.to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_receipt(&self, tx_hash: B256) -> Result<ReceiptSummary, RpcError> {
        *self.receipt_calls.lock().unwrap() += 1;

        let mut failures = self.receipt_failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(&tx_hash) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(RpcError::get_receipt_failed(tx_hash, "connection reset"));
            }
        }

        Ok(ReceiptSummary {
            transaction_hash: tx_hash,
            log_topics: self.receipts.get(&tx_hash).cloned().unwrap_or_default(),
        })
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        Ok(self.tip)
    }
}

/// A transfer event with distinct, recognizable fields.
pub fn transfer(from_byte: u8, amount: u64, block: u64, tx_byte: u8) -> TransferEvent {
    TransferEvent {
        from: Address::repeat_byte(from_byte),
        amount: U256::from(amount),
        block_number: block,
        transaction_hash: B256::repeat_byte(tx_byte),
    }
}

/// One synthetic event per block in `[from, to]`, for coverage checks.
pub fn one_event_per_block(from: u64, to: u64) -> Vec<TransferEvent> {
    (from..=to)
        .map(|block| TransferEvent {
            from: Address::repeat_byte(1),
            amount: U256::from(1u64),
            block_number: block,
            transaction_hash: B256::with_last_byte((block % 251) as u8),
        })
        .collect()
}
