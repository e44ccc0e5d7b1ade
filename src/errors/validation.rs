//! Error types for receipt-based event validation.

use alloy_primitives::B256;

use super::RpcError;

/// Errors that can occur while validating events against their receipts.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A receipt fetch kept failing until the retry budget ran out.
    ///
    /// Transient provider flakiness is absorbed by bounded retries with
    /// exponential backoff (see [`RetryConfig`](crate::config::RetryConfig));
    /// exhausting the budget indicates a persistent outage and aborts the
    /// pipeline rather than stalling it indefinitely.
    #[error("Receipt fetch for {tx_hash} failed after {attempts} attempts")]
    RetriesExhausted {
        /// Transaction whose receipt could not be fetched
        tx_hash: B256,
        /// Total attempts made, including the initial request
        attempts: u32,
        /// The provider error for the final attempt
        #[source]
        last_error: RpcError,
    },
}
