//! Shared RPC error types for blockchain provider operations.

use alloy_primitives::B256;

use crate::types::BlockRange;

/// Errors that can occur during blockchain RPC operations.
///
/// Variants carry the provider's error text verbatim: for log queries that
/// text is load-bearing, because some providers embed a suggested narrower
/// block range in it and the acquisition stage feeds the message to a
/// [`RangeHint`](crate::events::RangeHint) parser before deciding how to
/// subdivide.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Failed to fetch logs for a block range.
    ///
    /// This can occur due to rate limiting, oversized block ranges, network
    /// connectivity issues, or provider-side errors. The acquisition stage
    /// treats this as a signal to subdivide, never as immediately fatal
    /// (unless the range is a single block).
    #[error("Failed to fetch logs for blocks {range}: {message}")]
    GetLogsFailed {
        /// Block range the failed query covered
        range: BlockRange,
        /// The provider error text, verbatim
        message: String,
    },

    /// Receipt was not found for a transaction.
    ///
    /// This can occur if the provider has not indexed the receipt yet; the
    /// validation stage retries it like any other transient failure.
    #[error("Receipt not found for transaction: {tx_hash}")]
    ReceiptNotFound {
        /// The transaction hash whose receipt wasn't found
        tx_hash: B256,
    },

    /// Failed to fetch a transaction receipt.
    #[error("Failed to fetch receipt for transaction {tx_hash}: {message}")]
    GetReceiptFailed {
        /// The transaction hash we tried to fetch
        tx_hash: B256,
        /// The provider error text
        message: String,
    },

    /// Failed to fetch the current block number from the blockchain.
    ///
    /// This typically indicates a connectivity issue or provider problem.
    #[error("Failed to get current block number: {message}")]
    GetBlockNumberFailed {
        /// The provider error text
        message: String,
    },
}

impl RpcError {
    /// Helper to create a `GetLogsFailed` error from any displayable error.
    pub fn get_logs_failed(range: BlockRange, source: impl std::fmt::Display) -> Self {
        RpcError::GetLogsFailed {
            range,
            message: source.to_string(),
        }
    }

    /// Helper to create a `GetReceiptFailed` error from any displayable error.
    pub fn get_receipt_failed(tx_hash: B256, source: impl std::fmt::Display) -> Self {
        RpcError::GetReceiptFailed {
            tx_hash,
            message: source.to_string(),
        }
    }

    /// Helper to create a `GetBlockNumberFailed` error from any displayable error.
    pub fn get_block_number_failed(source: impl std::fmt::Display) -> Self {
        RpcError::GetBlockNumberFailed {
            message: source.to_string(),
        }
    }

    /// The provider error text attached to this error, if any.
    ///
    /// Hint parsers inspect this to recover a server-suggested block range.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            RpcError::GetLogsFailed { message, .. }
            | RpcError::GetReceiptFailed { message, .. }
            | RpcError::GetBlockNumberFailed { message } => Some(message),
            RpcError::ReceiptNotFound { .. } => None,
        }
    }
}
