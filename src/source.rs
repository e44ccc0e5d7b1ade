//! The event-source seam between the pipeline and the RPC transport.
//!
//! The acquisition and validation stages talk to the chain exclusively
//! through the [`EventSource`] trait, which exposes the three operations the
//! pipeline needs: fetch matching logs over a block range, fetch a
//! transaction receipt, and read the chain tip. [`RpcEventSource`] implements
//! the trait over any Alloy provider; tests substitute mock sources.

use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use alloy_rpc_types::Filter;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::RpcError;
use crate::event::Transfer;
use crate::types::{BlockRange, TransferEvent};

/// Parameters identifying the transfers one asset flow cares about:
/// `Transfer` events emitted by `token` whose recipient is `recipient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFilter {
    /// Token contract emitting the events
    pub token: Address,
    /// Recipient address the transfers were sent to
    pub recipient: Address,
}

/// Minimal view of a transaction receipt: the topics of every log the
/// transaction emitted, flattened. This is all the disqualification
/// predicate inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    /// Hash of the transaction this receipt belongs to
    pub transaction_hash: B256,
    /// Topics of all logs in the receipt, in emission order
    pub log_topics: Vec<B256>,
}

impl ReceiptSummary {
    /// Whether any log in the receipt carried the given topic.
    pub fn has_topic(&self, topic: B256) -> bool {
        self.log_topics.contains(&topic)
    }
}

/// Read-only access to historical chain data.
///
/// Log-query errors must carry the provider's error text (see
/// [`RpcError::provider_message`]) so that range-hint parsers can inspect it.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch and decode all matching `Transfer` events in `range`,
    /// block-ascending.
    async fn fetch_logs(
        &self,
        filter: &TransferFilter,
        range: BlockRange,
    ) -> Result<Vec<TransferEvent>, RpcError>;

    /// Fetch the receipt for a transaction.
    async fn fetch_receipt(&self, tx_hash: B256) -> Result<ReceiptSummary, RpcError>;

    /// Current chain tip.
    async fn block_number(&self) -> Result<u64, RpcError>;
}

/// [`EventSource`] implementation over an Alloy provider.
///
/// # Examples
///
/// ```rust,ignore
/// use claimscan::RpcEventSource;
/// use alloy_provider::ProviderBuilder;
///
/// let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
/// let source = RpcEventSource::new(provider.root().clone());
/// ```
pub struct RpcEventSource<P> {
    provider: P,
}

impl<P: Provider> RpcEventSource<P> {
    /// Creates a new source over the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> EventSource for RpcEventSource<P> {
    async fn fetch_logs(
        &self,
        filter: &TransferFilter,
        range: BlockRange,
    ) -> Result<Vec<TransferEvent>, RpcError> {
        let rpc_filter = Filter::new()
            .address(filter.token)
            .event_signature(Transfer::SIGNATURE_HASH)
            .topic2(filter.recipient)
            .from_block(range.from)
            .to_block(range.to);

        let logs = self
            .provider
            .get_logs(&rpc_filter)
            .await
            .map_err(|e| RpcError::get_logs_failed(range, e))?;

        debug!(
            token = %filter.token,
            recipient = %filter.recipient,
            range = %range,
            logs_count = logs.len(),
            "Fetched logs for range"
        );

        let mut events = Vec::with_capacity(logs.len());
        for log in logs {
            let (Some(block_number), Some(transaction_hash)) =
                (log.block_number, log.transaction_hash)
            else {
                warn!(?log, "Skipping pending log without block metadata");
                continue;
            };

            match Transfer::decode_log(&log.inner) {
                Ok(event) => events.push(TransferEvent {
                    from: event.from,
                    amount: event.value,
                    block_number,
                    transaction_hash,
                }),
                Err(e) => {
                    // The filter pins topic0 to the Transfer signature, so a
                    // decode failure means a malformed log, not a mismatch.
                    warn!(error = ?e, "Failed to decode Transfer log");
                }
            }
        }

        Ok(events)
    }

    async fn fetch_receipt(&self, tx_hash: B256) -> Result<ReceiptSummary, RpcError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| RpcError::get_receipt_failed(tx_hash, e))?
            .ok_or(RpcError::ReceiptNotFound { tx_hash })?;

        let log_topics = receipt
            .inner
            .logs()
            .iter()
            .flat_map(|log| log.inner.data.topics().iter().copied())
            .collect();

        Ok(ReceiptSummary {
            transaction_hash: tx_hash,
            log_topics,
        })
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.provider
            .get_block_number()
            .await
            .map_err(RpcError::get_block_number_failed)
    }
}
