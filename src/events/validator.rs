//! Receipt-based event validation.
//!
//! Some transfers into a flow's recipient are an artifact of a separate
//! recorded action (a migration or stake call) that is already credited
//! under another token flow. Those transactions are recognizable by a
//! marker log topic in their receipt and must be excluded, or the same
//! economic event would be credited twice.

use alloy_primitives::B256;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::ClaimscanConfig;
use crate::errors::ValidationError;
use crate::source::{EventSource, ReceiptSummary};
use crate::types::TransferEvent;

/// Filters a candidate event set by inspecting each event's transaction
/// receipt with a disqualification predicate.
///
/// Receipt fetches run through a bounded worker pool
/// ([`ClaimscanConfig::validator_concurrency`], default 10) and are retried
/// with exponential backoff up to the configured budget. Result order does
/// not match input order; downstream aggregation is commutative.
pub struct EventValidator<'a, S: EventSource + ?Sized> {
    source: &'a S,
    config: &'a ClaimscanConfig,
}

impl<'a, S: EventSource + ?Sized> EventValidator<'a, S> {
    /// Creates a validator over `source` with the given pool and retry
    /// configuration.
    pub fn new(source: &'a S, config: &'a ClaimscanConfig) -> Self {
        Self { source, config }
    }

    /// Keep each event iff `is_disqualified` returns false for its receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RetriesExhausted`] if any receipt fetch
    /// keeps failing past the retry budget. The whole validation pass fails;
    /// no partial result is produced.
    pub async fn validate<F>(
        &self,
        events: Vec<TransferEvent>,
        is_disqualified: F,
    ) -> Result<Vec<TransferEvent>, ValidationError>
    where
        F: Fn(&ReceiptSummary) -> bool + Send + Sync,
    {
        let total = events.len();
        info!(events_count = total, "Starting receipt validation");

        let predicate = &is_disqualified;
        let kept: Vec<Option<TransferEvent>> = stream::iter(events)
            .map(|event| async move {
                let receipt = self.fetch_receipt_with_retry(event.transaction_hash).await?;
                if predicate(&receipt) {
                    debug!(
                        tx_hash = %event.transaction_hash,
                        "Excluding disqualified transfer"
                    );
                    Ok(None)
                } else {
                    Ok(Some(event))
                }
            })
            .buffer_unordered(self.config.validator_concurrency)
            .try_collect()
            .await?;

        let valid: Vec<TransferEvent> = kept.into_iter().flatten().collect();
        info!(
            events_count = total,
            valid_count = valid.len(),
            excluded_count = total - valid.len(),
            "Finished receipt validation"
        );

        Ok(valid)
    }

    /// Fetch one receipt, retrying transient failures with backoff.
    async fn fetch_receipt_with_retry(
        &self,
        tx_hash: B256,
    ) -> Result<ReceiptSummary, ValidationError> {
        let retry = &self.config.retry;
        let mut attempt = 0u32;

        loop {
            match self.source.fetch_receipt(tx_hash).await {
                Ok(receipt) => {
                    if attempt > 0 {
                        debug!(%tx_hash, attempt, "Receipt fetch succeeded after retry");
                    }
                    return Ok(receipt);
                }
                Err(error) => {
                    if attempt >= retry.max_retries {
                        return Err(ValidationError::RetriesExhausted {
                            tx_hash,
                            attempts: attempt + 1,
                            last_error: error,
                        });
                    }

                    let delay = retry.backoff(attempt);
                    warn!(
                        %tx_hash,
                        error = %error,
                        attempt = attempt + 1,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis(),
                        "Receipt fetch failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
