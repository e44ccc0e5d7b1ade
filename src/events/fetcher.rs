//! Adaptive historical log retrieval.
//!
//! A single `eth_getLogs` call over the full history of a token is rejected
//! by every real provider. The fetcher starts with the whole range anyway
//! and subdivides on failure: a provider hint narrows the range precisely
//! when one is available, otherwise the range is bisected. Subdivision
//! bottoms out at single-block ranges; a single block that still fails is a
//! fatal [`AcquisitionError`].

use tracing::{debug, info, warn};

use crate::errors::AcquisitionError;
use crate::events::hint::RangeHint;
use crate::source::{EventSource, TransferFilter};
use crate::types::{BlockRange, TransferEvent};

/// Retrieves all matching events over a block range, splitting the range
/// whenever the provider rejects an oversized query.
///
/// The returned events cover `[from, to]` exactly once, block-ascending.
/// Ordering within a block follows the provider's log order; downstream
/// aggregation is commutative and does not rely on it.
///
/// # Examples
///
/// ```rust,ignore
/// use claimscan::{AlchemyRangeHint, RangeFetcher, TransferFilter};
///
/// let fetcher = RangeFetcher::new(&source, &AlchemyRangeHint);
/// let events = fetcher.fetch_all(&filter, 0, tip).await?;
/// ```
pub struct RangeFetcher<'a, S: EventSource + ?Sized> {
    source: &'a S,
    hint: &'a dyn RangeHint,
}

impl<'a, S: EventSource + ?Sized> RangeFetcher<'a, S> {
    /// Creates a fetcher over `source`, consulting `hint` on failed queries.
    pub fn new(source: &'a S, hint: &'a dyn RangeHint) -> Self {
        Self { source, hint }
    }

    /// Fetch all matching events in `[from, to]` inclusive.
    ///
    /// An empty range (`from > to`) yields an empty vector. A sub-range
    /// failure is never surfaced while the range can still be subdivided;
    /// only a failing single-block query aborts the run.
    pub async fn fetch_all(
        &self,
        filter: &TransferFilter,
        from: u64,
        to: u64,
    ) -> Result<Vec<TransferEvent>, AcquisitionError> {
        if from > to {
            return Ok(Vec::new());
        }

        info!(
            token = %filter.token,
            recipient = %filter.recipient,
            from_block = from,
            to_block = to,
            "Starting adaptive log fetch"
        );

        // Worklist of sub-ranges still to cover. Popping from the back and
        // pushing the right-hand remainder first keeps processing order
        // block-ascending, so plain concatenation of results is sorted.
        let mut pending = vec![BlockRange::new(from, to)];
        let mut events = Vec::new();

        while let Some(range) = pending.pop() {
            debug!(range = %range, "Fetching logs for sub-range");

            let error = match self.source.fetch_logs(filter, range).await {
                Ok(mut batch) => {
                    debug!(range = %range, events_count = batch.len(), "Sub-range fetched");
                    events.append(&mut batch);
                    continue;
                }
                Err(error) => error,
            };

            if range.len() == 1 {
                return Err(AcquisitionError::SingleBlockFailed {
                    block: range.from,
                    source: error,
                });
            }

            match self.usable_hint(&error, range) {
                Some(hinted) => {
                    debug!(range = %range, hinted = %hinted, "Provider suggested a narrower range");
                    // Remainder after the hinted prefix, then the hinted
                    // range itself on top so it is fetched first.
                    pending.push(BlockRange::new(hinted.to + 1, range.to));
                    pending.push(hinted);
                }
                None => {
                    let mid = range.midpoint();
                    debug!(range = %range, mid, "Bisecting failed range");
                    pending.push(BlockRange::new(mid + 1, range.to));
                    pending.push(BlockRange::new(range.from, mid));
                }
            }
        }

        info!(
            token = %filter.token,
            total_events = events.len(),
            "Finished adaptive log fetch"
        );

        Ok(events)
    }

    /// A hint is only usable if it is a strict prefix of the failed range:
    /// it must start at the same block and end strictly earlier, so the
    /// remainder `[hinted.to + 1, range.to]` covers the rest exactly once.
    /// Anything else (out of bounds, inverted, or the full range again)
    /// falls back to bisection to guarantee progress.
    fn usable_hint(
        &self,
        error: &crate::errors::RpcError,
        range: BlockRange,
    ) -> Option<BlockRange> {
        let message = error.provider_message()?;
        let hinted = self.hint.suggested_range(message)?;
        if hinted.from == range.from && hinted.to < range.to {
            Some(hinted)
        } else {
            warn!(range = %range, hinted = %hinted, "Ignoring unusable range hint");
            None
        }
    }
}
