//! Provider range hints.
//!
//! Some RPC providers reject an oversized `eth_getLogs` query with an error
//! message that names a narrower block range they are willing to serve.
//! Honoring that hint cuts the request count well below blind bisection.
//! Hint extraction is pluggable per provider: the fetcher consults a
//! [`RangeHint`] on every failed query and falls back to bisection whenever
//! no usable hint comes back.

use tracing::trace;

use crate::types::BlockRange;

/// Extracts a server-suggested block range from a provider error message.
///
/// Implementations must tolerate arbitrary error text: returning `None`
/// simply means the fetcher bisects instead.
pub trait RangeHint: Send + Sync {
    /// The narrower range the provider offered to serve, if the message
    /// contains one.
    fn suggested_range(&self, error_message: &str) -> Option<BlockRange>;
}

/// Hint parser for providers with no known hint format. Always bisect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRangeHint;

impl RangeHint for NoRangeHint {
    fn suggested_range(&self, _error_message: &str) -> Option<BlockRange> {
        None
    }
}

/// Hint parser for Alchemy-style errors.
///
/// Alchemy rejects oversized queries with a message like:
///
/// ```text
/// Log response size exceeded. ... this block range should work: [0xa2c2ba, 0xa2e2e5]
/// ```
///
/// The bracketed pair is the range the server is willing to serve; block
/// numbers may be hex (`0x…`) or decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlchemyRangeHint;

impl RangeHint for AlchemyRangeHint {
    fn suggested_range(&self, error_message: &str) -> Option<BlockRange> {
        let open = error_message.find('[')?;
        let close = error_message[open..].find(']')? + open;
        let inner = &error_message[open + 1..close];

        let (from_raw, to_raw) = inner.split_once(',')?;
        let from = parse_block_number(from_raw.trim())?;
        let to = parse_block_number(to_raw.trim())?;
        if from > to {
            trace!(from, to, "Discarding inverted range hint");
            return None;
        }

        Some(BlockRange::new(from, to))
    }
}

fn parse_block_number(raw: &str) -> Option<u64> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        raw.parse().ok()
    }
}
