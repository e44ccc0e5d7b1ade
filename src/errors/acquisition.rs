//! Error types for the event-acquisition stage.

use super::RpcError;

/// Errors that can occur while retrieving historical events.
///
/// Oversized-range rejections are not represented here: the fetcher handles
/// them by subdividing the query. Acquisition only fails once subdivision
/// has bottomed out at a single block and the provider still refuses it,
/// which means no amount of further splitting can make progress.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    /// A single-block range still failed after full recursive subdivision.
    ///
    /// Fatal for the asset pipeline: the run aborts and no claim document
    /// is written. The wrapped error is the provider's last response for
    /// the block.
    #[error("Block {block} could not be fetched after full subdivision")]
    SingleBlockFailed {
        /// The block that could not be fetched
        block: u64,
        /// The provider error for the final attempt
        #[source]
        source: RpcError,
    },
}
