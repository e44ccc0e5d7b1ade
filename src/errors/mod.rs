//! Error types for the claimscan library.
//!
//! Each pipeline stage has its own error type for fine-grained handling:
//!
//! - [`RpcError`] - shared variants for blockchain RPC failures
//! - [`AcquisitionError`] - fatal event-acquisition failures
//! - [`ValidationError`] - fatal receipt-validation failures
//! - [`AssemblyError`] - fatal claim-set assembly failures
//! - [`StoreError`] - artifact read/write failures
//!
//! [`ClaimscanError`] wraps all of them for callers that do not need to
//! distinguish between error sources; every module error converts into it
//! via `From`, so `?` propagates naturally.
//!
//! Acquisition, validation, and assembly errors are fatal for their asset
//! pipeline: a failed run produces no claim document. There are no partially
//! written artifacts to clean up.

mod acquisition;
mod assembly;
mod rpc;
mod store;
mod validation;

pub use acquisition::AcquisitionError;
pub use assembly::AssemblyError;
pub use rpc::RpcError;
pub use store::StoreError;
pub use validation::ValidationError;

/// Unified error type for all claimscan operations.
///
/// # Examples
///
/// ```rust,ignore
/// use claimscan::{ClaimscanError, Pipeline};
///
/// async fn build() -> Result<(), ClaimscanError> {
///     let ledger = pipeline.run_flows(&flows).await?;
///     let document = claimscan::assemble_ledger(&ledger)?;
///     Ok(())
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClaimscanError {
    /// Error from event acquisition.
    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Error from receipt-based event validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from claim-set assembly.
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Error from artifact persistence.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from a blockchain RPC operation outside the stages above.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}
