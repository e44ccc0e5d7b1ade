//! claimscan: compile ERC-20 transfer histories into Merkle claim
//! distributions.
//!
//! The pipeline has two coupled stages. Acquisition retrieves every
//! historical `Transfer` event matching a token/recipient filter over an
//! arbitrarily large block range, adaptively subdividing queries that
//! rate-limited providers reject, then filters out transfers whose receipts
//! carry a disqualifying log topic. Assembly aggregates the survivors into
//! a per-address ledger and compiles it into a deterministic Merkle claim
//! tree: a root, an exact total, and an O(log n) proof per address, all in
//! a single JSON document an on-chain distributor can verify claims
//! against.
//!
//! # Example
//!
//! ```rust,ignore
//! use claimscan::{
//!     assemble_ledger, AlchemyRangeHint, AssetFlow, ClaimscanConfig, Pipeline,
//!     RpcEventSource,
//! };
//! use alloy_provider::ProviderBuilder;
//!
//! let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
//! let source = RpcEventSource::new(provider.root().clone());
//!
//! let pipeline = Pipeline::new(&source, ClaimscanConfig::default())
//!     .with_range_hint(AlchemyRangeHint);
//!
//! let flows = vec![
//!     AssetFlow::new("AAVE-AAVE", aave_token, aave_token),
//!     AssetFlow::new("LEND-MIGRATOR", lend_token, migrator)
//!         .with_transform(AmountTransform::DivideBy(NonZeroU64::new(100).unwrap()))
//!         .with_disqualifying_topic(migration_topic),
//! ];
//!
//! let document = pipeline.build_claim_document(&flows, 0, tip).await?;
//! claimscan::store::write_claim_document("claims.json", &document)?;
//! ```

pub mod config;
pub mod errors;
mod event;
pub mod events;
pub mod ledger;
pub mod merkle;
pub mod pipeline;
mod serde_utils;
pub mod source;
pub mod store;
mod types;

pub use config::{ClaimscanConfig, ClaimscanConfigBuilder, RetryConfig};
pub use errors::{
    AcquisitionError, AssemblyError, ClaimscanError, RpcError, StoreError, ValidationError,
};
pub use event::{Transfer, TRANSFER_EVENT_SIGNATURE};
pub use events::{AlchemyRangeHint, EventValidator, NoRangeHint, RangeFetcher, RangeHint};
pub use ledger::{AmountTransform, Ledger, LedgerEntry};
pub use merkle::{assemble, assemble_ledger, leaf_hash, verify_proof, Claim, ClaimDocument, MerkleTree};
pub use pipeline::{AssetFlow, FlowOutput, FlowSummary, Pipeline};
pub use source::{EventSource, ReceiptSummary, RpcEventSource, TransferFilter};
pub use types::{BlockRange, TransferEvent};
