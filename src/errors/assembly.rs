//! Error types for claim-set assembly.

use alloy_primitives::Address;

/// Errors that can occur while assembling a claim document from a ledger.
///
/// All assembly errors are fatal: the claim document is distributed publicly
/// and consumed by an on-chain verifier, so a malformed input must never be
/// papered over into a partially correct tree.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// Two distinct raw keys canonicalized to the same address.
    ///
    /// Indicates an upstream bug (most likely a merge of independently built
    /// ledgers that already shared an address under different spellings);
    /// the amounts are not silently summed.
    #[error("Duplicate address {address}: raw keys {first:?} and {second:?}")]
    DuplicateAddress {
        /// The canonical address both keys resolved to
        address: Address,
        /// The raw key seen first
        first: String,
        /// The raw key seen second
        second: String,
    },

    /// A raw key could not be parsed as an address.
    #[error("Invalid address: {key:?}")]
    InvalidAddress {
        /// The unparseable raw key
        key: String,
    },

    /// An entry carried a zero amount.
    ///
    /// Zero-amount events are skipped during aggregation, so a zero here
    /// means the ledger was produced or edited by something else.
    #[error("Invalid amount for account {key:?}: amount must be positive")]
    InvalidAmount {
        /// The raw key of the offending entry
        key: String,
    },

    /// The ledger contained no entries; there is no tree to build.
    #[error("Cannot assemble a claim document from an empty ledger")]
    EmptyLedger,
}
