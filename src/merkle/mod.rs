//! Claim-tree construction.
//!
//! [`MerkleTree`] builds a binary tree over leaf hashes and answers proof
//! queries; [`claims`](self) assembly canonicalizes a ledger into sorted,
//! indexed claim records and emits the public [`ClaimDocument`].
//!
//! The hashing scheme is the on-the-wire contract with the verifying
//! distributor contract and must not change:
//!
//! - leaf = `keccak256(index ‖ address ‖ amount)` packed (32 + 20 + 32 bytes)
//! - internal node = `keccak256(lo ‖ hi)` with the children sorted by byte
//!   value, making per-level verification order-independent
//! - an odd node at any layer is promoted unchanged to the next layer

mod claims;
mod tree;

pub use claims::{assemble, assemble_ledger, Claim, ClaimDocument};
pub use tree::{leaf_hash, verify_proof, MerkleTree};
