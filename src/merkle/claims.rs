//! Claim-set assembly.
//!
//! Turns a raw address-keyed ledger into the public [`ClaimDocument`]:
//! canonicalize and dedupe addresses, sort them ascending by byte value,
//! assign dense indices in that order, build the Merkle tree, and attach a
//! proof to every claim. The document is the blob that gets distributed
//! publicly; it is completely sufficient for recreating the entire tree, so
//! anyone can verify that all claims are included and nothing extra was
//! slipped in.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AssemblyError;
use crate::ledger::{Ledger, LedgerEntry};
use crate::merkle::tree::{leaf_hash, verify_proof, MerkleTree};

/// One address's entitlement, redeemable on-chain with the attached proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Dense 0-based index assigned by sorted address order
    pub index: u64,
    /// Amount owed (raw integer units)
    #[serde(with = "crate::serde_utils::u256_decimal")]
    pub amount: U256,
    /// Sibling-hash path from this claim's leaf to the root
    pub proof: Vec<B256>,
    /// Hashes of the transactions the amount came from
    #[serde(default, rename = "txns", skip_serializing_if = "Vec::is_empty")]
    pub transaction_hashes: Vec<B256>,
}

/// The distributable claim document: root, exact total, and one claim per
/// address. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDocument {
    /// Root of the claim tree
    pub merkle_root: B256,
    /// Exact sum of all claim amounts
    #[serde(with = "crate::serde_utils::u256_decimal")]
    pub total_amount: U256,
    /// Claims keyed by canonical address (serialized with EIP-55
    /// checksummed keys)
    #[serde(with = "checksummed_claims")]
    pub claims: BTreeMap<Address, Claim>,
}

impl ClaimDocument {
    /// The claim for one address, if present.
    pub fn claim(&self, address: &Address) -> Option<&Claim> {
        self.claims.get(address)
    }

    /// Replays one claim's proof against the document root.
    pub fn verify_claim(&self, address: &Address) -> bool {
        match self.claims.get(address) {
            Some(claim) => verify_proof(
                self.merkle_root,
                leaf_hash(claim.index, *address, claim.amount),
                &claim.proof,
            ),
            None => false,
        }
    }
}

/// Assembles a claim document from raw string-keyed ledger entries.
///
/// Keys are parsed and canonicalized; two distinct raw keys resolving to
/// the same address are a fatal [`AssemblyError::DuplicateAddress`] rather
/// than a silent sum. This cannot happen for a ledger built by a single
/// aggregation pass (it is keyed by parsed address already), but guards
/// merges of independently persisted ledgers.
///
/// # Errors
///
/// - [`AssemblyError::InvalidAddress`] for an unparseable key
/// - [`AssemblyError::InvalidAmount`] for a zero amount
/// - [`AssemblyError::DuplicateAddress`] on canonicalization collision
/// - [`AssemblyError::EmptyLedger`] if there are no entries
pub fn assemble(
    entries: impl IntoIterator<Item = (String, LedgerEntry)>,
) -> Result<ClaimDocument, AssemblyError> {
    let mut by_address: BTreeMap<Address, (String, LedgerEntry)> = BTreeMap::new();

    for (raw, entry) in entries {
        let address: Address = raw
            .parse()
            .map_err(|_| AssemblyError::InvalidAddress { key: raw.clone() })?;
        if entry.amount.is_zero() {
            return Err(AssemblyError::InvalidAmount { key: raw });
        }
        if let Some((first, _)) = by_address.get(&address) {
            return Err(AssemblyError::DuplicateAddress {
                address,
                first: first.clone(),
                second: raw,
            });
        }
        by_address.insert(address, (raw, entry));
    }

    // BTreeMap iteration gives ascending address byte order; indices are
    // dense in that order and therefore stable across rebuilds.
    let leaves: Vec<B256> = by_address
        .iter()
        .enumerate()
        .map(|(index, (address, (_, entry)))| leaf_hash(index as u64, *address, entry.amount))
        .collect();

    let tree = MerkleTree::new(leaves).ok_or(AssemblyError::EmptyLedger)?;

    let mut total_amount = U256::ZERO;
    let mut claims = BTreeMap::new();
    for (index, (address, (_, entry))) in by_address.into_iter().enumerate() {
        total_amount += entry.amount;
        let proof = tree
            .proof(index)
            .expect("index is within the tree by construction");
        claims.insert(
            address,
            Claim {
                index: index as u64,
                amount: entry.amount,
                proof,
                transaction_hashes: entry.transaction_hashes,
            },
        );
    }

    info!(
        claims = claims.len(),
        total_amount = %total_amount,
        merkle_root = %tree.root(),
        "Assembled claim document"
    );

    Ok(ClaimDocument {
        merkle_root: tree.root(),
        total_amount,
        claims,
    })
}

/// Assembles a claim document directly from an in-memory [`Ledger`].
pub fn assemble_ledger(ledger: &Ledger) -> Result<ClaimDocument, AssemblyError> {
    assemble(ledger.to_raw())
}

/// Serializes the claims map with EIP-55 checksummed address keys, the
/// form claim-submission tooling and the verifying contract expect.
mod checksummed_claims {
    use std::collections::BTreeMap;

    use alloy_primitives::Address;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Claim;

    pub fn serialize<S: Serializer>(
        claims: &BTreeMap<Address, Claim>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(claims.len()))?;
        for (address, claim) in claims {
            map.serialize_entry(&address.to_checksum(None), claim)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Address, Claim>, D::Error> {
        let raw: BTreeMap<String, Claim> = BTreeMap::deserialize(deserializer)?;
        let mut claims = BTreeMap::new();
        for (key, claim) in raw {
            let address = key
                .parse::<Address>()
                .map_err(|e| D::Error::custom(format!("invalid address key {key:?}: {e}")))?;
            // Two distinct raw keys resolving to the same address would
            // silently drop one claim; reject the document instead, the
            // same way assembly rejects the collision.
            if claims.insert(address, claim).is_some() {
                return Err(D::Error::custom(format!(
                    "duplicate claim address: key {key:?} collides with another spelling"
                )));
            }
        }
        Ok(claims)
    }
}
