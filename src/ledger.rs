//! Per-address aggregation of validated transfer events.
//!
//! The ledger maps each source address to the cumulative amount it is owed
//! plus the transaction hashes that amount came from. Aggregation is a
//! commutative sum, so the (unspecified) ordering of validated events does
//! not affect the result. Ledgers built for independent asset flows are
//! merged by address before claim-tree assembly.

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::TransferEvent;

/// Per-asset amount transform applied to each event before aggregation.
///
/// Most flows credit the raw transferred amount. A flow that pays out in a
/// different token generation divides by a fixed unit-conversion ratio
/// (the original rescue credited LEND transfers in AAVE at 100:1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTransform {
    /// Credit the raw amount unchanged.
    Identity,
    /// Integer-divide each event amount by the given ratio.
    DivideBy(NonZeroU64),
}

impl AmountTransform {
    /// Applies the transform to a raw event amount.
    pub fn apply(&self, amount: U256) -> U256 {
        match self {
            AmountTransform::Identity => amount,
            AmountTransform::DivideBy(ratio) => amount / U256::from(ratio.get()),
        }
    }
}

/// Cumulative amount owed to one address, with provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Total amount owed (raw integer units, post-transform)
    #[serde(with = "crate::serde_utils::u256_decimal")]
    pub amount: U256,
    /// Hashes of the transactions that contributed to the amount
    #[serde(rename = "txns")]
    pub transaction_hashes: Vec<B256>,
}

/// Mapping from source address to amount owed, for one aggregation pass.
///
/// Owned exclusively by its pipeline run; merging across flows happens only
/// after each flow has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<Address, LedgerEntry>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates validated events into per-address totals.
    ///
    /// Each event with a positive amount is transformed and added to its
    /// source address's running total, with the transaction hash appended
    /// to that address's provenance. Zero amounts are skipped and logged,
    /// never errored: they cannot occur from a well-formed Transfer log.
    pub fn aggregate(events: &[TransferEvent], transform: AmountTransform) -> Self {
        let mut ledger = Ledger::new();
        for event in events {
            ledger.credit(event, transform);
        }
        info!(
            events_count = events.len(),
            addresses = ledger.len(),
            total = %ledger.total(),
            "Aggregated events into ledger"
        );
        ledger
    }

    fn credit(&mut self, event: &TransferEvent, transform: AmountTransform) {
        if event.amount.is_zero() {
            debug!(
                from = %event.from,
                tx_hash = %event.transaction_hash,
                "Skipping zero-amount transfer"
            );
            return;
        }

        let amount = transform.apply(event.amount);
        let entry = self.entries.entry(event.from).or_insert_with(|| LedgerEntry {
            amount: U256::ZERO,
            transaction_hashes: Vec::new(),
        });
        entry.amount += amount;
        entry.transaction_hashes.push(event.transaction_hash);
    }

    /// Merges another ledger into this one, summing amounts by address and
    /// concatenating provenance. Commutative and associative up to
    /// provenance ordering.
    pub fn merge(&mut self, other: Ledger) {
        for (address, incoming) in other.entries {
            match self.entries.get_mut(&address) {
                Some(entry) => {
                    entry.amount += incoming.amount;
                    entry.transaction_hashes.extend(incoming.transaction_hashes);
                }
                None => {
                    self.entries.insert(address, incoming);
                }
            }
        }
    }

    /// Exact sum of all entry amounts.
    pub fn total(&self) -> U256 {
        self.entries
            .values()
            .fold(U256::ZERO, |sum, entry| sum + entry.amount)
    }

    /// Number of distinct addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for one address, if present.
    pub fn get(&self, address: &Address) -> Option<&LedgerEntry> {
        self.entries.get(address)
    }

    /// Entries in ascending address byte order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &LedgerEntry)> {
        self.entries.iter()
    }

    /// The ledger as the raw string-keyed map persisted to disk, keys in
    /// EIP-55 checksummed form.
    pub fn to_raw(&self) -> BTreeMap<String, LedgerEntry> {
        self.entries
            .iter()
            .map(|(address, entry)| (address.to_checksum(None), entry.clone()))
            .collect()
    }
}
