//! JSON persistence of pipeline artifacts.
//!
//! Two artifacts cross the persistence boundary: the intermediate raw
//! ledger map (`{address: {amount, txns}}`, one file per distribution) and
//! the final claim document. Writes go to a temporary file first and are
//! renamed into place, so a failed run never leaves a partial artifact.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::StoreError;
use crate::ledger::{Ledger, LedgerEntry};
use crate::merkle::ClaimDocument;

/// Writes the ledger as a raw string-keyed map with checksummed keys.
pub fn write_ledger(path: impl AsRef<Path>, ledger: &Ledger) -> Result<(), StoreError> {
    write_json(path.as_ref(), &ledger.to_raw())
}

/// Reads a raw ledger map, keys left as written for the assembler to
/// canonicalize (and reject on collision).
pub fn read_ledger(path: impl AsRef<Path>) -> Result<BTreeMap<String, LedgerEntry>, StoreError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes a claim document.
pub fn write_claim_document(
    path: impl AsRef<Path>,
    document: &ClaimDocument,
) -> Result<(), StoreError> {
    write_json(path.as_ref(), document)
}

/// Reads a claim document.
pub fn read_claim_document(path: impl AsRef<Path>) -> Result<ClaimDocument, StoreError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(value)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;

    info!(path = %path.display(), "Wrote artifact");
    Ok(())
}
