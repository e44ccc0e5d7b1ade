//! Serde helpers shared by the ledger and claim-document artifacts.

/// Serializes a `U256` as a decimal string (the form third parties re-derive
/// claim documents from), and accepts decimal or `0x`-prefixed hex on the
/// way back in.
pub(crate) mod u256_decimal {
    use alloy_primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<U256>().map_err(de::Error::custom)
    }
}
