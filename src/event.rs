//! Canonical ERC-20 `Transfer` event definition used to decode logs
//! returned by the event source.

use std::fmt::Debug;

use alloy_sol_types::sol;

/// The canonical Transfer event signature
pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";

sol! {
    event Transfer(address indexed from, address indexed to, uint256 value);
}

impl Debug for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transfer(from: {}, to: {}, value: {})",
            self.from, self.to, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use alloy_sol_types::SolEvent;

    #[test]
    fn test_signature_hash_matches_string_signature() {
        assert_eq!(
            Transfer::SIGNATURE_HASH,
            keccak256(TRANSFER_EVENT_SIGNATURE.as_bytes())
        );
    }
}
