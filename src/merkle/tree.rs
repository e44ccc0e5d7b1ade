//! Binary Merkle tree over claim leaf hashes.

use alloy_primitives::{keccak256, Address, B256, U256};

/// Domain-tagged leaf hash over one claim tuple.
///
/// The packed encoding `uint256 index ‖ address ‖ uint256 amount` is 84
/// bytes, structurally distinct from the 64-byte internal-node input, so a
/// leaf can never be reinterpreted as an internal node (second-preimage
/// resistance across tree levels).
pub fn leaf_hash(index: u64, address: Address, amount: U256) -> B256 {
    let mut buf = [0u8; 84];
    buf[..32].copy_from_slice(&U256::from(index).to_be_bytes::<32>());
    buf[32..52].copy_from_slice(address.as_slice());
    buf[52..].copy_from_slice(&amount.to_be_bytes::<32>());
    keccak256(buf)
}

/// Internal-node hash: children sorted by byte value before concatenation.
///
/// Sorting makes proof verification order-independent at each level, which
/// the verifying contract relies on.
fn hash_pair(a: B256, b: B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Replays a proof: hash the leaf up through each sibling and compare the
/// result against the expected root.
pub fn verify_proof(root: B256, leaf: B256, proof: &[B256]) -> bool {
    let computed = proof.iter().fold(leaf, |node, sibling| hash_pair(node, *sibling));
    computed == root
}

/// A binary Merkle tree built bottom-up, layer by layer.
///
/// An odd node at any layer is promoted unchanged to the next layer; there
/// is no duplication or padding. A single-leaf tree's root is that leaf's
/// hash. Construction is deterministic: the same leaf sequence produces a
/// bit-identical root and proof set on every invocation.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `layers[0]` is the leaf layer; the last layer holds only the root.
    layers: Vec<Vec<B256>>,
}

impl MerkleTree {
    /// Builds a tree over the given leaves. Returns `None` for an empty
    /// leaf set; there is no meaningful root over zero leaves.
    pub fn new(leaves: Vec<B256>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut layers = vec![leaves];
        while layers.last().expect("layers is non-empty").len() > 1 {
            let current = layers.last().expect("layers is non-empty");
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(hash_pair(*left, *right)),
                    // Unpaired node is promoted unchanged
                    [single] => next.push(*single),
                    _ => unreachable!("chunks(2) yields one- or two-element slices"),
                }
            }
            layers.push(next);
        }

        Some(Self { layers })
    }

    /// The tree root.
    pub fn root(&self) -> B256 {
        self.layers.last().expect("layers is non-empty")[0]
    }

    /// Number of leaves the tree was built over.
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Sibling-hash path from the leaf at `index` to the root, one entry
    /// per layer where the node has a sibling. `None` if the index is out
    /// of bounds.
    pub fn proof(&self, index: usize) -> Option<Vec<B256>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut proof = Vec::new();
        let mut position = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = position ^ 1;
            if let Some(hash) = layer.get(sibling) {
                proof.push(*hash);
            }
            position /= 2;
        }
        Some(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn sample_leaves(n: usize) -> Vec<B256> {
        (0..n)
            .map(|i| {
                leaf_hash(
                    i as u64,
                    Address::repeat_byte(i as u8 + 1),
                    U256::from((i as u64 + 1) * 10),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_leaf_set_has_no_tree() {
        assert!(MerkleTree::new(Vec::new()).is_none());
    }

    #[test]
    fn test_single_leaf_root_is_the_leaf() {
        let leaf = leaf_hash(
            0,
            address!("1111111111111111111111111111111111111111"),
            U256::from(10u64),
        );
        let tree = MerkleTree::new(vec![leaf]).unwrap();
        assert_eq!(tree.root(), leaf);
        assert_eq!(tree.proof(0).unwrap(), Vec::<B256>::new());
    }

    #[test]
    fn test_pair_hash_is_order_independent() {
        let a = B256::repeat_byte(1);
        let b = B256::repeat_byte(2);
        assert_eq!(hash_pair(a, b), hash_pair(b, a));
    }

    #[test]
    fn test_three_leaves_promote_unpaired_leaf() {
        // Layer 0: [l0, l1, l2] -> layer 1: [h(l0,l1), l2] -> root
        let leaves = sample_leaves(3);
        let tree = MerkleTree::new(leaves.clone()).unwrap();

        let inner = hash_pair(leaves[0], leaves[1]);
        assert_eq!(tree.root(), hash_pair(inner, leaves[2]));

        // The third leaf's proof skips the leaf layer (no sibling there)
        assert_eq!(tree.proof(2).unwrap(), vec![inner]);
        assert_eq!(tree.proof(0).unwrap(), vec![leaves[1], leaves[2]]);
    }

    #[test]
    fn test_all_proofs_reconstruct_root() {
        for n in 1..=17 {
            let leaves = sample_leaves(n);
            let tree = MerkleTree::new(leaves.clone()).unwrap();
            for (i, leaf) in leaves.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                assert!(
                    verify_proof(tree.root(), *leaf, &proof),
                    "proof for leaf {i} of {n} failed"
                );
            }
        }
    }

    #[test]
    fn test_deterministic_rebuild() {
        let leaves = sample_leaves(9);
        let first = MerkleTree::new(leaves.clone()).unwrap();
        let second = MerkleTree::new(leaves).unwrap();

        assert_eq!(first.root(), second.root());
        for i in 0..first.leaf_count() {
            assert_eq!(first.proof(i), second.proof(i));
        }
    }

    #[test]
    fn test_tampered_leaf_changes_root_and_breaks_proof() {
        let leaves = sample_leaves(5);
        let tree = MerkleTree::new(leaves.clone()).unwrap();
        let old_proof = tree.proof(2).unwrap();

        let mut tampered = leaves.clone();
        tampered[2] = leaf_hash(
            2,
            Address::repeat_byte(3),
            // Amount inflated from 30 to 31
            U256::from(31u64),
        );
        let tampered_tree = MerkleTree::new(tampered.clone()).unwrap();

        assert_ne!(tree.root(), tampered_tree.root());
        // The original proof no longer reconstructs the new root for the
        // original leaf
        assert!(!verify_proof(tampered_tree.root(), leaves[2], &old_proof));
    }

    #[test]
    fn test_proof_out_of_bounds() {
        let tree = MerkleTree::new(sample_leaves(4)).unwrap();
        assert!(tree.proof(4).is_none());
    }

    #[test]
    fn test_leaf_hash_packed_encoding() {
        // keccak256 of the 84-byte packed tuple, structurally distinct from
        // the 64-byte pair input
        let address = address!("1111111111111111111111111111111111111111");
        let amount = U256::from(10u64);
        let mut expected = [0u8; 84];
        expected[..32].copy_from_slice(&U256::from(7u64).to_be_bytes::<32>());
        expected[32..52].copy_from_slice(address.as_slice());
        expected[52..].copy_from_slice(&amount.to_be_bytes::<32>());

        assert_eq!(leaf_hash(7, address, amount), keccak256(expected));
    }
}
