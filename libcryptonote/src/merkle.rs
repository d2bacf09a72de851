//! The CryptoNote transaction Merkle tree.
//!
//! The tree is not padded. With `count` leaves, let `cnt` be the largest power of two below `count`: the first
//! `2·cnt - count` leaves move up a level unchanged and the remaining leaves are hashed in pairs, which leaves exactly
//! `cnt` nodes. From there it is a perfect binary tree.

use crate::error::CryptoError;
use cryptonight::{cn_fast_hash, Hash, HASH_SIZE};
use log::*;

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 2 * HASH_SIZE];
    buf[..HASH_SIZE].copy_from_slice(left.as_bytes());
    buf[HASH_SIZE..].copy_from_slice(right.as_bytes());
    cn_fast_hash(buf)
}

fn hash_pairs(nodes: &[Hash]) -> Vec<Hash> {
    nodes.chunks_exact(2).map(|pair| hash_pair(&pair[0], &pair[1])).collect()
}

/// The number of hashes in a branch for a tree of `count` leaves: `floor(log2(count))`, or 0 for an empty tree.
pub fn tree_depth(count: usize) -> usize {
    count.checked_ilog2().unwrap_or(0) as usize
}

/// The Merkle root of `hashes`.
pub fn tree_hash(hashes: &[Hash]) -> Result<Hash, CryptoError> {
    match hashes.len() {
        0 => Err(CryptoError::EmptyInput("a Merkle tree needs at least one leaf")),
        1 => Ok(hashes[0]),
        2 => Ok(hash_pair(&hashes[0], &hashes[1])),
        count => {
            let cnt = count.next_power_of_two() >> 1;
            let carried = 2 * cnt - count;
            trace!("Merkle root of {count} leaves: {carried} carried up, {} paired", count - carried);
            let mut nodes = hashes[..carried].to_vec();
            nodes.extend(hash_pairs(&hashes[carried..]));
            while nodes.len() > 1 {
                nodes = hash_pairs(&nodes);
            }
            Ok(nodes[0])
        }
    }
}

/// The sibling hashes linking the first leaf to the root.
///
/// The branch is ordered from the root down: element 0 is the sibling just below the root and the last element is
/// the first leaf's immediate neighbour. A single-leaf tree has an empty branch.
pub fn tree_branch(hashes: &[Hash]) -> Result<Vec<Hash>, CryptoError> {
    if hashes.is_empty() {
        return Err(CryptoError::EmptyInput("a Merkle branch needs at least one leaf"));
    }
    let count = hashes.len();
    let depth = tree_depth(count);
    let cnt = 1usize << depth;
    let carried = 2 * cnt - count;
    let mut nodes = hashes[1..carried].to_vec();
    nodes.extend(hash_pairs(&hashes[carried..]));
    let mut branch = vec![Hash::default(); depth];
    for level in (0..depth).rev() {
        branch[level] = nodes[0];
        nodes = hash_pairs(&nodes[1..]);
    }
    Ok(branch)
}

/// Recomputes the root from a leaf and its branch (ordered as [`tree_branch`] returns it).
///
/// Bit `d` of `path` is set when the running hash is the right-hand child at depth `d`, counting depth 0 as the level
/// just below the root. The first leaf of a tree always has `path == 0`.
pub fn tree_hash_from_branch(branch: &[Hash], leaf: &Hash, path: u64) -> Hash {
    let mut current = *leaf;
    for (depth, sibling) in branch.iter().enumerate().rev() {
        let is_right = path.checked_shr(depth as u32).is_some_and(|bits| bits & 1 == 1);
        current = if is_right { hash_pair(sibling, &current) } else { hash_pair(&current, sibling) };
    }
    current
}

#[cfg(test)]
mod test {
    use super::*;

    fn leaves(n: usize) -> Vec<Hash> {
        (0..n).map(|i| cn_fast_hash((i as u64).to_le_bytes())).collect()
    }

    #[test]
    fn empty_input() {
        assert!(matches!(tree_hash(&[]), Err(CryptoError::EmptyInput(_))));
        assert!(matches!(tree_branch(&[]), Err(CryptoError::EmptyInput(_))));
    }

    #[test]
    fn small_trees() {
        let l = leaves(3);
        assert_eq!(tree_hash(&l[..1]).unwrap(), l[0]);
        assert_eq!(tree_hash(&l[..2]).unwrap(), hash_pair(&l[0], &l[1]));
        assert_eq!(tree_hash(&l).unwrap(), hash_pair(&l[0], &hash_pair(&l[1], &l[2])));
        assert!(tree_branch(&l[..1]).unwrap().is_empty());
        assert_eq!(tree_branch(&l[..2]).unwrap(), vec![l[1]]);
        assert_eq!(tree_branch(&l).unwrap(), vec![hash_pair(&l[1], &l[2])]);
    }

    #[test]
    fn five_leaves() {
        let l = leaves(5);
        // cnt = 4: the first three leaves are carried up and (3, 4) is paired.
        let level = [l[0], l[1], l[2], hash_pair(&l[3], &l[4])];
        let expected = hash_pair(&hash_pair(&level[0], &level[1]), &hash_pair(&level[2], &level[3]));
        assert_eq!(tree_hash(&l).unwrap(), expected);
        assert_eq!(tree_branch(&l).unwrap(), vec![hash_pair(&level[2], &level[3]), l[1]]);
    }

    #[test]
    fn depth() {
        assert_eq!(tree_depth(0), 0);
        assert_eq!(tree_depth(1), 0);
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 1);
        assert_eq!(tree_depth(4), 2);
        assert_eq!(tree_depth(1023), 9);
        assert_eq!(tree_depth(1024), 10);
    }

    #[test]
    fn branch_reproduces_root() {
        for n in 1..40 {
            let l = leaves(n);
            let root = tree_hash(&l).unwrap();
            let branch = tree_branch(&l).unwrap();
            assert_eq!(branch.len(), tree_depth(n), "{n} leaves");
            assert_eq!(tree_hash_from_branch(&branch, &l[0], 0), root, "{n} leaves");
        }
    }

    #[test]
    fn branch_for_the_last_leaf() {
        let l = leaves(4);
        let branch = [hash_pair(&l[0], &l[1]), l[2]];
        assert_eq!(tree_hash_from_branch(&branch, &l[3], 0b11), tree_hash(&l).unwrap());
        assert_ne!(tree_hash_from_branch(&branch, &l[3], 0b01), tree_hash(&l).unwrap());
    }
}
