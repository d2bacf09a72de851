//! Keccak-1600 with the original (pre-SHA-3) `0x01` padding, as used by CryptoNote.

use crate::hash::Hash;
use sha3::{Digest, Keccak256};

/// Bytes absorbed per permutation for a 256-bit capacity.
const RATE: usize = 136;
pub const STATE_SIZE: usize = 200;

/// `cn_fast_hash`: Keccak-256 of `data`.
pub fn cn_fast_hash<B: AsRef<[u8]>>(data: B) -> Hash {
    let digest = Keccak256::digest(data.as_ref());
    Hash::new(digest.into())
}

/// The full 1600-bit sponge state after absorbing a message. CryptoNight seeds its scratchpad and AES keys from all
/// 200 bytes of it, not only the 32-byte digest.
#[derive(Clone)]
pub struct KeccakState([u64; 25]);

impl KeccakState {
    pub fn absorb(data: &[u8]) -> Self {
        let mut state = [0u64; 25];
        let mut blocks = data.chunks_exact(RATE);
        for block in &mut blocks {
            xor_block(&mut state, block);
            ::keccak::f1600(&mut state);
        }
        let rest = blocks.remainder();
        let mut last = [0u8; RATE];
        last[..rest.len()].copy_from_slice(rest);
        last[rest.len()] = 0x01;
        last[RATE - 1] |= 0x80;
        xor_block(&mut state, &last);
        ::keccak::f1600(&mut state);
        Self(state)
    }

    pub fn from_bytes(bytes: &[u8; STATE_SIZE]) -> Self {
        let mut state = [0u64; 25];
        for (word, chunk) in state.iter_mut().zip(bytes.chunks_exact(8)) {
            *word = u64::from_le_bytes(chunk.try_into().expect("chunk is 8 bytes"));
        }
        Self(state)
    }

    pub fn to_bytes(&self) -> [u8; STATE_SIZE] {
        let mut bytes = [0u8; STATE_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    pub fn permute(&mut self) {
        ::keccak::f1600(&mut self.0);
    }
}

fn xor_block(state: &mut [u64; 25], block: &[u8]) {
    for (word, chunk) in state.iter_mut().zip(block.chunks_exact(8)) {
        *word ^= u64::from_le_bytes(chunk.try_into().expect("chunk is 8 bytes"));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rng, Rng, RngCore};

    #[test]
    fn empty_input() {
        let hash = cn_fast_hash(b"");
        assert_eq!(hash.as_hex(), "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");
    }

    #[test]
    fn sponge_prefix_matches_fast_hash() {
        for len in [0usize, 1, 76, 135, 136, 137, 300] {
            let data = (0..len).map(|i| (i * 7 + 3) as u8).collect::<Vec<u8>>();
            let state = KeccakState::absorb(&data).to_bytes();
            assert_eq!(&state[..32], cn_fast_hash(&data).as_bytes(), "length {len}");
        }
    }

    #[test]
    fn sponge_agrees_with_fast_hash_on_random_inputs() {
        let mut rng = rng();
        for _ in 0..64 {
            let mut data = vec![0u8; rng.random_range(0..1024)];
            rng.fill_bytes(&mut data);
            let state = KeccakState::absorb(&data).to_bytes();
            assert_eq!(&state[..32], cn_fast_hash(&data).as_bytes(), "length {}", data.len());
        }
    }

    #[test]
    fn bytes_round_trip() {
        let state = KeccakState::absorb(b"turtle");
        let bytes = state.to_bytes();
        assert_eq!(KeccakState::from_bytes(&bytes).to_bytes(), bytes);
    }
}
