//! The CryptoNight scratchpad pipeline: Keccak seed, AES explode, memory-hard mix, AES implode and finalisation.

use crate::aes::{aes_round, expand_key, pseudo_encrypt, BLOCK_SIZE};
use crate::error::HashError;
use crate::finalizer::Finalizer;
use crate::hash::Hash;
use crate::keccak::{KeccakState, STATE_SIZE};
use crate::params::{CryptoNightParams, Variant};
use log::*;

type Block = [u8; BLOCK_SIZE];

/// Bytes of the Keccak state that seed (and later receive) the scratchpad text.
const TEXT_START: usize = 64;
const TEXT_SIZE: usize = 128;
/// Variant 1 mixes bytes 35..43 of the input (the block nonce region) into the main loop.
const V1_NONCE_OFFSET: usize = 35;
pub const V1_MIN_INPUT: usize = V1_NONCE_OFFSET + 8;

/// Runs CryptoNight over `data` with the given memory profile and tweak set.
///
/// The scratchpad is allocated for the duration of the call and released on every exit path. Variant 1 rejects inputs
/// shorter than 43 bytes, since its tweak reads eight bytes starting at offset 35.
pub fn cn_slow_hash(data: &[u8], params: &CryptoNightParams, variant: Variant) -> Result<Hash, HashError> {
    params.validate()?;
    if variant == Variant::V1 && data.len() < V1_MIN_INPUT {
        return Err(HashError::InputTooShort {
            algorithm: "CryptoNight v1",
            required: V1_MIN_INPUT,
            actual: data.len(),
        });
    }
    trace!(
        "CryptoNight {variant}: {} byte input, {} byte scratchpad, {} iterations",
        data.len(),
        params.scratchpad,
        params.iterations
    );
    let mut state = KeccakState::absorb(data).to_bytes();
    let mut scratchpad = Scratchpad::allocate(params.scratchpad)?;
    scratchpad.explode(&state);
    let tweak = match variant {
        Variant::V1 => read_u64(&state, 192) ^ read_u64(data, V1_NONCE_OFFSET),
        _ => 0,
    };
    let mut mixer = Mixer::new(&state, variant, tweak, params.block_mask());
    mixer.run(&mut scratchpad, params.iterations / 2);
    scratchpad.implode(&mut state);

    let mut keccak = KeccakState::from_bytes(&state);
    keccak.permute();
    let state = keccak.to_bytes();
    let finalizer = Finalizer::select(&state);
    trace!("CryptoNight {variant}: finalising with {finalizer:?}");
    Ok(finalizer.hash(&state))
}

struct Scratchpad(Vec<u8>);

impl Scratchpad {
    fn allocate(size: usize) -> Result<Self, HashError> {
        let mut memory = Vec::new();
        memory.try_reserve_exact(size).map_err(|_| HashError::Allocation(size))?;
        memory.resize(size, 0);
        Ok(Self(memory))
    }

    fn block(&self, offset: usize) -> Block {
        self.0[offset..offset + BLOCK_SIZE].try_into().expect("slice is one block long")
    }

    fn store(&mut self, offset: usize, block: &Block) {
        self.0[offset..offset + BLOCK_SIZE].copy_from_slice(block);
    }

    fn explode(&mut self, state: &[u8; STATE_SIZE]) {
        let keys = expand_key(state[..32].try_into().expect("32 byte key"));
        let mut text: [u8; TEXT_SIZE] = state[TEXT_START..TEXT_START + TEXT_SIZE].try_into().expect("128 byte text");
        for chunk in self.0.chunks_exact_mut(TEXT_SIZE) {
            for block in text.chunks_exact_mut(BLOCK_SIZE) {
                pseudo_encrypt(block.try_into().expect("one block"), &keys);
            }
            chunk.copy_from_slice(&text);
        }
    }

    fn implode(&self, state: &mut [u8; STATE_SIZE]) {
        let keys = expand_key(state[32..64].try_into().expect("32 byte key"));
        let mut text: [u8; TEXT_SIZE] = state[TEXT_START..TEXT_START + TEXT_SIZE].try_into().expect("128 byte text");
        for chunk in self.0.chunks_exact(TEXT_SIZE) {
            for (block, src) in text.chunks_exact_mut(BLOCK_SIZE).zip(chunk.chunks_exact(BLOCK_SIZE)) {
                block.iter_mut().zip(src).for_each(|(b, s)| *b ^= s);
                pseudo_encrypt(block.try_into().expect("one block"), &keys);
            }
        }
        state[TEXT_START..TEXT_START + TEXT_SIZE].copy_from_slice(&text);
    }

    /// Variant 2: rotates the three blocks sharing `offset`'s 64-byte line, adding the running registers.
    fn shuffle(&mut self, offset: usize, a: &Block, b0: &Block, b1: &Block) {
        let chunk1 = self.block(offset ^ 0x10);
        let chunk2 = self.block(offset ^ 0x20);
        let chunk3 = self.block(offset ^ 0x30);
        self.store(offset ^ 0x10, &add(&chunk3, b1));
        self.store(offset ^ 0x20, &add(&chunk1, b0));
        self.store(offset ^ 0x30, &add(&chunk2, a));
    }
}

/// The registers carried between main-loop iterations.
struct Mixer {
    variant: Variant,
    mask: u64,
    tweak: u64,
    a: Block,
    b0: Block,
    b1: Block,
    division: u64,
    sqrt: u64,
}

impl Mixer {
    fn new(state: &[u8; STATE_SIZE], variant: Variant, tweak: u64, mask: u64) -> Self {
        let a = xor(&block_at(state, 0), &block_at(state, 32));
        let b0 = xor(&block_at(state, 16), &block_at(state, 48));
        let (b1, division, sqrt) = match variant {
            Variant::V2 => {
                let b1 = xor(&block_at(state, 64), &block_at(state, 80));
                (b1, read_u64(state, 96), read_u64(state, 104))
            }
            _ => ([0u8; BLOCK_SIZE], 0, 0),
        };
        Self { variant, mask, tweak, a, b0, b1, division, sqrt }
    }

    fn offset(&self, block: &Block) -> usize {
        (((low_word(block) >> 4) & self.mask) << 4) as usize
    }

    fn run(&mut self, pad: &mut Scratchpad, rounds: usize) {
        let v2 = self.variant == Variant::V2;
        for _ in 0..rounds {
            let j = self.offset(&self.a);
            let mut c1 = pad.block(j);
            aes_round(&mut c1, &self.a);
            if v2 {
                pad.shuffle(j, &self.a, &self.b0, &self.b1);
            }
            let mut out = xor(&c1, &self.b0);
            if self.variant == Variant::V1 {
                tweak_v1(&mut out);
            }
            pad.store(j, &out);

            let j = self.offset(&c1);
            let mut c2 = pad.block(j);
            if v2 {
                self.integer_math(&mut c2, &c1);
            }
            let (hi, lo) = mul128(low_word(&c1), low_word(&c2));
            let mut product = words_to_block(hi, lo);
            if v2 {
                let neighbour = xor(&pad.block(j ^ 0x10), &product);
                pad.store(j ^ 0x10, &neighbour);
                product = xor(&product, &pad.block(j ^ 0x20));
                pad.shuffle(j, &self.a, &self.b0, &self.b1);
            }
            let sum = add(&self.a, &product);
            self.a = xor(&c2, &sum);
            let mut c2 = sum;
            if self.variant == Variant::V1 {
                let (lo, hi) = block_to_words(&c2);
                c2 = words_to_block(lo, hi ^ self.tweak);
            }
            pad.store(j, &c2);
            if v2 {
                self.b1 = self.b0;
            }
            self.b0 = c1;
        }
    }

    /// Variant 2 division and square-root step. Mixes the previous results into `c2`, then refreshes them from `c1`.
    fn integer_math(&mut self, c2: &mut Block, c1: &Block) {
        let (lo, hi) = block_to_words(c2);
        *c2 = words_to_block(lo ^ self.division ^ (self.sqrt << 32), hi);
        let (c1_lo, c1_hi) = block_to_words(c1);
        let divisor = u64::from((c1_lo.wrapping_add(self.sqrt << 1) as u32) | 0x8000_0001);
        self.division = u64::from((c1_hi / divisor) as u32) + ((c1_hi % divisor) << 32);
        self.sqrt = v2_sqrt(c1_lo.wrapping_add(self.division));
    }
}

/// Integer square root used by variant 2: `floor(sqrt(2^64 + input) * 2 - 2^33)`, with the floating point estimate
/// corrected by at most one in either direction.
fn v2_sqrt(input: u64) -> u64 {
    let estimate = ((input as f64 + 18446744073709551616.0).sqrt() * 2.0 - 8589934592.0) as u64;
    let s = estimate >> 1;
    let b = estimate & 1;
    let r2 = s.wrapping_mul(s + b).wrapping_add(estimate << 32);
    let mut result = estimate;
    if r2.wrapping_add(b) > input {
        result = result.wrapping_sub(1);
    }
    if r2.wrapping_add(1 << 32) < input.wrapping_sub(s) {
        result = result.wrapping_add(1);
    }
    result
}

/// Variant 1 table lookup on byte 11 of the stored AES output.
fn tweak_v1(block: &mut Block) {
    let t = block[11];
    let index = (((t >> 3) & 6) | (t & 1)) << 1;
    block[11] = t ^ ((0x75310u32 >> index) & 0x30) as u8;
}

fn mul128(a: u64, b: u64) -> (u64, u64) {
    let product = u128::from(a) * u128::from(b);
    ((product >> 64) as u64, product as u64)
}

fn block_at(bytes: &[u8], offset: usize) -> Block {
    bytes[offset..offset + BLOCK_SIZE].try_into().expect("slice is one block long")
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(bytes[offset..offset + 8].try_into().expect("slice is eight bytes long"))
}

fn low_word(block: &Block) -> u64 {
    read_u64(block, 0)
}

fn block_to_words(block: &Block) -> (u64, u64) {
    (read_u64(block, 0), read_u64(block, 8))
}

fn words_to_block(lo: u64, hi: u64) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    block[..8].copy_from_slice(&lo.to_le_bytes());
    block[8..].copy_from_slice(&hi.to_le_bytes());
    block
}

fn xor(a: &Block, b: &Block) -> Block {
    std::array::from_fn(|i| a[i] ^ b[i])
}

fn add(a: &Block, b: &Block) -> Block {
    let (a_lo, a_hi) = block_to_words(a);
    let (b_lo, b_hi) = block_to_words(b);
    words_to_block(a_lo.wrapping_add(b_lo), a_hi.wrapping_add(b_hi))
}
