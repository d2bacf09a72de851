use crate::hash::Hash;
use crate::keccak::STATE_SIZE;
use digest::consts::U32;
use digest::Digest;
use groestl::Groestl256;
use jh::Jh256;
use skein::Skein512;

/// The 256-bit hash applied to the final CryptoNight state, selected by its two lowest bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalizer {
    Blake256,
    Groestl256,
    Jh256,
    Skein512_256,
}

impl Finalizer {
    pub fn select(state: &[u8; STATE_SIZE]) -> Self {
        match state[0] & 3 {
            0 => Finalizer::Blake256,
            1 => Finalizer::Groestl256,
            2 => Finalizer::Jh256,
            _ => Finalizer::Skein512_256,
        }
    }

    pub fn hash(&self, data: &[u8]) -> Hash {
        let mut out = [0u8; 32];
        match self {
            Finalizer::Blake256 => {
                let mut hasher = blake::Blake::new(256).expect("Should be able to create Blake instance");
                hasher.update(data);
                hasher.finalise(&mut out);
            }
            Finalizer::Groestl256 => out.copy_from_slice(&Groestl256::digest(data)),
            Finalizer::Jh256 => out.copy_from_slice(&Jh256::digest(data)),
            Finalizer::Skein512_256 => out.copy_from_slice(&Skein512::<U32>::digest(data)),
        }
        Hash::new(out)
    }
}
