use crate::keys::{KeyPair, SecretKey, KEY_SIZE};
use cryptonight::cn_fast_hash;
use zeroize::Zeroizing;

/// Derives subwallet `index` from a master spend key.
///
/// Index 0 is the master wallet itself. For `n > 0` the master key bytes are hashed `n` times, each round appending
/// `n` as a little-endian u64, and the last digest is reduced to a scalar. The work is linear in `index`.
pub fn generate_deterministic_subwallet_keys(master_secret: &SecretKey, index: u64) -> KeyPair {
    if index == 0 {
        return KeyPair::from_secret(master_secret.clone());
    }
    let mut buf = Zeroizing::new([0u8; KEY_SIZE + 8]);
    buf[..KEY_SIZE].copy_from_slice(&master_secret.to_bytes());
    buf[KEY_SIZE..].copy_from_slice(&index.to_le_bytes());
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    for _ in 0..index {
        *key = cn_fast_hash(&buf[..]).to_bytes();
        buf[..KEY_SIZE].copy_from_slice(&key[..]);
    }
    KeyPair::from_secret(SecretKey::from_bytes_mod_order(*key))
}
