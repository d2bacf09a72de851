//! One-time output keys: Diffie-Hellman derivations and the keys derived from them.

use crate::keys::{KeyDerivation, KeyPair, PublicKey, SecretKey};
use cryptonight::cn_fast_hash;
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::Scalar;
use monero::consensus::encode::{serialize, VarInt};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// `Hs`: Keccak-256 of `data`, reduced modulo the group order.
pub fn hash_to_scalar<B: AsRef<[u8]>>(data: B) -> Scalar {
    Scalar::from_bytes_mod_order(cn_fast_hash(data).to_bytes())
}

pub fn generate_keys<R: CryptoRng + RngCore>(rng: &mut R) -> KeyPair {
    KeyPair::random(rng)
}

pub fn secret_key_to_public_key(secret: &SecretKey) -> PublicKey {
    secret.public_key()
}

/// `s·P`, without clearing the cofactor.
pub fn scalar_mult_key(point: &PublicKey, scalar: &SecretKey) -> PublicKey {
    PublicKey::from(scalar.as_scalar() * point.as_point())
}

/// `8·s·P`. Sender and receiver arrive at the same derivation: `8·r·(a·G) = 8·a·(r·G)`.
pub fn generate_key_derivation(public: &PublicKey, secret: &SecretKey) -> KeyDerivation {
    let shared = scalar_mult_key(public, secret).as_point().mul_by_cofactor();
    KeyDerivation::from(shared)
}

/// `Hs(derivation ‖ varint(output_index))`, the per-output scalar offset.
pub fn derivation_to_scalar(derivation: &KeyDerivation, output_index: u64) -> Scalar {
    let mut buf = Zeroizing::new(Vec::with_capacity(32 + 10));
    buf.extend_from_slice(derivation.as_bytes());
    buf.extend_from_slice(&serialize(&VarInt(output_index)));
    hash_to_scalar(&*buf)
}

/// The one-time public key of output `output_index`: `base + Hs(derivation ‖ index)·G`.
pub fn derive_public_key(derivation: &KeyDerivation, output_index: u64, base: &PublicKey) -> PublicKey {
    let offset = derivation_to_scalar(derivation, output_index);
    PublicKey::from(base.as_point() + &offset * ED25519_BASEPOINT_TABLE)
}

/// Inverse of [`derive_public_key`]: `derived - Hs(derivation ‖ index)·G`.
///
/// This never fails. If `derived` was not produced from this derivation and index the result is simply some other
/// key, and it is up to the caller to compare it with the spend key it expects.
pub fn underive_public_key(derivation: &KeyDerivation, output_index: u64, derived: &PublicKey) -> PublicKey {
    let offset = derivation_to_scalar(derivation, output_index);
    PublicKey::from(derived.as_point() - &offset * ED25519_BASEPOINT_TABLE)
}

/// The one-time secret key of output `output_index`: `Hs(derivation ‖ index) + base`.
pub fn derive_secret_key(derivation: &KeyDerivation, output_index: u64, base: &SecretKey) -> SecretKey {
    let offset = derivation_to_scalar(derivation, output_index);
    SecretKey::from(offset + base.as_scalar())
}
