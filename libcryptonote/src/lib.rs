//! CryptoNote key primitives over Ed25519.
//!
//! Stealth-address derivations, linkable key images, N/N multisig key aggregation, deterministic subwallets and the
//! transaction Merkle tree. The proof-of-work hashes live in the [`cryptonight`] crate, re-exported here.

pub mod derivation;
pub mod error;
pub mod hash_to_point;
pub mod key_image;
pub mod keys;
pub mod merkle;
pub mod multisig;
pub mod subwallet;

pub use cryptonight;
pub use cryptonight::{cn_fast_hash, Hash};

pub use derivation::{
    derivation_to_scalar, derive_public_key, derive_secret_key, generate_key_derivation, generate_keys,
    hash_to_scalar, scalar_mult_key, secret_key_to_public_key, underive_public_key,
};
pub use error::CryptoError;
pub use hash_to_point::hash_to_point;
pub use key_image::{generate_key_image, generate_partial_key_image, restore_key_image};
pub use keys::{check_key, check_scalar, KeyDerivation, KeyError, KeyImage, KeyPair, PublicKey, SecretKey};
pub use merkle::{tree_branch, tree_depth, tree_hash, tree_hash_from_branch};
pub use multisig::{generate_n_n, rounds_required, MultisigSharedKeys};
pub use subwallet::generate_deterministic_subwallet_keys;
