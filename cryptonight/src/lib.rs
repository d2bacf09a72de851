//! The CryptoNote proof-of-work hash family.
//!
//! `cn_fast_hash` is plain Keccak-256. The slow hashes are CryptoNight in three tweak variants across six memory
//! profiles, plus Chukwa (Argon2id). Every function is deterministic, keeps no state between calls, and reproduces the
//! digests used for block validation on the networks that adopted it.

mod aes;
pub mod algorithm;
pub mod chukwa;
pub mod error;
pub mod finalizer;
pub mod hash;
pub mod keccak;
pub mod params;
pub mod slow_hash;

pub use algorithm::HashAlgorithm;
pub use chukwa::chukwa_slow_hash;
pub use error::HashError;
pub use hash::{Hash, HASH_SIZE};
pub use keccak::cn_fast_hash;
pub use params::{ChukwaParams, CryptoNightParams, SizeClass, Variant};
pub use slow_hash::cn_slow_hash;

macro_rules! slow_hash_entry_points {
    ($($name:ident => ($size:ident, $variant:ident)),+ $(,)?) => {
        $(
            #[doc = concat!(
                "`", stringify!($name), "`: CryptoNight over the `", stringify!($size), "` profile, variant ",
                stringify!($variant), "."
            )]
            pub fn $name(data: &[u8]) -> Result<Hash, HashError> {
                cn_slow_hash(data, SizeClass::$size.params(), Variant::$variant)
            }
        )+
    };
}

slow_hash_entry_points! {
    cn_slow_hash_v0 => (Standard, V0),
    cn_slow_hash_v1 => (Standard, V1),
    cn_slow_hash_v2 => (Standard, V2),
    cn_lite_slow_hash_v0 => (Lite, V0),
    cn_lite_slow_hash_v1 => (Lite, V1),
    cn_lite_slow_hash_v2 => (Lite, V2),
    cn_dark_slow_hash_v0 => (Dark, V0),
    cn_dark_slow_hash_v1 => (Dark, V1),
    cn_dark_slow_hash_v2 => (Dark, V2),
    cn_dark_lite_slow_hash_v0 => (DarkLite, V0),
    cn_dark_lite_slow_hash_v1 => (DarkLite, V1),
    cn_dark_lite_slow_hash_v2 => (DarkLite, V2),
    cn_turtle_slow_hash_v0 => (Turtle, V0),
    cn_turtle_slow_hash_v1 => (Turtle, V1),
    cn_turtle_slow_hash_v2 => (Turtle, V2),
    cn_turtle_lite_slow_hash_v0 => (TurtleLite, V0),
    cn_turtle_lite_slow_hash_v1 => (TurtleLite, V1),
    cn_turtle_lite_slow_hash_v2 => (TurtleLite, V2),
}
