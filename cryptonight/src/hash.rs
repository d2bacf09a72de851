use hex::FromHexError;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

pub const HASH_SIZE: usize = 32;

/// A 32-byte digest. Produced by every hash in this crate and consumed as Merkle leaves.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Parses a 64-character hex string into a `Hash`.
    pub fn from_hex(hex: &str) -> Result<Self, FromHexError> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hex.as_bytes(), &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(value: [u8; HASH_SIZE]) -> Self {
        Self(value)
    }
}

impl From<Hash> for [u8; HASH_SIZE] {
    fn from(value: Hash) -> Self {
        value.0
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = FromHexError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; HASH_SIZE]>::try_from(value).map_err(|_| FromHexError::InvalidStringLength)?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Hash {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", self.as_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Hash::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let hex_h = "b542df5b6e7f5f05275c98e7345884e2ac726aeeb07e03e44e0389eb86cd05f0";
        let hash = Hash::from_hex(hex_h).unwrap();
        assert_eq!(hash.as_hex(), hex_h);
        assert_eq!(hash.to_string(), hex_h);
        assert_eq!(hex_h.parse::<Hash>().unwrap(), hash);
    }

    #[test]
    fn from_hex_errors() {
        assert!(matches!(Hash::from_hex("b542df"), Err(FromHexError::InvalidStringLength)));
        let bad = "b542df5b6e7f5f05275c98e7345884e2ac726aeeb07e03e44e0389eb86cd05fz";
        assert!(matches!(
            Hash::from_hex(bad),
            Err(FromHexError::InvalidHexCharacter { c: 'z', index: 63 })
        ));
        assert!(Hash::try_from(&[0u8; 31][..]).is_err());
        assert!(Hash::try_from(&[0u8; 32][..]).is_ok());
    }
}
