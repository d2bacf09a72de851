use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::{EdwardsPoint, Scalar};
use hex::FromHexError;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use thiserror::Error;
use zeroize::Zeroizing;

pub const KEY_SIZE: usize = 32;

/// Returns true if `bytes` is the canonical encoding of a point on the curve.
///
/// Secret keys are scalars, not points, so a secret key handed to this function is (overwhelmingly) rejected.
pub fn check_key(bytes: &[u8; KEY_SIZE]) -> bool {
    let compressed = CompressedEdwardsY(*bytes);
    compressed.decompress().is_some_and(|point| point.compress() == compressed)
}

/// Returns true if `bytes` is a fully reduced scalar, i.e. strictly less than the group order.
pub fn check_scalar(bytes: &[u8; KEY_SIZE]) -> bool {
    Scalar::from_canonical_bytes(*bytes).is_some().into()
}

fn decode_hex(hex: &str) -> Result<[u8; KEY_SIZE], KeyError> {
    if hex.len() != 2 * KEY_SIZE {
        return Err(KeyError::InvalidStringLength);
    }
    let mut bytes = [0u8; KEY_SIZE];
    hex::decode_to_slice(hex.as_bytes(), &mut bytes)?;
    Ok(bytes)
}

fn key_bytes(slice: &[u8]) -> Result<[u8; KEY_SIZE], KeyError> {
    <[u8; KEY_SIZE]>::try_from(slice).map_err(|_| KeyError::InvalidLength { expected: KEY_SIZE, actual: slice.len() })
}

//------------------------------------------   Secret keys   ------------------------------------------------

/// A canonical Ed25519 scalar, wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Zeroizing<Scalar>);

impl SecretKey {
    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.0.to_bytes()
    }

    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let mut scalar_bytes = Zeroizing::new([0u8; 64]);
        rng.fill_bytes(&mut *scalar_bytes);
        Self::from(Scalar::from_bytes_mod_order_wide(&scalar_bytes))
    }

    /// Accepts only canonical (fully reduced) scalars.
    pub fn from_bytes(bytes: &[u8; KEY_SIZE]) -> Result<Self, KeyError> {
        match Scalar::from_canonical_bytes(*bytes).into_option() {
            None => Err(KeyError::NonCanonicalScalar),
            Some(scalar) => Ok(Self::from(scalar)),
        }
    }

    /// Reduces 32 arbitrary bytes modulo the group order (`sc_reduce32`).
    pub fn from_bytes_mod_order(bytes: [u8; KEY_SIZE]) -> Self {
        Self::from(Scalar::from_bytes_mod_order(bytes))
    }

    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(decode_hex(hex)?);
        Self::from_bytes(&bytes)
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(self.as_scalar() * ED25519_BASEPOINT_TABLE)
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey")
    }
}

impl From<Scalar> for SecretKey {
    fn from(value: Scalar) -> Self {
        Self(Zeroizing::new(value))
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(&key_bytes(value)?)
    }
}

impl From<&SecretKey> for monero::PrivateKey {
    fn from(value: &SecretKey) -> Self {
        monero::PrivateKey { scalar: *value.as_scalar() }
    }
}

impl From<monero::PrivateKey> for SecretKey {
    fn from(value: monero::PrivateKey) -> Self {
        Self::from(value.scalar)
    }
}

impl Serialize for SecretKey {
    /// Serializes the secret key as a hex-encoded string.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = Zeroizing::new(String::deserialize(deserializer)?);
        SecretKey::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

//------------------------------------------   Public keys   ------------------------------------------------

/// A validated curve point together with its canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    compressed_point: CompressedEdwardsY,
    point: EdwardsPoint,
}

impl PublicKey {
    pub fn as_compressed(&self) -> &CompressedEdwardsY {
        &self.compressed_point
    }

    pub fn as_point(&self) -> EdwardsPoint {
        self.point
    }

    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.compressed_point.to_bytes()
    }

    /// Decodes a compressed point. Off-curve and non-canonical encodings are rejected.
    pub fn from_bytes(bytes: &[u8; KEY_SIZE]) -> Result<Self, KeyError> {
        Self::try_from(CompressedEdwardsY(*bytes))
    }

    /// Tries to deserialize a hex string into a `PublicKey`. The hex string must represent a valid, canonically
    /// compressed point on the curve.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        Self::from_bytes(&decode_hex(hex)?)
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.compressed_point.to_bytes())
    }
}

impl From<EdwardsPoint> for PublicKey {
    fn from(value: EdwardsPoint) -> Self {
        let compressed_point = value.compress();
        Self { compressed_point, point: value }
    }
}

impl TryFrom<CompressedEdwardsY> for PublicKey {
    type Error = KeyError;
    fn try_from(value: CompressedEdwardsY) -> Result<Self, Self::Error> {
        let point = value.decompress().ok_or(KeyError::InvalidPoint)?;
        if point.compress() != value {
            return Err(KeyError::InvalidPoint);
        }
        Ok(Self { compressed_point: value, point })
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(&key_bytes(value)?)
    }
}

impl From<PublicKey> for monero::PublicKey {
    fn from(value: PublicKey) -> Self {
        monero::PublicKey { point: value.compressed_point }
    }
}

impl TryFrom<monero::PublicKey> for PublicKey {
    type Error = KeyError;

    fn try_from(value: monero::PublicKey) -> Result<Self, Self::Error> {
        Self::try_from(value.point)
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        PublicKey::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

//------------------------------------------   Key pairs   ------------------------------------------------

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKeyPair")]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

#[derive(Deserialize)]
struct RawKeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl TryFrom<RawKeyPair> for KeyPair {
    type Error = KeyError;

    fn try_from(raw: RawKeyPair) -> Result<Self, Self::Error> {
        let pair = KeyPair::from_secret(raw.secret_key);
        if pair.public_key != raw.public_key {
            return Err(KeyError::KeyPairMismatch);
        }
        Ok(pair)
    }
}

impl KeyPair {
    pub fn from_secret(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self { secret_key, public_key }
    }

    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self::from_secret(SecretKey::random(rng))
    }

    pub fn from_hex(secret: &str) -> Result<Self, KeyError> {
        Ok(Self::from_secret(SecretKey::from_hex(secret)?))
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyPair({})", self.public_key.as_hex())
    }
}

//------------------------------------------   Derivations and images   ----------------------------------------

/// The shared secret `8·r·A` between a transaction key and a view key, kept as its 32-byte encoding.
///
/// A derivation is only ever hashed, never decompressed, so any 32 bytes are accepted.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivation([u8; KEY_SIZE]);

impl KeyDerivation {
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        Ok(Self(decode_hex(hex)?))
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<EdwardsPoint> for KeyDerivation {
    fn from(value: EdwardsPoint) -> Self {
        Self(value.compress().to_bytes())
    }
}

impl TryFrom<&[u8]> for KeyDerivation {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(key_bytes(value)?))
    }
}

impl Debug for KeyDerivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyDerivation({})", self.as_hex())
    }
}

impl Serialize for KeyDerivation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for KeyDerivation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        KeyDerivation::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// `x·Hp(P)`: the linking tag of an output. Key images are points and are validated on decode.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyImage(PublicKey);

impl KeyImage {
    pub fn as_point(&self) -> EdwardsPoint {
        self.0.as_point()
    }

    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.0.to_bytes()
    }

    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        Ok(Self(PublicKey::from_hex(hex)?))
    }

    pub fn as_hex(&self) -> String {
        self.0.as_hex()
    }
}

impl From<EdwardsPoint> for KeyImage {
    fn from(value: EdwardsPoint) -> Self {
        Self(PublicKey::from(value))
    }
}

impl TryFrom<&[u8]> for KeyImage {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(PublicKey::try_from(value)?))
    }
}

impl From<KeyImage> for monero::blockdata::transaction::KeyImage {
    fn from(value: KeyImage) -> Self {
        monero::blockdata::transaction::KeyImage { image: monero::Hash::from(value.to_bytes()) }
    }
}

impl TryFrom<monero::blockdata::transaction::KeyImage> for KeyImage {
    type Error = KeyError;

    fn try_from(value: monero::blockdata::transaction::KeyImage) -> Result<Self, Self::Error> {
        Self::try_from(value.image.as_bytes())
    }
}

impl Debug for KeyImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyImage({})", self.as_hex())
    }
}

impl Display for KeyImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeyError {
    #[error("Invalid point on curve")]
    InvalidPoint,
    #[error("Could not deserialize from hex: {0}")]
    HexDeserializationError(#[from] FromHexError),
    #[error("Invalid string length")]
    InvalidStringLength,
    #[error("Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Not a valid secret key")]
    NonCanonicalScalar,
    #[error("Public key does not match the secret key")]
    KeyPairMismatch,
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rng;

    #[test]
    fn keypair() {
        let pair = KeyPair::random(&mut rng());
        assert_eq!(pair.secret_key().public_key(), *pair.public_key());
        assert!(check_key(&pair.public_key().to_bytes()));
    }

    #[test]
    fn from_hex() {
        let hex_k = "4a078e76cd41a3d3b534b83dc6f2ea2de500b653ca82273b7bfad8045d85a400";
        let hex_p = "7849297236cd7c0d6c69a3c8c179c038d3c1c434735741bb3c8995c3c9d6f2ac";
        let secret = SecretKey::from_hex(hex_k).unwrap();
        let public = PublicKey::from_hex(hex_p).unwrap();
        assert_eq!(secret.as_hex(), hex_k);
        assert_eq!(public.as_hex(), hex_p);
        assert_eq!(secret.public_key(), public);
    }

    #[test]
    fn from_hex_errors() {
        let hex_k = "ce89029949049c902fdd5f2bf1493977dd061e782c44fd634b512bd75bc5ecff";
        let secret = SecretKey::from_hex(hex_k);
        assert!(matches!(secret, Err(KeyError::NonCanonicalScalar)), "IsErr: {}", secret.is_err());

        let hex_k = "ce89029949049c902fdd5f2bf1493977dd061e782c44fd6";
        let secret = SecretKey::from_hex(hex_k);
        assert!(matches!(secret, Err(KeyError::InvalidStringLength)));

        let hex_p = "4dd896d542721742aff8671ba42aff0c4c846bea79065cf39a191bbeb11ea635";
        let public = PublicKey::from_hex(hex_p);
        assert!(matches!(public, Err(KeyError::InvalidPoint)), "Should fail: {public:?}");

        let hex_p = "4dd896d542721742aff8671ba42aff0c4c846bea79065cf39a191bbeb11ea63x";
        let public = PublicKey::from_hex(hex_p);
        assert!(matches!(
            public,
            Err(KeyError::HexDeserializationError(FromHexError::InvalidHexCharacter { c: 'x', index: 63 }))
        ));
    }

    #[test]
    fn check_key_accepts_points_only() {
        let point = hex::decode("7849297236cd7c0d6c69a3c8c179c038d3c1c434735741bb3c8995c3c9d6f2ac").unwrap();
        let scalar = hex::decode("4a078e76cd41a3d3b534b83dc6f2ea2de500b653ca82273b7bfad8045d85a400").unwrap();
        assert!(check_key(&point.try_into().unwrap()));
        assert!(!check_key(&scalar.try_into().unwrap()));
    }

    #[test]
    fn non_canonical_point_encodings_are_rejected() {
        // y = p + 1 encodes the same point as y = 1 (the identity) but is not canonical.
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0xee;
        bytes[31] = 0x7f;
        assert!(!check_key(&bytes));
        assert!(matches!(PublicKey::from_bytes(&bytes), Err(KeyError::InvalidPoint)));
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(check_key(&identity));
    }

    #[test]
    fn check_scalar_bounds() {
        assert!(check_scalar(&[0u8; 32]));
        assert!(check_scalar(&(-Scalar::ONE).to_bytes()));
        assert!(!check_scalar(&[0xffu8; 32]));
    }

    #[test]
    fn byte_slices_must_be_32_bytes() {
        assert_eq!(PublicKey::try_from(&[0u8; 31][..]), Err(KeyError::InvalidLength { expected: 32, actual: 31 }));
        let too_long = SecretKey::try_from(&[0u8; 33][..]);
        assert!(matches!(too_long, Err(KeyError::InvalidLength { expected: 32, actual: 33 })));
        assert!(KeyDerivation::try_from(&[0xffu8; 32][..]).is_ok());
    }

    #[test]
    fn serde_as_hex() {
        let pair = KeyPair::from_hex("4a078e76cd41a3d3b534b83dc6f2ea2de500b653ca82273b7bfad8045d85a400").unwrap();
        let text = ron::to_string(&pair).unwrap();
        assert!(text.contains("\"7849297236cd7c0d6c69a3c8c179c038d3c1c434735741bb3c8995c3c9d6f2ac\""));
        let decoded: KeyPair = ron::from_str(&text).unwrap();
        assert_eq!(decoded, pair);
        let other = KeyPair::random(&mut rng());
        let mismatched = text.replace(&pair.public_key().as_hex(), &other.public_key().as_hex());
        assert!(ron::from_str::<KeyPair>(&mismatched).is_err());
    }

    #[test]
    fn monero_interop() {
        let pair = KeyPair::random(&mut rng());
        let xmr_public = monero::PublicKey::from(*pair.public_key());
        let xmr_secret = monero::PrivateKey::from(pair.secret_key());
        assert_eq!(monero::PublicKey::from_private_key(&xmr_secret), xmr_public);
        assert_eq!(PublicKey::try_from(xmr_public).unwrap(), *pair.public_key());
        assert_eq!(SecretKey::from(xmr_secret), *pair.secret_key());
    }

    #[test]
    fn key_image_monero_interop() {
        let image = KeyImage::from_hex("5997cf23543ce2e05c327297a47f26e710af868344859a6f8d65683d8a2498b0").unwrap();
        let xmr_image = monero::blockdata::transaction::KeyImage::from(image);
        assert_eq!(xmr_image.image.as_bytes(), &image.to_bytes()[..]);
        assert_eq!(KeyImage::try_from(xmr_image).unwrap(), image);

        let bytes: [u8; 32] = hex::decode("4dd896d542721742aff8671ba42aff0c4c846bea79065cf39a191bbeb11ea635")
            .unwrap()
            .try_into()
            .unwrap();
        let off_curve = monero::blockdata::transaction::KeyImage { image: monero::Hash::from(bytes) };
        assert_eq!(KeyImage::try_from(off_curve), Err(KeyError::InvalidPoint));
    }
}
