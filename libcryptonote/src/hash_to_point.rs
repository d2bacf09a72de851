//! Hashing arbitrary bytes onto the prime-order subgroup of Ed25519, the way CryptoNote's `hash_to_ec` does it.
//!
//! The Keccak digest is read as a field element and pushed through an Elligator-style map onto the curve, then
//! multiplied by the cofactor. The inputs are public keys, so the field arithmetic here is plain (variable time)
//! big-integer arithmetic.

use cryptonight::cn_fast_hash;
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::EdwardsPoint;
use num_bigint::BigUint;
use std::sync::LazyLock;

static FIELD: LazyLock<Field> = LazyLock::new(Field::new);

/// Montgomery `A` coefficient of Curve25519.
const MONTGOMERY_A: u32 = 486662;

struct Field {
    p: BigUint,
    a: BigUint,
    sqrt_m1: BigUint,
    /// sqrt(-2A(A+2))
    fffb1: BigUint,
    /// sqrt(2A(A+2))
    fffb2: BigUint,
    /// sqrt(-sqrt(-1)A(A+2))
    fffb3: BigUint,
    /// sqrt(sqrt(-1)A(A+2))
    fffb4: BigUint,
    /// (p - 5) / 8
    exp_p58: BigUint,
}

impl Field {
    fn new() -> Self {
        let p = (BigUint::from(1u8) << 255u32) - BigUint::from(19u8);
        let one = BigUint::from(1u8);
        let sqrt_m1 = BigUint::from(2u8).modpow(&((&p - &one) >> 2u32), &p);
        let a = BigUint::from(MONTGOMERY_A);
        let exp_p58 = (&p - BigUint::from(5u8)) >> 3u32;
        let mut field = Self {
            p,
            a,
            sqrt_m1,
            fffb1: BigUint::default(),
            fffb2: BigUint::default(),
            fffb3: BigUint::default(),
            fffb4: BigUint::default(),
            exp_p58,
        };
        let a_a2 = field.mul(&field.a, &(&field.a + BigUint::from(2u8)));
        let two_a_a2 = field.add(&a_a2, &a_a2);
        field.fffb1 = field.sqrt(&field.neg(&two_a_a2));
        field.fffb2 = field.sqrt(&two_a_a2);
        let i_a_a2 = field.mul(&field.sqrt_m1, &a_a2);
        field.fffb3 = field.sqrt(&field.neg(&i_a_a2));
        field.fffb4 = field.sqrt(&i_a_a2);
        field
    }

    fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.p
    }

    fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + &self.p - b) % &self.p
    }

    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    fn neg(&self, a: &BigUint) -> BigUint {
        (&self.p - a) % &self.p
    }

    fn pow(&self, a: &BigUint, e: &BigUint) -> BigUint {
        a.modpow(e, &self.p)
    }

    fn invert(&self, a: &BigUint) -> BigUint {
        self.pow(a, &(&self.p - BigUint::from(2u8)))
    }

    fn is_zero(a: &BigUint) -> bool {
        a.bits() == 0
    }

    fn is_odd(a: &BigUint) -> bool {
        a.bit(0)
    }

    /// A square root of a quadratic residue. Only used for the constants, which are all residues.
    fn sqrt(&self, c: &BigUint) -> BigUint {
        let r = self.pow(c, &((&self.p + BigUint::from(3u8)) >> 3u32));
        if self.mul(&r, &r) == *c {
            r
        } else {
            self.mul(&r, &self.sqrt_m1)
        }
    }

    fn element(&self, bytes: &[u8]) -> BigUint {
        BigUint::from_bytes_le(bytes) % &self.p
    }

    fn encode(a: &BigUint) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = a.to_bytes_le();
        out[..bytes.len()].copy_from_slice(&bytes);
        out
    }

    /// Maps a field element onto the curve, returning the compressed encoding of the (not yet cofactor-cleared) point.
    fn map_to_curve(&self, u: &BigUint) -> [u8; 32] {
        let two = BigUint::from(2u8);
        let v = self.mul(&two, &self.mul(u, u));
        let w = self.add(&v, &BigUint::from(1u8));
        // x = w^2 - 2A^2u^2
        let a_sq_v = self.mul(&self.mul(&self.a, &self.a), &v);
        let x = self.sub(&self.mul(&w, &w), &a_sq_v);
        // rx = (w / x)^((p + 3) / 8) = w x^3 (w x^7)^((p - 5) / 8)
        let x3 = self.pow(&x, &BigUint::from(3u8));
        let x7 = self.pow(&x, &BigUint::from(7u8));
        let mut rx = self.mul(&self.mul(&w, &x3), &self.pow(&self.mul(&w, &x7), &self.exp_p58));
        let check = self.mul(&self.mul(&rx, &rx), &x);

        let (z, sign) = if Self::is_zero(&self.sub(&w, &check)) {
            rx = self.mul(&self.mul(&rx, &self.fffb2), u);
            (self.neg(&self.mul(&self.a, &v)), false)
        } else if Self::is_zero(&self.add(&w, &check)) {
            rx = self.mul(&self.mul(&rx, &self.fffb1), u);
            (self.neg(&self.mul(&self.a, &v)), false)
        } else {
            let check = self.mul(&check, &self.sqrt_m1);
            let root = if Self::is_zero(&self.sub(&w, &check)) { &self.fffb4 } else { &self.fffb3 };
            rx = self.mul(&rx, root);
            (self.neg(&self.a), true)
        };
        if Self::is_odd(&rx) != sign {
            rx = self.neg(&rx);
        }
        // Projective (X : Y : Z) = (rx (z + w) : z - w : z + w), so affine x = rx and y = (z - w) / (z + w).
        let y = self.mul(&self.sub(&z, &w), &self.invert(&self.add(&z, &w)));
        let mut encoded = Self::encode(&y);
        if Self::is_odd(&rx) {
            encoded[31] |= 0x80;
        }
        encoded
    }
}

/// `hash_to_ec`: Keccak-256 of `data`, mapped onto the curve and multiplied by 8.
pub fn hash_to_point<B: AsRef<[u8]>>(data: B) -> EdwardsPoint {
    let field = &*FIELD;
    let digest = cn_fast_hash(data);
    let u = field.element(digest.as_bytes());
    let encoded = field.map_to_curve(&u);
    CompressedEdwardsY(encoded)
        .decompress()
        .expect("the Elligator map always produces a point on the curve")
        .mul_by_cofactor()
}
