use crate::derivation::derivation_to_scalar;
use crate::hash_to_point::hash_to_point;
use crate::keys::{KeyDerivation, KeyImage, PublicKey, SecretKey};
use curve25519_dalek::EdwardsPoint;
use log::*;

/// `x·Hp(P)`.
///
/// `secret` is not checked against `public`: multisig participants call this with their share of the spend key to
/// produce partial images, and for those `secret·G != public` by construction.
pub fn generate_key_image(public: &PublicKey, secret: &SecretKey) -> KeyImage {
    let hp = hash_to_point(public.to_bytes());
    KeyImage::from(secret.as_scalar() * hp)
}

/// A co-signer's contribution to the key image of a shared output: their spend key share applied to `Hp(P)`.
pub fn generate_partial_key_image(public_ephemeral: &PublicKey, spend_secret_share: &SecretKey) -> KeyImage {
    generate_key_image(public_ephemeral, spend_secret_share)
}

/// Reassembles the key image of a multisig output from the participants' partial images.
///
/// The one-time secret of the output is `Hs(derivation ‖ index) + Σ bᵢ`, so its image is
/// `Hs(derivation ‖ index)·Hp(P) + Σ bᵢ·Hp(P)`. The result is not validated: if a partial image is wrong, the
/// returned image is wrong too and will not match the ring signature.
pub fn restore_key_image(
    public_ephemeral: &PublicKey,
    derivation: &KeyDerivation,
    output_index: u64,
    partial_key_images: &[KeyImage],
) -> KeyImage {
    trace!("Restoring key image for output {output_index} from {} partial images", partial_key_images.len());
    let offset = derivation_to_scalar(derivation, output_index);
    let hp = hash_to_point(public_ephemeral.to_bytes());
    let partials = partial_key_images.iter().map(KeyImage::as_point).sum::<EdwardsPoint>();
    KeyImage::from(offset * hp + partials)
}
