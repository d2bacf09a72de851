//! N/N multisignature wallet keys.
//!
//! Every participant contributes a spend key pair and a view key pair. The shared wallet's public spend key is the sum
//! of the public spend keys and its secret view key is the sum of the secret view keys, so every participant can scan
//! for incoming outputs while spending needs all of them (see [`crate::key_image::restore_key_image`]).

use crate::error::CryptoError;
use crate::keys::{PublicKey, SecretKey};
use curve25519_dalek::{EdwardsPoint, Scalar};
use log::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigSharedKeys {
    pub public_spend_key: PublicKey,
    pub secret_view_key: SecretKey,
}

impl MultisigSharedKeys {
    pub fn public_view_key(&self) -> PublicKey {
        self.secret_view_key.public_key()
    }
}

impl Debug for MultisigSharedKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MultisigSharedKeys(public_spend_key: {}, ", self.public_spend_key.as_hex())?;
        write!(f, "public_view_key: {})", self.public_view_key().as_hex())
    }
}

/// Combines our keys with every other participant's into the shared wallet keys.
///
/// Both sums are commutative, so every participant arrives at the same keys whatever order the others' keys are
/// listed in. The two lists must be the same length, one entry per other participant.
pub fn generate_n_n(
    my_spend_public: &PublicKey,
    my_view_secret: &SecretKey,
    other_spend_publics: &[PublicKey],
    other_view_secrets: &[SecretKey],
) -> Result<MultisigSharedKeys, CryptoError> {
    if other_spend_publics.len() != other_view_secrets.len() {
        return Err(CryptoError::ArgumentMismatch {
            public_keys: other_spend_publics.len(),
            secret_keys: other_view_secrets.len(),
        });
    }
    debug!("Generating {n}/{n} multisig keys", n = other_spend_publics.len() + 1);
    let public_spend_key =
        my_spend_public.as_point() + other_spend_publics.iter().map(PublicKey::as_point).sum::<EdwardsPoint>();
    let secret_view_key =
        my_view_secret.as_scalar() + other_view_secrets.iter().map(SecretKey::as_scalar).sum::<Scalar>();
    Ok(MultisigSharedKeys {
        public_spend_key: PublicKey::from(public_spend_key),
        secret_view_key: SecretKey::from(secret_view_key),
    })
}

/// Number of key exchange rounds an M/N wallet needs: `participants - threshold + 1`.
pub fn rounds_required(participants: u32, threshold: u32) -> Result<u32, CryptoError> {
    if threshold == 0 || threshold > participants {
        return Err(CryptoError::InvalidThreshold { participants, threshold });
    }
    Ok(participants - threshold + 1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::KeyPair;
    use rand::rng;

    struct Participant {
        spend: KeyPair,
        view: KeyPair,
    }

    fn participants(n: usize) -> Vec<Participant> {
        let mut rng = rng();
        (0..n).map(|_| Participant { spend: KeyPair::random(&mut rng), view: KeyPair::random(&mut rng) }).collect()
    }

    fn shared_keys_for(me: usize, all: &[Participant]) -> MultisigSharedKeys {
        let others = all.iter().enumerate().filter(|(i, _)| *i != me).map(|(_, p)| p).collect::<Vec<_>>();
        let spend = others.iter().map(|p| *p.spend.public_key()).collect::<Vec<_>>();
        let view = others.iter().map(|p| p.view.secret_key().clone()).collect::<Vec<_>>();
        generate_n_n(all[me].spend.public_key(), all[me].view.secret_key(), &spend, &view).unwrap()
    }

    #[test]
    fn every_participant_agrees() {
        let all = participants(4);
        let keys = shared_keys_for(0, &all);
        for me in 1..all.len() {
            assert_eq!(shared_keys_for(me, &all), keys);
        }
        let spend_sum = all.iter().map(|p| p.spend.secret_key().as_scalar()).sum::<Scalar>();
        assert_eq!(SecretKey::from(spend_sum).public_key(), keys.public_spend_key);
    }

    #[test]
    fn single_participant_keeps_own_keys() {
        let all = participants(1);
        let keys = shared_keys_for(0, &all);
        assert_eq!(keys.public_spend_key, *all[0].spend.public_key());
        assert_eq!(keys.secret_view_key, *all[0].view.secret_key());
    }

    #[test]
    fn mismatched_lists_are_rejected() {
        let all = participants(3);
        let spend = vec![*all[1].spend.public_key(), *all[2].spend.public_key()];
        let view = vec![all[1].view.secret_key().clone()];
        let err = generate_n_n(all[0].spend.public_key(), all[0].view.secret_key(), &spend, &view).unwrap_err();
        assert_eq!(err, CryptoError::ArgumentMismatch { public_keys: 2, secret_keys: 1 });
    }

    #[test]
    fn rounds() {
        assert_eq!(rounds_required(2, 2).unwrap(), 1);
        assert_eq!(rounds_required(3, 2).unwrap(), 2);
        assert_eq!(rounds_required(5, 1).unwrap(), 5);
        assert!(matches!(rounds_required(2, 3), Err(CryptoError::InvalidThreshold { .. })));
        assert!(matches!(rounds_required(2, 0), Err(CryptoError::InvalidThreshold { .. })));
    }
}
