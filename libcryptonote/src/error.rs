use crate::keys::KeyError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CryptoError {
    #[error("Key decoding error: {0}")]
    Key(#[from] KeyError),
    #[error("Mismatched inputs: {public_keys} public spend keys but {secret_keys} secret view keys")]
    ArgumentMismatch { public_keys: usize, secret_keys: usize },
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    #[error("A threshold of {threshold} is not possible with {participants} participants")]
    InvalidThreshold { participants: u32, threshold: u32 },
}
