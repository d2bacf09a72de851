use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("{algorithm} requires at least {required} bytes of input, but only {actual} were supplied")]
    InputTooShort { algorithm: &'static str, required: usize, actual: usize },
    #[error("Could not allocate a scratchpad of {0} bytes")]
    Allocation(usize),
    #[error("Invalid CryptoNight parameters: {0}")]
    InvalidParameters(String),
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Argon2 error: {0}")]
    Argon2(String),
}

impl From<argon2::Error> for HashError {
    fn from(err: argon2::Error) -> Self {
        HashError::Argon2(err.to_string())
    }
}
