use crate::error::HashError;
use crate::hash::Hash;
use crate::params::ChukwaParams;
use argon2::{Algorithm, Argon2, Params, Version};
use log::*;

/// Chukwa proof-of-work: Argon2id over the whole input, salted with its first 16 bytes.
pub fn chukwa_slow_hash(data: &[u8]) -> Result<Hash, HashError> {
    chukwa_with_params(data, &ChukwaParams::DEFAULT)
}

pub fn chukwa_with_params(data: &[u8], params: &ChukwaParams) -> Result<Hash, HashError> {
    if data.len() < params.salt_len {
        return Err(HashError::InputTooShort {
            algorithm: "Chukwa",
            required: params.salt_len,
            actual: data.len(),
        });
    }
    if params.output_len != 32 {
        return Err(HashError::InvalidParameters(format!(
            "Chukwa output must be 32 bytes, not {}",
            params.output_len
        )));
    }
    trace!(
        "Chukwa: {} byte input, {} KiB, {} passes, {} lanes",
        data.len(),
        params.memory_kib,
        params.iterations,
        params.threads
    );
    let argon_params = Params::new(params.memory_kib, params.iterations, params.threads, Some(params.output_len))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);
    let mut out = [0u8; 32];
    argon.hash_password_into(data, &data[..params.salt_len], &mut out)?;
    Ok(Hash::new(out))
}
