//! Text encodings for a derived key and its salt.
//!
//! The bare format is `base58(key || salt)` with no header; the lengths and
//! Argon2 parameters are tracked by the caller. The [`v1`] envelope embeds
//! them for callers that want self-describing hashes.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::HasherConfig;
use crate::error::HashError;

pub mod v1;

pub use v1::{open, seal};

/// A derived key together with the salt it was derived with.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HashSalt {
    key: Vec<u8>,
    salt: Vec<u8>,
}

impl HashSalt {
    pub fn new(key: Vec<u8>, salt: Vec<u8>) -> Self {
        Self { key, salt }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl std::fmt::Debug for HashSalt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashSalt")
            .field("key_len", &self.key.len())
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

impl PartialEq for HashSalt {
    fn eq(&self, other: &Self) -> bool {
        (self.key.ct_eq(&other.key) & self.salt.ct_eq(&other.salt)).into()
    }
}

impl Eq for HashSalt {}

/// Encode `key || salt` as base58.
pub fn wrap(data: &HashSalt) -> String {
    let mut buf = Vec::with_capacity(data.key.len() + data.salt.len());
    buf.extend_from_slice(&data.key);
    buf.extend_from_slice(&data.salt);

    let encoded = bs58::encode(&buf).into_string();
    buf.zeroize();
    encoded
}

/// Decode a bare artifact and split it into key and salt.
///
/// # Errors
///
/// Returns [`HashError::Decode`] if the text is not base58 and
/// [`HashError::Format`] unless the decoded length is exactly
/// `key_len + salt_len`.
pub fn unwrap(encoded: &str, config: &HasherConfig) -> Result<HashSalt, HashError> {
    let mut data = bs58::decode(encoded).into_vec()?;

    if data.len() != config.encoded_len() {
        data.zeroize();
        return Err(HashError::Format);
    }

    let salt = data.split_off(config.key_len() as usize);
    Ok(HashSalt::new(data, salt))
}
