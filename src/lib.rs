//! Argon2id password hashing with a compact base58 encoding.
//!
//! A [`Hasher`] derives a key from a password and a fresh random salt, packs
//! `key || salt` into one base58 string for storage, and later verifies a
//! password against that string in constant time.
//!
//! ```no_run
//! use password2h::Hasher;
//!
//! let hasher = Hasher::default();
//! let hash = hasher.hash_password("supersecret")?;
//! let stored = hasher.wrap_password(&hash);
//!
//! assert!(hasher.compare_hash_and_password(&stored, "supersecret"));
//! assert!(!hasher.compare_hash_and_password(&stored, "wrongpassword"));
//! # Ok::<(), password2h::HashError>(())
//! ```

mod config;
mod crypto;
mod error;
mod format;

pub use crate::config::ConfigFile;
pub use crate::crypto::{CostLimits, HasherConfig, constant_time_eq};
pub use crate::error::HashError;
pub use crate::format::HashSalt;

use zeroize::Zeroizing;

/// Hashes and verifies passwords with a fixed set of Argon2id parameters.
///
/// A hasher holds no mutable state and can be shared freely between threads.
/// Every derivation allocates the configured memory cost, so callers on a
/// request path should bound how many run at once.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    config: HasherConfig,
}

impl Hasher {
    /// Builds a hasher from explicit parameters. Nothing is validated here;
    /// Argon2id rejects unusable values when a key is derived.
    pub fn new(time: u32, salt_len: u32, memory: u32, threads: u8, key_len: u32) -> Self {
        Self::with_config(HasherConfig::new(time, salt_len, memory, threads, key_len))
    }

    /// Builds a hasher from an existing set of parameters.
    pub fn with_config(config: HasherConfig) -> Self {
        Self { config }
    }

    /// Returns the parameters this hasher derives keys with.
    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Derives a key from `password` and a new random salt.
    ///
    /// # Errors
    ///
    /// Fails if the OS random generator is unavailable or Argon2id rejects
    /// the configured parameters.
    pub fn hash_password(&self, password: &str) -> Result<HashSalt, HashError> {
        let salt = crypto::generate_salt(self.config.salt_len() as usize)?;
        let key = self.generate_hash(password, &salt)?;

        tracing::debug!(
            key_len = key.len(),
            salt_len = salt.len(),
            "password hashed"
        );
        Ok(HashSalt::new(key.to_vec(), salt))
    }

    /// Encodes the key followed by the salt as base58.
    pub fn wrap_password(&self, data: &HashSalt) -> String {
        format::wrap(data)
    }

    /// Decodes a string produced by [`Hasher::wrap_password`].
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Decode`] for text outside the base58 alphabet and
    /// [`HashError::Format`] unless the decoded length is exactly
    /// `key_len + salt_len`.
    pub fn unwrap_password(&self, encoded: &str) -> Result<HashSalt, HashError> {
        format::unwrap(encoded, &self.config)
    }

    /// Returns true if `password` matches the stored hash.
    ///
    /// Malformed input and a wrong password both yield `false`.
    pub fn compare_hash_and_password(&self, encoded: &str, password: &str) -> bool {
        match self.unwrap_password(encoded) {
            Ok(data) => self.verify(&data, password),
            Err(e) => {
                tracing::debug!(error = %e, "rejecting malformed password hash");
                false
            }
        }
    }

    /// Encodes the key and salt in the self-describing envelope, recording
    /// this hasher's parameters alongside them.
    pub fn seal_password(&self, data: &HashSalt) -> String {
        format::seal(data, &self.config)
    }

    fn verify(&self, data: &HashSalt, password: &str) -> bool {
        let key = match self.generate_hash(password, data.salt()) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!(error = %e, "could not derive key for verification");
                return false;
            }
        };

        let matched = constant_time_eq(&key, data.key());
        tracing::trace!(matched, "password compared");
        matched
    }

    fn generate_hash(&self, password: &str, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, HashError> {
        crypto::derive_key(password, salt, &self.config)
    }
}

/// Decodes a self-describing envelope into its parameters and key/salt pair.
///
/// # Errors
///
/// Fails if the text is not base58, the header is malformed or of an unknown
/// version, the payload length disagrees with the recorded lengths, or the
/// recorded costs exceed `limits` ([`HashError::CostTooHigh`]).
pub fn open_sealed(
    encoded: &str,
    limits: &CostLimits,
) -> Result<(HasherConfig, HashSalt), HashError> {
    format::open(encoded, limits)
}

/// Verifies `password` against an envelope produced by
/// [`Hasher::seal_password`], using the parameters recorded inside it.
///
/// Envelopes whose costs exceed `limits` are rejected before any memory is
/// allocated for derivation.
pub fn compare_sealed_hash_and_password(
    encoded: &str,
    password: &str,
    limits: &CostLimits,
) -> bool {
    match format::open(encoded, limits) {
        Ok((config, data)) => Hasher::with_config(config).verify(&data, password),
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed password envelope");
            false
        }
    }
}
