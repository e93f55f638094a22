use argon2::{Algorithm, Argon2, MIN_SALT_LEN, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{
    DEFAULT_KEY_LEN, DEFAULT_MAX_MEMORY_KIB, DEFAULT_MAX_THREADS, DEFAULT_MAX_TIME,
    DEFAULT_MEMORY_KIB, DEFAULT_SALT_LEN, DEFAULT_THREADS, DEFAULT_TIME,
};
use crate::error::HashError;

/// Argon2id tuning parameters plus the key and salt lengths.
///
/// The same values must be used to verify a hash as were used to create it;
/// the bare encoding does not record them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    time: u32,
    memory: u32,
    threads: u8,
    key_len: u32,
    salt_len: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME,
            memory: DEFAULT_MEMORY_KIB, // 64 MiB
            threads: DEFAULT_THREADS,
            key_len: DEFAULT_KEY_LEN,
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl HasherConfig {
    /// Stores the parameters as given. Use [`HasherConfig::validate`] to check
    /// them against Argon2id's limits ahead of time.
    pub fn new(time: u32, salt_len: u32, memory: u32, threads: u8, key_len: u32) -> Self {
        Self {
            time,
            memory,
            threads,
            key_len,
            salt_len,
        }
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    /// Memory cost in KiB.
    pub fn memory(&self) -> u32 {
        self.memory
    }

    pub fn threads(&self) -> u8 {
        self.threads
    }

    pub fn key_len(&self) -> u32 {
        self.key_len
    }

    pub fn salt_len(&self) -> u32 {
        self.salt_len
    }

    /// Length of a decoded bare artifact, `key_len + salt_len`.
    pub fn encoded_len(&self) -> usize {
        self.key_len as usize + self.salt_len as usize
    }

    pub fn validate(&self) -> Result<(), HashError> {
        self.params()?;
        if (self.salt_len as usize) < MIN_SALT_LEN {
            return Err(HashError::Derive(argon2::Error::SaltTooShort));
        }
        Ok(())
    }

    /// Returns an error if any cost exceeds the matching ceiling in `limits`.
    pub fn check_limits(&self, limits: &CostLimits) -> Result<(), HashError> {
        if self.time > limits.max_time
            || self.memory > limits.max_memory
            || self.threads > limits.max_threads
        {
            return Err(HashError::CostTooHigh);
        }
        Ok(())
    }

    fn params(&self) -> Result<Params, HashError> {
        Ok(Params::new(
            self.memory,
            self.time,
            u32::from(self.threads),
            Some(self.key_len as usize),
        )?)
    }
}

/// Upper bounds on the Argon2id costs accepted from a self-describing
/// envelope, whose parameters come from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostLimits {
    max_time: u32,
    max_memory: u32,
    max_threads: u8,
}

impl Default for CostLimits {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_MAX_TIME,
            max_memory: DEFAULT_MAX_MEMORY_KIB, // 1 GiB
            max_threads: DEFAULT_MAX_THREADS,
        }
    }
}

impl CostLimits {
    pub fn new(max_time: u32, max_memory: u32, max_threads: u8) -> Self {
        Self {
            max_time,
            max_memory,
            max_threads,
        }
    }

    /// Limits equal to the costs of `config`.
    pub fn from_config(config: &HasherConfig) -> Self {
        Self::new(config.time, config.memory, config.threads)
    }

    pub fn max_time(&self) -> u32 {
        self.max_time
    }

    /// Memory ceiling in KiB.
    pub fn max_memory(&self) -> u32 {
        self.max_memory
    }

    pub fn max_threads(&self) -> u8 {
        self.max_threads
    }
}

/// Derive `key_len` bytes from the password and salt with Argon2id v1.3.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    config: &HasherConfig,
) -> Result<Zeroizing<Vec<u8>>, HashError> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, config.params()?);

    let mut key = Zeroizing::new(vec![0u8; config.key_len as usize]);
    argon2.hash_password_into(password.as_bytes(), salt, &mut key)?;

    Ok(key)
}
