//! Cryptographic primitives behind the hasher.
//!
//! Provides Argon2id key derivation, salt generation and constant-time
//! comparison.

pub mod kdf;
pub mod random;

pub use kdf::{CostLimits, HasherConfig, derive_key};
pub use random::generate_salt;

use subtle::ConstantTimeEq;

/// Default number of passes over memory.
pub const DEFAULT_TIME: u32 = 1;
/// Default memory cost in KiB (64 MiB).
pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
/// Default degree of parallelism.
pub const DEFAULT_THREADS: u8 = 32;
/// Default length of the derived key in bytes.
pub const DEFAULT_KEY_LEN: u32 = 40;
/// Default length of the random salt in bytes.
pub const DEFAULT_SALT_LEN: u32 = 20;
/// Highest time cost accepted from an envelope by default.
pub const DEFAULT_MAX_TIME: u32 = 16;
/// Highest memory cost in KiB accepted from an envelope by default (1 GiB).
pub const DEFAULT_MAX_MEMORY_KIB: u32 = 1024 * 1024;
/// Highest parallelism accepted from an envelope by default.
pub const DEFAULT_MAX_THREADS: u8 = 64;

/// Compare two byte strings in time independent of where they differ.
///
/// Inputs of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
