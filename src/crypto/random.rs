use getrandom::fill;

use crate::error::HashError;

/// Generate `len` bytes of salt from the OS random generator.
///
/// Fails instead of returning a partially filled buffer.
pub fn generate_salt(len: usize) -> Result<Vec<u8>, HashError> {
    let mut salt = vec![0u8; len];
    fill(&mut salt).map_err(|e| {
        tracing::warn!(error = %e, "OS random generator unavailable");
        HashError::Random
    })?;
    Ok(salt)
}
