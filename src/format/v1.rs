//! Self-describing password envelope, version 1.
//!
//! Decoded layout:
//! ```text
//! MAGIC (3) | VERSION (1) | TIME (4) | MEMORY (4) | THREADS (1) | KEY_LEN (4) | SALT_LEN (4) | KEY | SALT
//! ```
//! Integers are little-endian. The whole byte string is base58-encoded.

use zeroize::Zeroize;

use super::HashSalt;
use crate::crypto::{CostLimits, HasherConfig};
use crate::error::HashError;

/// Magic bytes identifying an envelope ("P2H").
pub const MAGIC: &[u8; MAGIC_LEN] = b"P2H";
/// Current envelope version.
pub const VERSION_V1: u8 = 1;

const MAGIC_LEN: usize = 3;
const VER_LEN: usize = 1;
const TIME_LEN: usize = 4;
const MEM_LEN: usize = 4;
const THREADS_LEN: usize = 1;
const KEY_LEN_LEN: usize = 4;
const SALT_LEN_LEN: usize = 4;

pub const HEADER_LEN: usize =
    MAGIC_LEN + VER_LEN + TIME_LEN + MEM_LEN + THREADS_LEN + KEY_LEN_LEN + SALT_LEN_LEN;

/// Encode key and salt together with the parameters that produced them.
pub fn seal(data: &HashSalt, config: &HasherConfig) -> String {
    let mut buf = Vec::with_capacity(HEADER_LEN + data.key().len() + data.salt().len());

    buf.extend_from_slice(MAGIC);
    buf.push(VERSION_V1);

    buf.extend_from_slice(&config.time().to_le_bytes());
    buf.extend_from_slice(&config.memory().to_le_bytes());
    buf.push(config.threads());
    buf.extend_from_slice(&(data.key().len() as u32).to_le_bytes());
    buf.extend_from_slice(&(data.salt().len() as u32).to_le_bytes());

    buf.extend_from_slice(data.key());
    buf.extend_from_slice(data.salt());

    let encoded = bs58::encode(&buf).into_string();
    buf.zeroize();
    encoded
}

/// Decode an envelope into its parameters and key/salt pair.
///
/// # Errors
///
/// Returns an error if the text is not base58, the header is too short or
/// malformed, the version is unknown, the payload length disagrees with
/// the recorded key and salt lengths, or the recorded costs exceed `limits`
/// or are unusable by Argon2id.
pub fn open(encoded: &str, limits: &CostLimits) -> Result<(HasherConfig, HashSalt), HashError> {
    let mut data = bs58::decode(encoded).into_vec()?;
    let parsed = parse(&data);
    data.zeroize();

    let (config, hash) = parsed?;
    config.check_limits(limits)?;
    config.validate()?;
    Ok((config, hash))
}

fn parse(data: &[u8]) -> Result<(HasherConfig, HashSalt), HashError> {
    if data.len() < HEADER_LEN {
        return Err(HashError::Format);
    }

    if &data[..MAGIC_LEN] != MAGIC {
        return Err(HashError::BadMagic);
    }

    let version = data[MAGIC_LEN];
    if version != VERSION_V1 {
        return Err(HashError::UnsupportedVersion(version));
    }

    let mut offset = MAGIC_LEN + VER_LEN;

    let time = read_u32(data, offset)?;
    offset += TIME_LEN;

    let memory = read_u32(data, offset)?;
    offset += MEM_LEN;

    let threads = data[offset];
    offset += THREADS_LEN;

    let key_len = read_u32(data, offset)?;
    offset += KEY_LEN_LEN;

    let salt_len = read_u32(data, offset)?;
    offset += SALT_LEN_LEN;

    let config = HasherConfig::new(time, salt_len, memory, threads, key_len);
    let payload = &data[offset..];
    if payload.len() != config.encoded_len() {
        return Err(HashError::Format);
    }

    let (key, salt) = payload.split_at(key_len as usize);
    Ok((config, HashSalt::new(key.to_vec(), salt.to_vec())))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, HashError> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or(HashError::Format)?;
    Ok(u32::from_le_bytes(bytes))
}
