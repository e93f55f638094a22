use std::fmt;

/// Errors produced while hashing passwords or decoding stored hashes.
#[derive(Debug)]
pub enum HashError {
    /// The encoded text is not valid base58.
    Decode(bs58::decode::Error),
    /// The decoded bytes cannot hold a key and salt of the configured lengths.
    Format,
    /// The envelope does not start with the expected magic bytes.
    BadMagic,
    /// The envelope version is not known to this build.
    UnsupportedVersion(u8),
    /// The envelope asks for more time, memory or parallelism than allowed.
    CostTooHigh,
    /// The OS random generator could not produce a salt.
    Random,
    /// Argon2id rejected the parameters or inputs.
    Derive(argon2::Error),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::Decode(e) => write!(f, "invalid base58 data: {e}"),
            HashError::Format => write!(f, "invalid encoded data"),
            HashError::BadMagic => write!(f, "invalid password envelope"),
            HashError::UnsupportedVersion(v) => {
                write!(f, "unsupported password envelope version: {v}")
            }
            HashError::CostTooHigh => write!(f, "password envelope costs exceed limits"),
            HashError::Random => write!(f, "OS random generator unavailable"),
            HashError::Derive(e) => write!(f, "argon2 key derivation failed: {e}"),
        }
    }
}

impl std::error::Error for HashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HashError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bs58::decode::Error> for HashError {
    fn from(e: bs58::decode::Error) -> Self {
        HashError::Decode(e)
    }
}

impl From<argon2::Error> for HashError {
    fn from(e: argon2::Error) -> Self {
        HashError::Derive(e)
    }
}
