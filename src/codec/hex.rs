//! Lowercase hex, used for byte fixtures and diagnostics.

use super::CodecError;

pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ::hex::encode(bytes)
}

/// Odd-length input and non-hex characters fail with distinct causes.
pub fn decode(s: &str) -> Result<Vec<u8>, CodecError> {
    Ok(::hex::decode(s)?)
}
