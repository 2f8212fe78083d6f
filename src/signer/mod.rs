//! Two-algorithm signing engine. The PEM text is the only discriminant a
//! stored credential carries, so [`PrivateKey::from_pem`] discovers the
//! algorithm once and everything downstream dispatches on the tag.

pub mod key;

pub use key::{PrivateKey, PublicKey};

use crate::cose::CoseAlgorithm;

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("key is neither an ES256 nor an Ed25519 PKCS#8 PEM")]
    UnsupportedKeyFormat,
    #[error("public key is {actual} bytes, expected {expected}")]
    InvalidKeySize { expected: usize, actual: usize },
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("PEM encoding: {0}")]
    PemEncoding(String),
}

/// Sign `challenge` with the private key carried as PEM text. ES256 yields a
/// DER-encoded ECDSA signature, Ed25519 the fixed 64-byte raw form.
pub fn sign(challenge: &[u8], private_key_pem: &str) -> Result<Vec<u8>, SignerError> {
    PrivateKey::from_pem(private_key_pem)?.sign(challenge)
}

/// Verify `signature` over `data` against a raw public key. A malformed
/// signature is `Ok(false)`; only an unusable key is an error.
pub fn verify(
    algorithm: CoseAlgorithm,
    raw_public_key: &[u8],
    signature: &[u8],
    data: &[u8],
) -> Result<bool, SignerError> {
    Ok(PublicKey::from_raw(algorithm, raw_public_key)?.verify(signature, data))
}
