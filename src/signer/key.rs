use ed25519_dalek::{Signer as _, Verifier as _};
use p256::ecdsa::signature::Signer as _;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rand::rngs::OsRng;

use super::SignerError;
use crate::codec::pem::{self, ED25519_PRIVATE_KEY};
use crate::config;
use crate::cose::{CoseAlgorithm, CoseError, CoseKey};

/// A credential signing key with its algorithm resolved.
#[derive(Clone, Debug)]
pub enum PrivateKey {
    P256(p256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    /// Parse a PKCS#8 PEM private key, trying ES256 first and falling back to
    /// Ed25519. The fallback is the one place a parse failure is expected
    /// rather than an error.
    pub fn from_pem(pem: &str) -> Result<Self, SignerError> {
        if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_pem(pem) {
            return Ok(Self::P256(key));
        }
        tracing::debug!("PEM is not an ES256 key, trying Ed25519");
        match pem::decode_pkcs8(pem, &ED25519_PRIVATE_KEY) {
            Ok(raw) => {
                let seed: [u8; 32] = raw
                    .as_slice()
                    .try_into()
                    .expect("decode_pkcs8 checks the raw key length");
                Ok(Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)))
            }
            Err(_) => Err(SignerError::UnsupportedKeyFormat),
        }
    }

    pub fn generate(algorithm: CoseAlgorithm) -> Self {
        match algorithm {
            CoseAlgorithm::Es256 => Self::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            CoseAlgorithm::EdDsa => Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng)),
        }
    }

    pub fn algorithm(&self) -> CoseAlgorithm {
        match self {
            Self::P256(_) => CoseAlgorithm::Es256,
            Self::Ed25519(_) => CoseAlgorithm::EdDsa,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::P256(key) => PublicKey::P256(*key.verifying_key()),
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
        }
    }

    /// DER-encoded ECDSA signature for ES256, raw 64 bytes for Ed25519.
    pub fn sign(&self, challenge: &[u8]) -> Result<Vec<u8>, SignerError> {
        match self {
            Self::P256(key) => {
                let signature: p256::ecdsa::Signature = key
                    .try_sign(challenge)
                    .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            Self::Ed25519(key) => {
                let signature = key
                    .try_sign(challenge)
                    .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    pub fn to_pem(&self) -> Result<String, SignerError> {
        match self {
            Self::P256(key) => key
                .to_pkcs8_pem(LineEnding::LF)
                .map(|pem| pem.to_string())
                .map_err(|e| SignerError::PemEncoding(e.to_string())),
            Self::Ed25519(key) => Ok(pem::encode_pkcs8(&key.to_bytes(), &ED25519_PRIVATE_KEY)),
        }
    }
}

/// The verification half, always re-derived from [`PrivateKey`] or rebuilt
/// from raw bytes; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
    P256(p256::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Rebuild from raw key bytes: 64-byte x ‖ y for ES256 (no SEC1 tag),
    /// 32 bytes for Ed25519.
    pub fn from_raw(algorithm: CoseAlgorithm, raw: &[u8]) -> Result<Self, SignerError> {
        match algorithm {
            CoseAlgorithm::Es256 => {
                if raw.len() != config::P256_PUBLIC_KEY_LEN {
                    return Err(SignerError::InvalidKeySize {
                        expected: config::P256_PUBLIC_KEY_LEN,
                        actual: raw.len(),
                    });
                }
                let point = p256::EncodedPoint::from_affine_coordinates(
                    p256::FieldBytes::from_slice(&raw[..32]),
                    p256::FieldBytes::from_slice(&raw[32..]),
                    false,
                );
                p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .map(Self::P256)
                    .map_err(|e| SignerError::InvalidPublicKey(e.to_string()))
            }
            CoseAlgorithm::EdDsa => {
                if raw.len() != config::ED25519_PUBLIC_KEY_LEN {
                    return Err(SignerError::InvalidKeySize {
                        expected: config::ED25519_PUBLIC_KEY_LEN,
                        actual: raw.len(),
                    });
                }
                let bytes: [u8; 32] = raw.try_into().expect("length checked above");
                ed25519_dalek::VerifyingKey::from_bytes(&bytes)
                    .map(Self::Ed25519)
                    .map_err(|e| SignerError::InvalidPublicKey(e.to_string()))
            }
        }
    }

    pub fn from_cose(key: &CoseKey) -> Result<Self, SignerError> {
        Self::from_raw(key.algorithm(), &key.raw_public_key())
    }

    pub fn algorithm(&self) -> CoseAlgorithm {
        match self {
            Self::P256(_) => CoseAlgorithm::Es256,
            Self::Ed25519(_) => CoseAlgorithm::EdDsa,
        }
    }

    /// Raw key bytes: uncompressed x ‖ y without the 0x04 tag for ES256,
    /// the 32-byte point encoding for Ed25519.
    pub fn raw(&self) -> Vec<u8> {
        match self {
            Self::P256(key) => key.to_encoded_point(false).as_bytes()[1..].to_vec(),
            Self::Ed25519(key) => key.to_bytes().to_vec(),
        }
    }

    pub fn cose_key(&self) -> Result<CoseKey, CoseError> {
        match self {
            Self::P256(_) => CoseKey::from_raw_p256(&self.raw()),
            Self::Ed25519(_) => CoseKey::from_raw_ed25519(&self.raw()),
        }
    }

    /// `true` iff `signature` is a valid signature over `data`. Malformed
    /// signature bytes (including bad ECDSA DER) are `false`, not an error,
    /// so callers get one uniform answer to "is this signature valid".
    pub fn verify(&self, signature: &[u8], data: &[u8]) -> bool {
        match self {
            Self::P256(key) => match p256::ecdsa::Signature::from_der(signature) {
                Ok(sig) => p256::ecdsa::signature::Verifier::verify(key, data, &sig).is_ok(),
                Err(_) => false,
            },
            Self::Ed25519(key) => match ed25519_dalek::Signature::from_slice(signature) {
                Ok(sig) => key.verify(data, &sig).is_ok(),
                Err(_) => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- PEM parse dispatch ---

    #[test]
    fn test_from_pem_es256() {
        let pem = PrivateKey::generate(CoseAlgorithm::Es256).to_pem().unwrap();
        let key = PrivateKey::from_pem(&pem).unwrap();
        assert_eq!(key.algorithm(), CoseAlgorithm::Es256);
    }

    #[test]
    fn test_from_pem_ed25519() {
        let pem = PrivateKey::generate(CoseAlgorithm::EdDsa).to_pem().unwrap();
        let key = PrivateKey::from_pem(&pem).unwrap();
        assert_eq!(key.algorithm(), CoseAlgorithm::EdDsa);
    }

    #[test]
    fn test_from_pem_rejects_garbage() {
        let err = PrivateKey::from_pem("not a pem at all").unwrap_err();
        assert!(matches!(err, SignerError::UnsupportedKeyFormat));
    }

    #[test]
    fn test_pem_roundtrip_preserves_key() {
        for alg in [CoseAlgorithm::Es256, CoseAlgorithm::EdDsa] {
            let key = PrivateKey::generate(alg);
            let reparsed = PrivateKey::from_pem(&key.to_pem().unwrap()).unwrap();
            assert_eq!(
                key.public_key().raw(),
                reparsed.public_key().raw(),
                "{alg:?} PEM round trip must preserve the keypair"
            );
        }
    }

    // --- sign / verify ---

    #[test]
    fn test_es256_sign_verify() {
        let key = PrivateKey::generate(CoseAlgorithm::Es256);
        let challenge = b"registration challenge";
        let signature = key.sign(challenge).unwrap();
        // DER SEQUENCE tag
        assert_eq!(signature[0], 0x30);
        assert!(key.public_key().verify(&signature, challenge));
    }

    #[test]
    fn test_es256_tampered_challenge_fails() {
        let key = PrivateKey::generate(CoseAlgorithm::Es256);
        let mut challenge = b"authn challenge".to_vec();
        let signature = key.sign(&challenge).unwrap();
        challenge[0] ^= 0x01;
        assert!(!key.public_key().verify(&signature, &challenge));
    }

    #[test]
    fn test_ed25519_sign_verify() {
        let key = PrivateKey::generate(CoseAlgorithm::EdDsa);
        let challenge = b"registration challenge";
        let signature = key.sign(challenge).unwrap();
        assert_eq!(signature.len(), 64, "Ed25519 signatures are raw 64 bytes");
        assert!(key.public_key().verify(&signature, challenge));
    }

    #[test]
    fn test_ed25519_tampered_challenge_fails() {
        let key = PrivateKey::generate(CoseAlgorithm::EdDsa);
        let mut challenge = b"authn challenge".to_vec();
        let signature = key.sign(&challenge).unwrap();
        challenge[0] ^= 0x01;
        assert!(!key.public_key().verify(&signature, &challenge));
    }

    #[test]
    fn test_malformed_der_verifies_false_not_error() {
        let key = PrivateKey::generate(CoseAlgorithm::Es256);
        assert!(!key.public_key().verify(&[0xFF, 0x00, 0x13], b"data"));
        assert!(!key.public_key().verify(&[], b"data"));
    }

    #[test]
    fn test_sign_entry_point_dispatches() {
        for alg in [CoseAlgorithm::Es256, CoseAlgorithm::EdDsa] {
            let key = PrivateKey::generate(alg);
            let pem = key.to_pem().unwrap();
            let signature = super::super::sign(b"challenge", &pem).unwrap();
            assert!(key.public_key().verify(&signature, b"challenge"));
        }
    }

    // --- raw public keys ---

    #[test]
    fn test_raw_sizes() {
        assert_eq!(
            PrivateKey::generate(CoseAlgorithm::Es256).public_key().raw().len(),
            64
        );
        assert_eq!(
            PrivateKey::generate(CoseAlgorithm::EdDsa).public_key().raw().len(),
            32
        );
    }

    #[test]
    fn test_from_raw_roundtrip() {
        for alg in [CoseAlgorithm::Es256, CoseAlgorithm::EdDsa] {
            let public = PrivateKey::generate(alg).public_key();
            let rebuilt = PublicKey::from_raw(alg, &public.raw()).unwrap();
            assert_eq!(rebuilt, public);
        }
    }

    #[test]
    fn test_from_raw_wrong_size() {
        let err = PublicKey::from_raw(CoseAlgorithm::Es256, &[0u8; 65]).unwrap_err();
        assert!(matches!(
            err,
            SignerError::InvalidKeySize { expected: 64, actual: 65 }
        ));
        let err = PublicKey::from_raw(CoseAlgorithm::EdDsa, &[0u8; 64]).unwrap_err();
        assert!(matches!(
            err,
            SignerError::InvalidKeySize { expected: 32, actual: 64 }
        ));
    }

    #[test]
    fn test_from_raw_off_curve_point_rejected() {
        // x = y = 1 is not on P-256.
        let mut raw = [0u8; 64];
        raw[31] = 1;
        raw[63] = 1;
        let err = PublicKey::from_raw(CoseAlgorithm::Es256, &raw).unwrap_err();
        assert!(matches!(err, SignerError::InvalidPublicKey(_)));
    }

    #[test]
    fn test_verify_entry_point() {
        let key = PrivateKey::generate(CoseAlgorithm::EdDsa);
        let signature = key.sign(b"data").unwrap();
        let ok = super::super::verify(
            CoseAlgorithm::EdDsa,
            &key.public_key().raw(),
            &signature,
            b"data",
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_cose_key_roundtrip_through_signer() {
        for alg in [CoseAlgorithm::Es256, CoseAlgorithm::EdDsa] {
            let public = PrivateKey::generate(alg).public_key();
            let cose = public.cose_key().unwrap();
            assert_eq!(PublicKey::from_cose(&cose).unwrap(), public);
        }
    }
}
