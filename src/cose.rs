//! COSE_Key encoding of credential public keys.
//!
//! Relying parties may compare these maps byte-for-byte, so the key order is
//! pinned: {1: kty, 3: alg, -1: crv, -2: x, -3: y}. `ciborium` writes map
//! entries in insertion order, which keeps the layout stable.

use ciborium::value::Value;

use crate::cbor;
use crate::config;

const KTY_EC2: i64 = 2;
const KTY_OKP: i64 = 1;
const CRV_P256: i64 = 1;
const CRV_ED25519: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoseAlgorithm {
    /// ECDSA over P-256 with SHA-256 (COSE -7).
    Es256,
    /// EdDSA over Ed25519 (COSE -8).
    EdDsa,
}

impl CoseAlgorithm {
    pub const fn id(self) -> i64 {
        match self {
            Self::Es256 => -7,
            Self::EdDsa => -8,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            -7 => Some(Self::Es256),
            -8 => Some(Self::EdDsa),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoseError {
    #[error("public key is {actual} bytes, expected {expected}")]
    InvalidKeySize { expected: usize, actual: usize },
    #[error("cbor: {0}")]
    Cbor(String),
    #[error("COSE key is not a map")]
    NotAMap,
    #[error("COSE key field {0} missing or mistyped")]
    MissingField(&'static str),
    #[error("unsupported key type {0}")]
    UnsupportedKeyType(i64),
    #[error("unsupported algorithm {0}")]
    UnsupportedAlgorithm(i64),
    #[error("unsupported curve {0}")]
    UnsupportedCurve(i64),
}

/// A credential public key in its COSE representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoseKey {
    P256 { x: [u8; 32], y: [u8; 32] },
    Ed25519 { key: [u8; 32] },
}

impl CoseKey {
    /// `raw` is the uncompressed point without the 0x04 tag: x ‖ y.
    pub fn from_raw_p256(raw: &[u8]) -> Result<Self, CoseError> {
        if raw.len() != config::P256_PUBLIC_KEY_LEN {
            return Err(CoseError::InvalidKeySize {
                expected: config::P256_PUBLIC_KEY_LEN,
                actual: raw.len(),
            });
        }
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&raw[..32]);
        y.copy_from_slice(&raw[32..]);
        Ok(Self::P256 { x, y })
    }

    pub fn from_raw_ed25519(raw: &[u8]) -> Result<Self, CoseError> {
        if raw.len() != config::ED25519_PUBLIC_KEY_LEN {
            return Err(CoseError::InvalidKeySize {
                expected: config::ED25519_PUBLIC_KEY_LEN,
                actual: raw.len(),
            });
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(raw);
        Ok(Self::Ed25519 { key })
    }

    pub fn algorithm(&self) -> CoseAlgorithm {
        match self {
            Self::P256 { .. } => CoseAlgorithm::Es256,
            Self::Ed25519 { .. } => CoseAlgorithm::EdDsa,
        }
    }

    /// Raw key bytes as the signature layer consumes them: 64-byte x ‖ y for
    /// P-256, 32 bytes for Ed25519.
    pub fn raw_public_key(&self) -> Vec<u8> {
        match self {
            Self::P256 { x, y } => {
                let mut raw = Vec::with_capacity(64);
                raw.extend_from_slice(x);
                raw.extend_from_slice(y);
                raw
            }
            Self::Ed25519 { key } => key.to_vec(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let map = match self {
            Self::P256 { x, y } => Value::Map(vec![
                (Value::Integer(1i64.into()), Value::Integer(KTY_EC2.into())),
                (
                    Value::Integer(3i64.into()),
                    Value::Integer(CoseAlgorithm::Es256.id().into()),
                ),
                (Value::Integer((-1i64).into()), Value::Integer(CRV_P256.into())),
                (Value::Integer((-2i64).into()), Value::Bytes(x.to_vec())),
                (Value::Integer((-3i64).into()), Value::Bytes(y.to_vec())),
            ]),
            Self::Ed25519 { key } => Value::Map(vec![
                (Value::Integer(1i64.into()), Value::Integer(KTY_OKP.into())),
                (
                    Value::Integer(3i64.into()),
                    Value::Integer(CoseAlgorithm::EdDsa.id().into()),
                ),
                (
                    Value::Integer((-1i64).into()),
                    Value::Integer(CRV_ED25519.into()),
                ),
                (Value::Integer((-2i64).into()), Value::Bytes(key.to_vec())),
            ]),
        };
        let mut buf = Vec::new();
        ciborium::into_writer(&map, &mut buf).expect("COSE key encoding is infallible");
        buf
    }

    /// Decode one CBOR item from the front of `bytes` and return it together
    /// with the number of bytes it occupied. The consumed length is what lets
    /// authenticator-data decoding find the end of an embedded key when
    /// extension bytes follow it.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize), CoseError> {
        let mut cursor = std::io::Cursor::new(bytes);
        let value: Value =
            ciborium::from_reader(&mut cursor).map_err(|e| CoseError::Cbor(e.to_string()))?;
        let consumed = cursor.position() as usize;

        let map = cbor::as_map(&value).ok_or(CoseError::NotAMap)?;
        let kty = cbor::get_int(map, 1)
            .and_then(cbor::as_int)
            .ok_or(CoseError::MissingField("kty"))?;
        let alg = cbor::get_int(map, 3)
            .and_then(cbor::as_int)
            .ok_or(CoseError::MissingField("alg"))?;
        let crv = cbor::get_int(map, -1)
            .and_then(cbor::as_int)
            .ok_or(CoseError::MissingField("crv"))?;

        let key = match kty {
            KTY_EC2 => {
                if CoseAlgorithm::from_id(alg) != Some(CoseAlgorithm::Es256) {
                    return Err(CoseError::UnsupportedAlgorithm(alg));
                }
                if crv != CRV_P256 {
                    return Err(CoseError::UnsupportedCurve(crv));
                }
                let x = cbor::get_int(map, -2)
                    .and_then(cbor::as_bytes)
                    .ok_or(CoseError::MissingField("x"))?;
                let y = cbor::get_int(map, -3)
                    .and_then(cbor::as_bytes)
                    .ok_or(CoseError::MissingField("y"))?;
                let mut raw = Vec::with_capacity(64);
                raw.extend_from_slice(x);
                raw.extend_from_slice(y);
                Self::from_raw_p256(&raw)?
            }
            KTY_OKP => {
                if CoseAlgorithm::from_id(alg) != Some(CoseAlgorithm::EdDsa) {
                    return Err(CoseError::UnsupportedAlgorithm(alg));
                }
                if crv != CRV_ED25519 {
                    return Err(CoseError::UnsupportedCurve(crv));
                }
                let key = cbor::get_int(map, -2)
                    .and_then(cbor::as_bytes)
                    .ok_or(CoseError::MissingField("x"))?;
                Self::from_raw_ed25519(key)?
            }
            other => return Err(CoseError::UnsupportedKeyType(other)),
        };
        Ok((key, consumed))
    }
}
