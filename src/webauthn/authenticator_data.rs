//! The fixed binary authenticator-data structure:
//!
//! `rpIdHash[32] || flags[1] || counter[4,BE]
//!  || (AT: aaguid[16] || credIdLen[2,BE] || credId || COSE_Key)
//!  || (ED: extensions...)`
//!
//! Relying parties re-derive and verify these bytes independently, so decode
//! must be the exact inverse of encode.

use sha2::{Digest, Sha256};

use super::flags::AuthenticatorFlags;
use crate::cose::CoseKey;

#[derive(Debug, thiserror::Error)]
pub enum AuthDataError {
    #[error("insufficient data")]
    InsufficientData,
    #[error("data present without a flag claiming it")]
    FlagMismatch,
    #[error("trailing bytes after authenticator data")]
    TrailingBytes,
}

/// The block appended at registration time, carrying the new credential and
/// its COSE-encoded public key. The key has no length prefix; the CBOR map is
/// self-delimiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedCredentialData {
    pub aaguid: [u8; 16],
    pub credential_id: Vec<u8>,
    /// COSE_Key bytes, validated on decode.
    pub public_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorData {
    /// SHA-256 of the relying-party identifier. Decoding cannot reverse this
    /// to a string, so the hash is all a decoded value ever carries.
    pub rp_id_hash: [u8; 32],
    pub flags: AuthenticatorFlags,
    /// Signature counter. This crate emits 0 everywhere: the signer is
    /// stateless and counter persistence belongs to the storage layer.
    pub counter: u32,
    pub attested: Option<AttestedCredentialData>,
    pub extensions: Option<Vec<u8>>,
}

impl AuthenticatorData {
    /// Hash `rp_id` and assemble the structure. The AT and ED bits are
    /// derived from `attested`/`extensions` presence; whatever the caller put
    /// in `flags` for those two bits is overwritten.
    pub fn new(
        rp_id: &str,
        flags: AuthenticatorFlags,
        counter: u32,
        attested: Option<AttestedCredentialData>,
        extensions: Option<Vec<u8>>,
    ) -> Self {
        let rp_id_hash: [u8; 32] = Sha256::digest(rp_id.as_bytes()).into();
        let mut flags = flags;
        flags.set(AuthenticatorFlags::ATTESTED_DATA, attested.is_some());
        flags.set(AuthenticatorFlags::EXTENSION_DATA, extensions.is_some());
        Self {
            rp_id_hash,
            flags,
            counter,
            attested,
            extensions,
        }
    }

    /// Exactly 37 bytes unless an attested or extensions block is present.
    pub fn encode(&self) -> Vec<u8> {
        let mut flags = self.flags;
        flags.set(AuthenticatorFlags::ATTESTED_DATA, self.attested.is_some());
        flags.set(AuthenticatorFlags::EXTENSION_DATA, self.extensions.is_some());

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.rp_id_hash);
        data.push(flags.bits());
        data.extend_from_slice(&self.counter.to_be_bytes());
        if let Some(attested) = &self.attested {
            data.extend_from_slice(&attested.aaguid);
            data.extend_from_slice(&(attested.credential_id.len() as u16).to_be_bytes());
            data.extend_from_slice(&attested.credential_id);
            data.extend_from_slice(&attested.public_key);
        }
        if let Some(extensions) = &self.extensions {
            data.extend_from_slice(extensions);
        }
        data
    }

    /// Inverse of [`encode`](Self::encode). Every truncation fails closed
    /// with [`AuthDataError::InsufficientData`]; bytes no flag claims are
    /// rejected rather than skipped.
    pub fn decode(bytes: &[u8]) -> Result<Self, AuthDataError> {
        if bytes.len() < 37 {
            return Err(AuthDataError::InsufficientData);
        }
        let rp_id_hash: [u8; 32] = bytes[..32].try_into().unwrap();
        let flags = AuthenticatorFlags::from_bits(bytes[32]);
        let counter = u32::from_be_bytes(bytes[33..37].try_into().unwrap());
        let mut offset = 37usize;

        let attested = if flags.contains(AuthenticatorFlags::ATTESTED_DATA) {
            if bytes.len() < offset + 16 {
                return Err(AuthDataError::InsufficientData);
            }
            let aaguid: [u8; 16] = bytes[offset..offset + 16].try_into().unwrap();
            offset += 16;

            if bytes.len() < offset + 2 {
                return Err(AuthDataError::InsufficientData);
            }
            let cred_id_len =
                u16::from_be_bytes(bytes[offset..offset + 2].try_into().unwrap()) as usize;
            offset += 2;

            if bytes.len() < offset + cred_id_len {
                return Err(AuthDataError::InsufficientData);
            }
            let credential_id = bytes[offset..offset + cred_id_len].to_vec();
            offset += cred_id_len;

            // The COSE key carries no length prefix; probe the CBOR item to
            // find where it ends, since extension bytes may follow.
            let (_, consumed) = CoseKey::parse(&bytes[offset..])
                .map_err(|_| AuthDataError::InsufficientData)?;
            let public_key = bytes[offset..offset + consumed].to_vec();
            offset += consumed;

            Some(AttestedCredentialData {
                aaguid,
                credential_id,
                public_key,
            })
        } else {
            None
        };

        let extensions = if flags.contains(AuthenticatorFlags::EXTENSION_DATA) {
            if offset >= bytes.len() {
                return Err(AuthDataError::InsufficientData);
            }
            let ext = bytes[offset..].to_vec();
            offset = bytes.len();
            Some(ext)
        } else {
            None
        };

        if offset != bytes.len() {
            // Remaining bytes that neither AT nor ED accounts for.
            if attested.is_none() && extensions.is_none() {
                return Err(AuthDataError::FlagMismatch);
            }
            return Err(AuthDataError::TrailingBytes);
        }

        Ok(Self {
            rp_id_hash,
            flags,
            counter,
            attested,
            extensions,
        })
    }
}
