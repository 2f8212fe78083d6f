//! The persisted credential record. Binary fields are stored in their
//! external text forms (base64url for identifiers, PEM for the key), so the
//! struct serializes 1:1 to the JSON shape the storage collaborator expects.

use rand::rngs::OsRng;
use rand::RngCore as _;
use serde::{Deserialize, Serialize};

use crate::codec::base64url;
use crate::config;
use crate::cose::CoseAlgorithm;
use crate::signer::{PrivateKey, PublicKey, SignerError};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("credential id is not valid base64url")]
    MissingCredentialId,
    #[error("user handle is not valid base64url")]
    MissingUserHandle,
    #[error("secure random source unavailable")]
    RandomnessUnavailable,
    #[error("no mutually supported algorithm")]
    UnsupportedAlgorithm,
    #[error("signer: {0}")]
    Signer(#[from] SignerError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// One passkey. `credential_id` and `user_handle` are immutable once issued;
/// `username` is a display label the owning application may rewrite. The
/// public key is always re-derived from `private_key`, never stored, so the
/// two can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasskeyRecord {
    /// 32 random bytes, base64url.
    #[serde(rename = "credentialID")]
    pub credential_id: String,
    /// Relying-party domain, e.g. "example.com".
    #[serde(rename = "relyingParty")]
    pub relying_party: String,
    pub username: String,
    /// Opaque per-RP user identifier, base64url.
    #[serde(rename = "userHandle")]
    pub user_handle: String,
    /// PKCS#8 PEM; ES256 or Ed25519.
    #[serde(rename = "privateKey")]
    pub private_key: String,
}

/// What a credential-provider host hands over when the platform asks for a
/// new passkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub relying_party: String,
    pub username: String,
    pub user_handle: Vec<u8>,
    pub supported_algorithms: Vec<CoseAlgorithm>,
}

impl PasskeyRecord {
    /// Create a credential: keypair and credential ID are generated together,
    /// so a record either exists completely or not at all.
    pub fn new(
        relying_party: &str,
        username: &str,
        user_handle: &[u8],
        algorithm: CoseAlgorithm,
    ) -> Result<Self, RecordError> {
        let private_key = PrivateKey::generate(algorithm);

        let mut credential_id = [0u8; config::CREDENTIAL_ID_LEN];
        OsRng
            .try_fill_bytes(&mut credential_id)
            .map_err(|_| RecordError::RandomnessUnavailable)?;

        tracing::debug!(rp = %relying_party, alg = ?algorithm, "passkey record created");
        Ok(Self {
            credential_id: base64url::encode(credential_id),
            relying_party: relying_party.to_string(),
            username: username.to_string(),
            user_handle: base64url::encode(user_handle),
            private_key: private_key.to_pem()?,
        })
    }

    /// Registration entry point: pick the first of ES256 then EdDSA the
    /// caller supports.
    pub fn register(request: &RegistrationRequest) -> Result<Self, RecordError> {
        let algorithm = [CoseAlgorithm::Es256, CoseAlgorithm::EdDsa]
            .into_iter()
            .find(|alg| request.supported_algorithms.contains(alg))
            .ok_or(RecordError::UnsupportedAlgorithm)?;
        Self::new(
            &request.relying_party,
            &request.username,
            &request.user_handle,
            algorithm,
        )
    }

    pub fn credential_id_bytes(&self) -> Result<Vec<u8>, RecordError> {
        base64url::decode(&self.credential_id).map_err(|_| RecordError::MissingCredentialId)
    }

    pub fn user_handle_bytes(&self) -> Result<Vec<u8>, RecordError> {
        base64url::decode(&self.user_handle).map_err(|_| RecordError::MissingUserHandle)
    }

    pub fn private_key(&self) -> Result<PrivateKey, SignerError> {
        PrivateKey::from_pem(&self.private_key)
    }

    pub fn public_key(&self) -> Result<PublicKey, SignerError> {
        Ok(self.private_key()?.public_key())
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}
