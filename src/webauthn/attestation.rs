//! The "none"-format attestation object returned at registration:
//! `{"fmt": "none", "attStmt": {}, "authData": <bytes>}`. No attestation
//! statement is produced beyond the credential public key embedded in the
//! authenticator data.

use ciborium::value::Value;

use super::authenticator_data::{AttestedCredentialData, AuthenticatorData};
use super::flags::AuthenticatorFlags;
use super::BuildError;
use crate::cbor;
use crate::config;
use crate::record::PasskeyRecord;

fn registration_flags() -> AuthenticatorFlags {
    AuthenticatorFlags::USER_PRESENT
        | AuthenticatorFlags::USER_VERIFIED
        | AuthenticatorFlags::BACKUP_ELIGIBLE
        | AuthenticatorFlags::BACKUP_STATE
}

/// Build the CBOR attestation object for `record`. The public key is derived
/// from the record's private key on every call; the counter is always 0 and
/// the AAGUID all-zero.
pub fn build(record: &PasskeyRecord) -> Result<Vec<u8>, BuildError> {
    let credential_id = record.credential_id_bytes()?;
    let public_key = record.private_key()?.public_key();
    let cose_key = public_key.cose_key()?;

    let auth_data = AuthenticatorData::new(
        &record.relying_party,
        registration_flags(),
        0,
        Some(AttestedCredentialData {
            aaguid: config::AAGUID,
            credential_id,
            public_key: cose_key.encode(),
        }),
        None,
    );
    tracing::debug!(
        rp = %record.relying_party,
        alg = ?public_key.algorithm(),
        "attestation object built"
    );
    encode_object(&auth_data.encode())
}

fn encode_object(auth_data: &[u8]) -> Result<Vec<u8>, BuildError> {
    let map = Value::Map(vec![
        (Value::Text("fmt".into()), Value::Text("none".into())),
        (Value::Text("attStmt".into()), Value::Map(vec![])),
        (Value::Text("authData".into()), Value::Bytes(auth_data.to_vec())),
    ]);
    let mut buf = Vec::new();
    ciborium::into_writer(&map, &mut buf).map_err(|e| BuildError::Cbor(e.to_string()))?;
    Ok(buf)
}

/// A decoded attestation object. `att_stmt` is dropped after the shape check
/// since this format never carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationObject {
    pub format: String,
    pub auth_data: AuthenticatorData,
}

impl AttestationObject {
    pub fn decode(bytes: &[u8]) -> Result<Self, BuildError> {
        let value: Value =
            ciborium::from_reader(bytes).map_err(|e| BuildError::Cbor(e.to_string()))?;
        let map = cbor::as_map(&value).ok_or(BuildError::MissingField("fmt"))?;

        let format = cbor::get_text(map, "fmt")
            .and_then(cbor::as_text)
            .ok_or(BuildError::MissingField("fmt"))?
            .to_string();
        cbor::get_text(map, "attStmt")
            .and_then(cbor::as_map)
            .ok_or(BuildError::MissingField("attStmt"))?;
        let auth_data_bytes = cbor::get_text(map, "authData")
            .and_then(cbor::as_bytes)
            .ok_or(BuildError::MissingField("authData"))?;

        let auth_data = AuthenticatorData::decode(auth_data_bytes)?;
        Ok(Self { format, auth_data })
    }

    /// The embedded COSE public key, when the authenticator data carries an
    /// attested-credential block.
    pub fn public_key(&self) -> Option<&[u8]> {
        self.auth_data
            .attested
            .as_ref()
            .map(|attested| attested.public_key.as_slice())
    }
}
