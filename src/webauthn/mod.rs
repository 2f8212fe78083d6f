pub mod assertion;
pub mod attestation;
pub mod authenticator_data;
pub mod flags;

pub use assertion::Assertion;
pub use attestation::AttestationObject;
pub use authenticator_data::{AttestedCredentialData, AuthDataError, AuthenticatorData};
pub use flags::AuthenticatorFlags;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("record: {0}")]
    Record(#[from] crate::record::RecordError),
    #[error("signer: {0}")]
    Signer(#[from] crate::signer::SignerError),
    #[error("COSE: {0}")]
    Cose(#[from] crate::cose::CoseError),
    #[error("authenticator data: {0}")]
    AuthData(#[from] AuthDataError),
    #[error("cbor: {0}")]
    Cbor(String),
    #[error("attestation object field {0} missing or mistyped")]
    MissingField(&'static str),
}
