#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("codec: {0}")]
    Codec(#[from] crate::codec::CodecError),
    #[error("COSE: {0}")]
    Cose(#[from] crate::cose::CoseError),
    #[error("authenticator data: {0}")]
    AuthData(#[from] crate::webauthn::AuthDataError),
    #[error("signer: {0}")]
    Signer(#[from] crate::signer::SignerError),
    #[error("record: {0}")]
    Record(#[from] crate::record::RecordError),
    #[error("{0}")]
    Build(#[from] crate::webauthn::BuildError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
