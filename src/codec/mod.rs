pub mod base64url;
pub mod hex;
pub mod pem;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("hex: {0}")]
    Hex(#[from] ::hex::FromHexError),
    #[error("PEM header missing")]
    MissingPemHeader,
    #[error("PEM footer missing")]
    MissingPemFooter,
    #[error("PEM body: {0}")]
    PemBody(base64::DecodeError),
    #[error("ASN.1 prefix does not match the expected algorithm")]
    Asn1PrefixMismatch,
    #[error("raw key is {actual} bytes, expected {expected}")]
    RawKeyLength { expected: usize, actual: usize },
}
