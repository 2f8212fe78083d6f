//! Passkey credential core: issues WebAuthn credentials and proves ownership
//! of them. Produces the attestation object handed back at registration and
//! the signed assertion handed back at authentication; everything here is a
//! pure function over immutable inputs.

pub mod codec;
pub mod config;
pub mod cose;
pub mod error;
pub mod record;
pub mod signer;
pub mod webauthn;

pub(crate) mod cbor;

pub use error::Error;
pub use record::{PasskeyRecord, RegistrationRequest};
pub use webauthn::{Assertion, AttestationObject, AuthenticatorData, AuthenticatorFlags};
