//! End-to-end flow: create a credential, hand the attestation object to a
//! relying party, then answer an authentication challenge and check the
//! signature the way the relying party would.

use sha2::{Digest, Sha256};

use passkey_core::cose::{CoseAlgorithm, CoseKey};
use passkey_core::signer::{self, PublicKey};
use passkey_core::webauthn::{assertion, attestation};
use passkey_core::{AttestationObject, PasskeyRecord};

fn flow(algorithm: CoseAlgorithm) {
    let user_handle: [u8; 16] = *b"0123456789abcdef";
    let record =
        PasskeyRecord::new("example.com", "alice", &user_handle, algorithm).unwrap();

    // Registration: the relying party decodes the attestation object and
    // keeps the embedded public key.
    let attestation_object = attestation::build(&record).unwrap();
    let decoded = AttestationObject::decode(&attestation_object).unwrap();
    assert_eq!(decoded.format, "none");

    let expected_hash: [u8; 32] = Sha256::digest(b"example.com").into();
    assert_eq!(decoded.auth_data.rp_id_hash, expected_hash);
    assert_eq!(decoded.auth_data.counter, 0);

    let (cose_key, _) = CoseKey::parse(decoded.public_key().unwrap()).unwrap();
    assert_eq!(cose_key.algorithm(), algorithm);
    let rp_view = PublicKey::from_cose(&cose_key).unwrap();

    // Authentication: fixed all-zero client data hash.
    let client_data_hash = [0u8; 32];
    let proof = assertion::build(&record, &client_data_hash).unwrap();
    assert_eq!(proof.user_handle, user_handle);
    assert_eq!(
        proof.credential_id,
        record.credential_id_bytes().unwrap()
    );

    let mut challenge = proof.authenticator_data.clone();
    challenge.extend_from_slice(&proof.client_data_hash);

    // The key extracted at registration verifies the assertion…
    assert!(rp_view.verify(&proof.signature, &challenge));
    // …and so does the key re-derived from the stored record.
    assert!(record
        .public_key()
        .unwrap()
        .verify(&proof.signature, &challenge));
    // The raw-bytes verify entry point agrees.
    assert!(signer::verify(
        algorithm,
        &cose_key.raw_public_key(),
        &proof.signature,
        &challenge
    )
    .unwrap());

    // A different client data hash must not verify.
    let mut wrong = proof.authenticator_data.clone();
    wrong.extend_from_slice(&[0xFFu8; 32]);
    assert!(!rp_view.verify(&proof.signature, &wrong));
}

#[test]
fn test_es256_registration_and_authentication() {
    flow(CoseAlgorithm::Es256);
}

#[test]
fn test_ed25519_registration_and_authentication() {
    flow(CoseAlgorithm::EdDsa);
}

#[test]
fn test_assertion_from_json_restored_record() {
    // Storage round trip in the middle of the flow: serialize after
    // registration, restore, then authenticate with the restored record.
    let record = PasskeyRecord::new(
        "login.example.org",
        "bob",
        b"user-42",
        CoseAlgorithm::EdDsa,
    )
    .unwrap();
    let attestation_object = attestation::build(&record).unwrap();

    let restored = PasskeyRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(restored, record);

    let client_data_hash = [0x5Au8; 32];
    let proof = assertion::build(&restored, &client_data_hash).unwrap();

    let decoded = AttestationObject::decode(&attestation_object).unwrap();
    let (cose_key, _) = CoseKey::parse(decoded.public_key().unwrap()).unwrap();
    let rp_view = PublicKey::from_cose(&cose_key).unwrap();

    let mut challenge = proof.authenticator_data.clone();
    challenge.extend_from_slice(&client_data_hash);
    assert!(rp_view.verify(&proof.signature, &challenge));
}
