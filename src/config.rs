/// All-zero AAGUID: no authenticator model is disclosed to relying parties.
pub const AAGUID: [u8; 16] = [0u8; 16];

pub const CREDENTIAL_ID_LEN: usize = 32;
pub const RP_ID_HASH_LEN: usize = 32;
pub const P256_PUBLIC_KEY_LEN: usize = 64;
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;
