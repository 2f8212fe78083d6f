//! base64url text form used for credential IDs and user handles.

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use super::CodecError;

// Accepts both padded and unpadded input; external sources disagree on
// whether trailing '=' survives transport.
const URL_SAFE_FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode without padding, URL-safe alphabet.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn decode(s: &str) -> Result<Vec<u8>, CodecError> {
    Ok(URL_SAFE_FORGIVING.decode(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_lengths() {
        // Every tail length (0..3 mod 4 of output) must survive a round trip.
        for len in 0..=17 {
            let bytes: Vec<u8> = (0..len as u8).collect();
            let encoded = encode(&bytes);
            assert!(!encoded.contains('='), "encode must not pad");
            assert_eq!(decode(&encoded).unwrap(), bytes, "len {len}");
        }
    }

    #[test]
    fn test_roundtrip_empty() {
        assert_eq!(encode([0u8; 0]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_url_safe_alphabet() {
        // 0xfb 0xff maps to "-" and "_" where standard base64 would use + and /.
        let encoded = encode([0xfb, 0xef, 0xff]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert_eq!(decode(&encoded).unwrap(), vec![0xfb, 0xef, 0xff]);
    }

    #[test]
    fn test_decode_accepts_padded_input() {
        // "AQI=" is the padded form of [1, 2].
        assert_eq!(decode("AQI=").unwrap(), vec![1, 2]);
        assert_eq!(decode("AQI").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        assert!(decode("a+b/").is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("not base64url!").unwrap_err();
        assert!(matches!(err, CodecError::Base64(_)));
    }
}
