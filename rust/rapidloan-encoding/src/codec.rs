//! Unpadded base64url encoding and decoding.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::RapidLoanEncodingError;

/// Encode bytes as unpadded base64url text.
///
/// Uses the URL-safe alphabet (`-` and `_` in place of `+` and `/`) and
/// strips padding. Empty input yields an empty string.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text back into bytes.
///
/// Trailing `=` padding is tolerated and ignored, so text produced by padded
/// encoders (and text copied out of browser devtools) decodes the same as
/// the unpadded form. For all byte sequences `B`, `decode(encode(B)) == B`.
///
/// # Errors
///
/// Fails when the input contains out-of-alphabet symbols or has a length no
/// base64 encoding could produce.
pub fn decode(text: impl AsRef<str>) -> Result<Vec<u8>, RapidLoanEncodingError> {
    Ok(URL_SAFE_NO_PAD.decode(text.as_ref().trim_end_matches('='))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_round_trips_all_lengths_up_to_64() {
        for length in 0..=64usize {
            let bytes: Vec<u8> = (0..length).map(|_| rand::random()).collect();
            let text = encode(&bytes);
            assert_eq!(decode(&text).unwrap(), bytes, "length {length}");
        }
    }

    #[test]
    fn it_encodes_empty_input_as_empty_text() {
        assert_eq!(encode([]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn it_uses_the_url_safe_alphabet_without_padding() {
        // 0xfb 0xff encodes to sextets 62, 63, 60: both substituted symbols.
        assert_eq!(encode([0xfb, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn it_matches_a_known_credential_id_vector() {
        assert_eq!(encode([1, 2, 3, 4]), "AQIDBA");
        assert_eq!(decode("AQIDBA").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn it_tolerates_padded_input() {
        assert_eq!(decode("AQIDBA==").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn it_rejects_out_of_alphabet_symbols() {
        assert!(decode("AQ+D").is_err());
        assert!(decode("A Q").is_err());
    }
}
