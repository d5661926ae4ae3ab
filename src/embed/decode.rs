use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Engine used when the strict decode fails: accepts missing or extra
/// padding and non-zero trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64url token (padding optional) into UTF-8 text.
///
/// Absent or empty tokens yield an empty string without attempting a decode.
/// Invalid UTF-8 is replaced with U+FFFD and malformed base64 degrades to a
/// best-effort decode, so this never fails.
pub fn decode_text(token: Option<&str>) -> String {
    match token {
        Some(t) if !t.is_empty() => {
            let bytes = decode_base64_lenient(t);
            String::from_utf8_lossy(&bytes).into_owned()
        }
        _ => String::new(),
    }
}

/// Decode base64 in either alphabet, with or without padding.
///
/// Used for both embed tokens and upload payloads.
pub fn decode_base64_lenient(input: &str) -> Vec<u8> {
    let normalized = normalize(input);
    decode_or_else(&normalized, best_effort)
}

/// Strict standard-alphabet decode, falling back to `fallback` on error.
pub fn decode_or_else<F>(input: &str, fallback: F) -> Vec<u8>
where
    F: FnOnce(&str) -> Vec<u8>,
{
    STANDARD
        .decode(input)
        .unwrap_or_else(|_| fallback(input))
}

/// Percent-decode a URL parameter, keeping the input as-is when the decoded
/// bytes are not valid UTF-8.
pub fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Map the URL-safe alphabet onto the standard one and right-pad with `=`
/// to a multiple of four.
fn normalize(input: &str) -> String {
    let mut out: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while out.len() % 4 != 0 {
        out.push('=');
    }
    out
}

/// Keep only alphabet characters and decode as much as forms whole bytes.
fn best_effort(input: &str) -> Vec<u8> {
    let mut cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+' || *c == '/')
        .collect();
    // A single leftover sextet cannot encode a byte.
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    LENIENT.decode(&cleaned).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "base64 input undecodable, using empty payload");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn encode_url(s: &str) -> String {
        URL_SAFE_NO_PAD.encode(s.as_bytes())
    }

    #[test]
    fn absent_token_is_empty() {
        assert_eq!(decode_text(None), "");
    }

    #[test]
    fn empty_token_is_empty() {
        assert_eq!(decode_text(Some("")), "");
    }

    #[test]
    fn decodes_unpadded_token() {
        assert_eq!(decode_text(Some("VGVzdA")), "Test");
    }

    #[test]
    fn decodes_padded_token() {
        assert_eq!(decode_text(Some("VGVzdA==")), "Test");
    }

    #[test]
    fn decodes_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8" in base64url
        assert_eq!(decode_base64_lenient("-_8"), vec![0xfb, 0xff]);
        assert_eq!(decode_base64_lenient("+/8="), vec![0xfb, 0xff]);
    }

    #[test]
    fn round_trips_non_ascii_text() {
        for s in ["héllo wörld", "日本語のテキスト", "party 🎉🦀", "a'b\"c<d>&e"] {
            assert_eq!(decode_text(Some(&encode_url(s))), s);
        }
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        // 0xff alone is not valid UTF-8
        assert_eq!(decode_text(Some("_w")), "\u{fffd}");
    }

    #[test]
    fn malformed_base64_does_not_panic() {
        assert_eq!(decode_text(Some("V")), "");
        assert_eq!(decode_text(Some("VGVz!!dA")), "Test");
        assert_eq!(decode_text(Some("@@@@")), "");
    }

    #[test]
    fn whitespace_in_payload_is_ignored() {
        assert_eq!(decode_base64_lenient("aGVs\nbG8="), b"hello");
    }

    #[test]
    fn percent_decodes_urls() {
        assert_eq!(
            percent_decode("https%3A%2F%2Fexample.com%2Fa%20b.png"),
            "https://example.com/a b.png"
        );
        assert_eq!(percent_decode("plain"), "plain");
    }

    #[test]
    fn percent_decode_keeps_invalid_utf8_input() {
        assert_eq!(percent_decode("%ff%fe"), "%ff%fe");
    }

    #[test]
    fn fallback_runs_only_on_error() {
        let strict = decode_or_else("aGk=", |_| b"fallback".to_vec());
        assert_eq!(strict, b"hi");
        let fell_back = decode_or_else("!!", |_| b"fallback".to_vec());
        assert_eq!(fell_back, b"fallback");
    }
}
