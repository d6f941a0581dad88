//! Entry name helpers.

use encoding_rs::SHIFT_JIS;

/// Decode a NUL-terminated CP932 name.
///
/// Bytes after the first NUL are ignored. Names that are not valid
/// Shift_JIS fall back to lossy UTF-8.
pub fn decode_cp932_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let bytes = &bytes[..end];

    let (decoded, _, had_errors) = SHIFT_JIS.decode(bytes);
    if !had_errors {
        return decoded.into_owned();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Encode a name to CP932 without a terminator.
pub fn encode_cp932_name(name: &str) -> Vec<u8> {
    let (encoded, _, _) = SHIFT_JIS.encode(name);
    encoded.into_owned()
}
