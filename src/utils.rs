//! Utility functions for the kv-storage library

/// Maximum hex characters in one path component, well under the usual
/// 255-byte file name limit
pub const PATH_SEGMENT_LEN: usize = 128;

/// Encode a storage key as path segments that are safe on every platform
///
/// The key is hex encoded and split every [`PATH_SEGMENT_LEN`] characters.
/// All segments but the last name directories; the last names the file.
/// The empty key yields a single empty segment.
pub fn key_to_path_segments(key: &str) -> Vec<String> {
    let encoded = hex::encode(key.as_bytes());
    if encoded.is_empty() {
        return vec![String::new()];
    }
    encoded
        .as_bytes()
        .chunks(PATH_SEGMENT_LEN)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Recover a storage key from its concatenated hex segments
pub fn hex_to_key(encoded: &str) -> Option<String> {
    let bytes = hex::decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
