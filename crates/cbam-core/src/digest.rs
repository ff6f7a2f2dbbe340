//! # Content Digests
//!
//! SHA-256 digests over raw bytes, rendered as 64 lowercase hex characters.
//! Document hashes, manifest hashes and whole-archive hashes in submission
//! packs all use this form.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CbamError;

/// A SHA-256 digest.
///
/// Serializes as its lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Wrap a raw 32-byte digest.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character lowercase hex string.
    ///
    /// Uppercase hex is rejected so that a digest has exactly one textual form.
    pub fn from_hex(s: &str) -> Result<Self, CbamError> {
        if s.len() != 64 {
            return Err(CbamError::InvalidDigest(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, pair) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_value(pair[0]);
            let lo = hex_value(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes[i] = (hi << 4) | lo,
                _ => {
                    return Err(CbamError::InvalidDigest(format!(
                        "non-lowercase-hex character in {s:?}"
                    )))
                }
            }
        }
        Ok(Self(bytes))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = CbamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<ContentDigest> for String {
    fn from(value: ContentDigest) -> Self {
        value.to_hex()
    }
}

/// Compute the SHA-256 digest of a byte slice.
pub fn sha256_bytes(data: impl AsRef<[u8]>) -> ContentDigest {
    let hash = Sha256::digest(data.as_ref());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

/// Compute the SHA-256 digest of a byte slice as lowercase hex.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    sha256_bytes(data).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn hex_is_64_lowercase_chars() {
        let hex = sha256_hex("manifest");
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn from_hex_round_trips() {
        let d = sha256_bytes(b"doc");
        assert_eq!(ContentDigest::from_hex(&d.to_hex()).unwrap(), d);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("abc").is_err());
        assert!(ContentDigest::from_hex(&"G".repeat(64)).is_err());
        let upper = sha256_hex(b"x").to_uppercase();
        assert!(ContentDigest::from_hex(&upper).is_err());
    }

    #[test]
    fn different_inputs_different_digests() {
        assert_ne!(sha256_bytes(b"a"), sha256_bytes(b"b"));
    }
}
