//! # Pack Errors

use thiserror::Error;

/// Errors from building or reading a submission pack.
#[derive(Error, Debug)]
pub enum PackError {
    /// A caller-supplied document digest is not 64 lowercase hex characters.
    #[error("document {filename}: invalid precomputed sha256: {reason}")]
    InvalidDigest {
        /// The document's original file name.
        filename: String,
        /// Why the digest was rejected.
        reason: String,
    },

    /// The archive has no `manifest.json` entry.
    #[error("archive has no manifest entry")]
    MissingManifest,

    /// Manifest serialization or parsing failed.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The archive could not be written or read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while streaming entry bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_digest_display() {
        let err = PackError::InvalidDigest {
            filename: "cert.pdf".to_string(),
            reason: "too short".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("cert.pdf"));
        assert!(msg.contains("too short"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err = PackError::from(io_err);
        assert!(format!("{err}").contains("truncated"));
    }
}
