//! Error handling for encrypted persistence
//!
//! The cipher and the codec never catch or retry; everything bubbles to
//! `SaveStore`, which wraps failures into `PersistError`. Cipher failures
//! travel through `std::io::Error` so the `Read`/`Write` adapters can
//! surface them at the call that consumes the bytes.

use thiserror::Error;

/// Result type alias using PersistError
pub type Result<T> = std::result::Result<T, PersistError>;

/// Failures inside the cipher stream transform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Fewer bytes than one IV: the file is structurally malformed
    #[error("encrypted payload is truncated: expected a {expected}-byte IV, found {found} bytes")]
    TruncatedIv { expected: usize, found: usize },

    /// Authentication tag did not verify: corrupted or tampered ciphertext
    #[error("authentication tag verification failed")]
    AuthFailed,
}

impl CipherError {
    /// Wrap into an `io::Error` whose kind matches the failure class
    pub(crate) fn into_io(self) -> std::io::Error {
        let kind = match self {
            CipherError::TruncatedIv { .. } => std::io::ErrorKind::UnexpectedEof,
            CipherError::AuthFailed => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, self)
    }
}

/// Umbrella error for save/load orchestration, carrying the original cause
#[derive(Error, Debug)]
pub enum PersistError {
    /// Structurally malformed persisted bytes (e.g. a truncated IV)
    #[error("save file is malformed: {source}")]
    Format {
        #[source]
        source: CipherError,
    },

    /// Ciphertext failed authentication (corrupted or tampered file)
    #[error("save file failed authentication: {source}")]
    Crypto {
        #[source]
        source: CipherError,
    },

    /// Snapshot JSON encoding or decoding failed
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Disk or stream I/O failed
    #[error("I/O failure during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Classify an `io::Error` coming back from the cipher stream
    ///
    /// Cipher failures are recovered by downcast and mapped to their
    /// taxonomy variant; anything else is plain I/O.
    pub(crate) fn from_io(op: &'static str, err: std::io::Error) -> Self {
        match err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<CipherError>())
        {
            Some(CipherError::AuthFailed) => PersistError::Crypto {
                source: CipherError::AuthFailed,
            },
            Some(truncated @ CipherError::TruncatedIv { .. }) => PersistError::Format {
                source: truncated.clone(),
            },
            None => PersistError::Io { op, source: err },
        }
    }
}
