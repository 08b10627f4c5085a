//! Error types for security object generation.
//!
//! This module defines the [`enum@Error`] enum covering every failure in the
//! generation pipeline. All of them are precondition violations the caller can
//! correct; none of them leave a partially built record behind.
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use thiserror::Error;

/// Error type for sodgen operations.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses this error type.
///
/// # Examples
///
/// ```
/// use sodgen::{Error, SignatureAlgorithm};
///
/// match "md5WithRSAEncryption".parse::<SignatureAlgorithm>() {
///     Err(Error::UnknownAlgorithm(name)) => assert_eq!(name, "md5WithRSAEncryption"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// A digest does not have the length of the active hash algorithm.
    ///
    /// Raised when a record hash table mixes digest sizes, or when a table is
    /// composed into a record whose signature algorithm hashes to another size.
    #[error("Digest length mismatch: expected {expected} bytes, got {actual}")]
    DigestLengthMismatch { expected: usize, actual: usize },

    /// A data group number occurs more than once in a record hash table.
    ///
    /// Data group 1 is reserved for the MRZ digest.
    #[error("Duplicate data group index: {0}")]
    DuplicateIndex(u8),

    /// Data group numbers start at 1.
    #[error("Invalid data group index: {0}")]
    InvalidIndex(u8),

    /// Content digest requested with a different algorithm than the table was built with.
    #[error("Algorithm mismatch: table uses {table}, requested {requested}")]
    AlgorithmMismatch {
        table: &'static str,
        requested: &'static str,
    },

    /// Signing time is not a `YYMMDDHHMMSSZ` UTCTime string.
    #[error("Invalid UTCTime {0:?}: expected YYMMDDHHMMSSZ")]
    InvalidTimestampFormat(String),

    /// The digest / key combination is outside the supported scheme set.
    #[error("Unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    /// The underlying RSA or ECDSA primitive refused to sign.
    #[error("Signing failed: {0}")]
    SigningFailure(String),

    /// Signature algorithm label is not one of the supported names.
    #[error("Unknown signature algorithm: {0}")]
    UnknownAlgorithm(String),

    /// MRZ string is empty or contains characters outside the MRZ alphabet.
    #[error("Invalid MRZ: {0}")]
    InvalidMrz(String),

    /// Malformed DER while decoding signed attributes.
    #[error("Malformed DER: {0}")]
    Der(String),

    /// Key material could not be loaded or does not fit the requested scheme.
    #[error("Invalid key: {0}")]
    Key(String),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
