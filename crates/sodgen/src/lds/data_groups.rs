//! Data group hash table and its LDSSecurityObject serialization.
//!
//! The table holds one digest per data group, with the MRZ digest (DG1) always
//! in front. Its serialized form is the DER `LDSSecurityObject`:
//!
//! ```text
//! SEQUENCE {
//!   INTEGER 0                                   -- version
//!   SEQUENCE { OBJECT IDENTIFIER hashAlgorithm }
//!   SEQUENCE OF SEQUENCE { INTEGER dgNumber, OCTET STRING dgHash }
//! }
//! ```
//!
//! The content digest signed through the signed attributes is the hash of
//! exactly these bytes.

use std::collections::HashSet;

use tracing::debug;

use super::constants::{LDS_SECURITY_OBJECT_VERSION, MRZ_DATA_GROUP};
use super::der::{
    encode_octet_string, encode_oid, encode_sequence, encode_unsigned_integer,
};
use crate::crypto::DigestAlgorithm;
use crate::{Error, Result};

/// Digest of a single data group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataGroupHash {
    /// Data group number (1 is the MRZ).
    pub number: u8,
    pub digest: Vec<u8>,
}

impl DataGroupHash {
    pub fn new(number: u8, digest: impl Into<Vec<u8>>) -> Self {
        Self {
            number,
            digest: digest.into(),
        }
    }

    fn encode(&self) -> Vec<u8> {
        encode_sequence(&[
            &encode_unsigned_integer(self.number as u64),
            &encode_octet_string(&self.digest),
        ])
    }
}

/// Ordered data group hashes with DG1 first.
///
/// Built fresh on every call from a borrowed base list; the base list is never
/// modified, so the same sample data can feed any number of builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataGroupHashTable {
    algorithm: DigestAlgorithm,
    entries: Vec<DataGroupHash>,
}

impl DataGroupHashTable {
    /// Prepend the MRZ digest as DG1 to `base`.
    ///
    /// The digest algorithm is identified from the digest length shared by all
    /// entries.
    ///
    /// # Errors
    ///
    /// - [`Error::DigestLengthMismatch`] if any digest differs in length from the rest
    /// - [`Error::DuplicateIndex`] if `base` contains DG1 or repeats a number
    /// - [`Error::InvalidIndex`] if `base` contains number 0
    /// - [`Error::UnknownAlgorithm`] if the shared length is not a SHA-1/SHA-256 size
    pub fn build(mrz_digest: &[u8], base: &[DataGroupHash]) -> Result<Self> {
        let expected = majority_len(mrz_digest.len(), base);

        if mrz_digest.len() != expected {
            return Err(Error::DigestLengthMismatch {
                expected,
                actual: mrz_digest.len(),
            });
        }

        let mut seen = HashSet::from([MRZ_DATA_GROUP]);
        for entry in base {
            if entry.digest.len() != expected {
                return Err(Error::DigestLengthMismatch {
                    expected,
                    actual: entry.digest.len(),
                });
            }
            if entry.number == 0 {
                return Err(Error::InvalidIndex(0));
            }
            if !seen.insert(entry.number) {
                return Err(Error::DuplicateIndex(entry.number));
            }
        }

        let algorithm = DigestAlgorithm::from_output_len(expected)
            .ok_or_else(|| Error::UnknownAlgorithm(format!("{}-byte digest", expected)))?;

        let mut entries = Vec::with_capacity(base.len() + 1);
        entries.push(DataGroupHash::new(MRZ_DATA_GROUP, mrz_digest));
        entries.extend(base.iter().cloned());

        debug!(%algorithm, data_groups = entries.len(), "built data group hash table");
        Ok(Self { algorithm, entries })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn digest_len(&self) -> usize {
        self.algorithm.output_len()
    }

    pub fn entries(&self) -> &[DataGroupHash] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a DER LDSSecurityObject, entries in table order.
    pub fn serialize(&self) -> Vec<u8> {
        let version = encode_unsigned_integer(LDS_SECURITY_OBJECT_VERSION);
        let algorithm = encode_sequence(&[&encode_oid(self.algorithm.oid())]);

        let encoded: Vec<Vec<u8>> = self.entries.iter().map(DataGroupHash::encode).collect();
        let parts: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
        let hash_values = encode_sequence(&parts);

        encode_sequence(&[&version, &algorithm, &hash_values])
    }

    /// Hash of [`serialize`](Self::serialize) under `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlgorithmMismatch`] if `algorithm` is not the one the
    /// data group digests were made with.
    pub fn content_digest(&self, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
        if algorithm != self.algorithm {
            return Err(Error::AlgorithmMismatch {
                table: self.algorithm.name(),
                requested: algorithm.name(),
            });
        }
        Ok(content_digest(&self.serialize(), algorithm))
    }
}

/// Digest of serialized data group hashes.
pub fn content_digest(serialized: &[u8], algorithm: DigestAlgorithm) -> Vec<u8> {
    algorithm.digest(serialized)
}

/// Most common digest length; ties go to the MRZ digest.
fn majority_len(mrz_len: usize, base: &[DataGroupHash]) -> usize {
    let mut counts: Vec<(usize, usize)> = vec![(mrz_len, 1)];
    for entry in base {
        match counts.iter_mut().find(|(len, _)| *len == entry.digest.len()) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.digest.len(), 1)),
        }
    }
    // max_by_key keeps the last maximum, so scan in reverse to favour the MRZ.
    counts
        .iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(len, _)| *len)
        .unwrap_or(mrz_len)
}
