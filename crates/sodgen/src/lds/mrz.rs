//! MRZ canonicalization into its DG1 byte layout.
//!
//! DG1 wraps the MRZ text in two DER-style headers:
//!
//! ```text
//! 61 L1            DG1 application tag, length of the rest
//!    5F 1F L2      MRZ data element, length of the MRZ text
//!       <MRZ ASCII>
//! ```
//!
//! Check digits are not validated; only the character set is.

use super::constants::{DG1_TAG, MRZ_INFO_TAG};
use super::der::{encode_length, encode_tlv};
use crate::crypto::DigestAlgorithm;
use crate::{Error, Result};

/// Canonical DG1 bytes for a raw MRZ string.
///
/// # Errors
///
/// Returns [`Error::InvalidMrz`] for an empty MRZ or one containing characters
/// outside `A-Z`, `0-9` and `<`.
pub fn canonicalize(raw: &str) -> Result<Vec<u8>> {
    validate(raw)?;

    let mut mrz_element = Vec::with_capacity(raw.len() + 5);
    mrz_element.extend_from_slice(&MRZ_INFO_TAG);
    encode_length(&mut mrz_element, raw.len());
    mrz_element.extend_from_slice(raw.as_bytes());

    Ok(encode_tlv(&[DG1_TAG], &mrz_element))
}

/// Digest of the canonical DG1 bytes, the value stored as data group 1.
pub fn mrz_digest(raw: &str, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
    Ok(algorithm.digest(&canonicalize(raw)?))
}

fn validate(raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(Error::InvalidMrz("empty MRZ".into()));
    }
    if let Some((pos, c)) = raw
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<'))
    {
        return Err(Error::InvalidMrz(format!(
            "character {:?} at position {} is not in the MRZ alphabet",
            c, pos
        )));
    }
    Ok(())
}
