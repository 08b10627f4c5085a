//! Digest provider and algorithm labels.
//!
//! [`SignatureAlgorithm`] is the closed set of algorithm labels that appear in
//! output records. Each label resolves to a [`DigestAlgorithm`] and a
//! [`SignatureScheme`]; strings are only ever parsed at the boundary via
//! [`FromStr`] or [`hash`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use super::signer::SignatureScheme;
use crate::lds::constants::{SHA1_OID, SHA256_OID};
use crate::{Error, Result};

/// Hash function used for data group digests, the content digest and signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Digest size in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
        }
    }

    /// DER content octets of the algorithm OID.
    pub const fn oid(self) -> &'static [u8] {
        match self {
            DigestAlgorithm::Sha1 => SHA1_OID,
            DigestAlgorithm::Sha256 => SHA256_OID,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
        }
    }

    /// Identify the algorithm that produces digests of `len` bytes.
    pub fn from_output_len(len: usize) -> Option<Self> {
        match len {
            20 => Some(DigestAlgorithm::Sha1),
            32 => Some(DigestAlgorithm::Sha256),
            _ => None,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature algorithm label carried by an output record.
///
/// The serialized form is the label used by document verifiers, e.g.
/// `"sha256WithRSAEncryption"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "sha256WithRSAEncryption")]
    Sha256WithRsaEncryption,
    #[serde(rename = "sha1WithRSAEncryption")]
    Sha1WithRsaEncryption,
    #[serde(rename = "ecdsa-with-SHA256")]
    EcdsaWithSha256,
}

impl SignatureAlgorithm {
    /// Every supported algorithm, in the order fixtures are generated.
    pub const ALL: [SignatureAlgorithm; 3] = [
        SignatureAlgorithm::Sha256WithRsaEncryption,
        SignatureAlgorithm::Sha1WithRsaEncryption,
        SignatureAlgorithm::EcdsaWithSha256,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha256WithRsaEncryption => "sha256WithRSAEncryption",
            SignatureAlgorithm::Sha1WithRsaEncryption => "sha1WithRSAEncryption",
            SignatureAlgorithm::EcdsaWithSha256 => "ecdsa-with-SHA256",
        }
    }

    pub const fn digest_algorithm(self) -> DigestAlgorithm {
        match self {
            SignatureAlgorithm::Sha256WithRsaEncryption => DigestAlgorithm::Sha256,
            SignatureAlgorithm::Sha1WithRsaEncryption => DigestAlgorithm::Sha1,
            SignatureAlgorithm::EcdsaWithSha256 => DigestAlgorithm::Sha256,
        }
    }

    pub const fn scheme(self) -> SignatureScheme {
        match self {
            SignatureAlgorithm::Sha256WithRsaEncryption => {
                SignatureScheme::RsaPkcs1(DigestAlgorithm::Sha256)
            }
            SignatureAlgorithm::Sha1WithRsaEncryption => {
                SignatureScheme::RsaPkcs1(DigestAlgorithm::Sha1)
            }
            SignatureAlgorithm::EcdsaWithSha256 => {
                SignatureScheme::EcdsaSecp256k1(DigestAlgorithm::Sha256)
            }
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SignatureAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.label() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Hash `input` with the digest behind a signature algorithm label.
///
/// ```
/// let digest = sodgen::hash("sha1WithRSAEncryption", b"abc").unwrap();
/// assert_eq!(digest.len(), 20);
/// ```
pub fn hash(algorithm_name: &str, input: &[u8]) -> Result<Vec<u8>> {
    let algorithm: SignatureAlgorithm = algorithm_name.parse()?;
    Ok(algorithm.digest_algorithm().digest(input))
}
