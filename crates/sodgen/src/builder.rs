//! Fixture builder API
//!
//! Provides a builder pattern interface over the full generation pipeline:
//! MRZ → data group hash table → content digest → signed attributes →
//! signature → record.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::crypto::{SignatureAlgorithm, SignatureEngine, SignatureScheme, SigningKey};
use crate::lds::{mrz, DataGroupHash, DataGroupHashTable, SignedAttributes, UtcTime};
use crate::record::PassportRecord;
use crate::samples::{self, PHOTO_PLACEHOLDER, SAMPLE_MRZ, SAMPLE_SIGNING_TIME};
use crate::Result;

/// Mock passport security object generator with builder pattern API.
///
/// Every [`generate`](Self::generate) call works on its own copy of the data
/// group list, so one builder can produce any number of records, also from
/// several threads at once.
///
/// # Example
///
/// ```no_run
/// use sodgen::{FixtureBuilder, SignatureAlgorithm};
///
/// let record = FixtureBuilder::new()
///     .signing_time("191216172238Z")
///     .seed(42)
///     .generate(SignatureAlgorithm::Sha256WithRsaEncryption)?;
/// assert!(record.verify()?);
/// # Ok::<(), sodgen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    mrz: String,
    data_group_hashes: Option<Vec<DataGroupHash>>,
    signing_time: String,
    photo: String,
    content_type_attribute: bool,
    engine: SignatureEngine,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureBuilder {
    /// Create a builder preloaded with the sample MRZ, signing time and photo.
    pub fn new() -> Self {
        Self {
            mrz: SAMPLE_MRZ.to_string(),
            data_group_hashes: None,
            signing_time: SAMPLE_SIGNING_TIME.to_string(),
            photo: PHOTO_PLACEHOLDER.to_string(),
            content_type_attribute: false,
            engine: SignatureEngine::new(),
        }
    }

    pub fn mrz(mut self, mrz: impl Into<String>) -> Self {
        self.mrz = mrz.into();
        self
    }

    /// Set the data group digests, DG1 excluded.
    ///
    /// Without this, the built-in samples for the requested algorithm are used.
    pub fn data_group_hashes(mut self, hashes: Vec<DataGroupHash>) -> Self {
        self.data_group_hashes = Some(hashes);
        self
    }

    /// Set the signing time (`YYMMDDHHMMSSZ`).
    pub fn signing_time(mut self, time: impl Into<String>) -> Self {
        self.signing_time = time.into();
        self
    }

    pub fn photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = photo.into();
        self
    }

    /// Emit a contentType attribute ahead of the message digest.
    pub fn content_type_attribute(mut self, enabled: bool) -> Self {
        self.content_type_attribute = enabled;
        self
    }

    /// Sign with a fixed key instead of a fresh one per record.
    pub fn key(mut self, key: SigningKey) -> Self {
        self.engine = self.engine.with_key(key);
        self
    }

    /// Derive signing keys from `seed` for reproducible records.
    pub fn seed(mut self, seed: u64) -> Self {
        self.engine = self.engine.seed(seed);
        self
    }

    /// Modulus size of generated RSA keys. Default is 2048.
    pub fn rsa_bits(mut self, bits: usize) -> Self {
        self.engine = self.engine.rsa_bits(bits);
        self
    }

    /// Validate the builder configuration.
    ///
    /// Returns an error if the MRZ or signing time is malformed, or the RSA
    /// key size is outside 512-4096 bits.
    pub fn validate(&self) -> Result<()> {
        mrz::canonicalize(&self.mrz)?;
        UtcTime::parse(&self.signing_time)?;
        self.engine.validate()?;
        Ok(())
    }

    /// Run the pipeline once for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The MRZ or signing time is malformed
    /// - `algorithm` is RSA and the key size is out of bounds
    /// - The data group digests are inconsistent, or made with another digest
    ///   than `algorithm` uses
    /// - Signing fails
    pub fn generate(&self, algorithm: SignatureAlgorithm) -> Result<PassportRecord> {
        let digest_alg = algorithm.digest_algorithm();
        let signing_time = UtcTime::parse(&self.signing_time)?;
        if let SignatureScheme::RsaPkcs1(_) = algorithm.scheme() {
            self.engine.validate()?;
        }

        let mrz_digest = mrz::mrz_digest(&self.mrz, digest_alg)?;
        let base = match &self.data_group_hashes {
            Some(hashes) => hashes.clone(),
            None => samples::data_group_hashes(digest_alg),
        };
        let table = DataGroupHashTable::build(&mrz_digest, &base)?;

        let content_digest = table.content_digest(digest_alg)?;
        debug!(%algorithm, digest = %hex::encode(&content_digest), "content digest");

        let e_content = SignedAttributes::new(content_digest, signing_time)
            .with_content_type(self.content_type_attribute)
            .encode();

        let signed = self.engine.sign(&e_content, algorithm.scheme())?;
        let record =
            PassportRecord::compose(&self.mrz, algorithm, &table, e_content, signed, &self.photo)?;

        info!(%algorithm, data_groups = table.len(), "generated passport record");
        Ok(record)
    }

    /// Generate one record per algorithm, in parallel, in the given order.
    pub fn generate_all(&self, algorithms: &[SignatureAlgorithm]) -> Result<Vec<PassportRecord>> {
        self.validate()?;
        algorithms
            .par_iter()
            .map(|algorithm| self.generate(*algorithm))
            .collect()
    }
}

/// Sample record signed with a fresh 2048-bit RSA key over SHA-256.
pub fn mock_sha256_rsa() -> Result<PassportRecord> {
    FixtureBuilder::new().generate(SignatureAlgorithm::Sha256WithRsaEncryption)
}

/// Sample record signed with a fresh 2048-bit RSA key over SHA-1.
pub fn mock_sha1_rsa() -> Result<PassportRecord> {
    FixtureBuilder::new().generate(SignatureAlgorithm::Sha1WithRsaEncryption)
}

/// Sample record signed with a fresh secp256k1 key over SHA-256.
pub fn mock_ecdsa_sha256() -> Result<PassportRecord> {
    FixtureBuilder::new().generate(SignatureAlgorithm::EcdsaWithSha256)
}
