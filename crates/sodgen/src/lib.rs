//! Deterministic test vectors for ICAO 9303 document security objects.
//!
//! A generated record mimics what a passport chip signs: the data group hash
//! table (with the MRZ digest as DG1), the signed attributes wrapping its
//! digest, and an RSA or secp256k1 signature over those attributes.
//!
//! ```no_run
//! use sodgen::{FixtureBuilder, SignatureAlgorithm};
//!
//! let records = FixtureBuilder::new()
//!     .seed(7)
//!     .generate_all(&SignatureAlgorithm::ALL)?;
//! println!("{}", serde_json::to_string_pretty(&records)?);
//! # Ok::<(), sodgen::Error>(())
//! ```

pub mod builder;
pub mod crypto;
pub mod error;
pub mod lds;
pub mod record;
pub mod samples;

pub use builder::{mock_ecdsa_sha256, mock_sha1_rsa, mock_sha256_rsa, FixtureBuilder};
pub use crypto::{hash, DigestAlgorithm, SignatureAlgorithm, SignatureScheme, SigningKey};
pub use error::Error;
pub use record::PassportRecord;

pub type Result<T> = std::result::Result<T, Error>;
