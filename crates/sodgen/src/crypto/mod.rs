pub mod digest;
pub mod keys;
pub mod signer;

pub use digest::{hash, DigestAlgorithm, SignatureAlgorithm};
pub use keys::SigningKey;
pub use signer::{verify, EcPoint, PublicKey, Signature, SignatureEngine, SignatureScheme, Signed};
