//! Signature engine over the signed attributes.
//!
//! Dispatch is a closed match over [`SignatureScheme`]. RSA signs the digest with
//! PKCS#1 v1.5 padding; ECDSA signs the SHA-256 prehash on secp256k1 and returns
//! the compact `(r, s)` pair.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey as EcdsaSigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use tracing::debug;

use super::digest::{DigestAlgorithm, SignatureAlgorithm};
use super::keys::{self, SigningKey, RSA_DEFAULT_BITS, RSA_PUBLIC_EXPONENT};
use crate::{Error, Result};

/// Signature scheme: key type plus the digest applied to the signed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// RSA PKCS#1 v1.5 over SHA-256 or SHA-1.
    RsaPkcs1(DigestAlgorithm),
    /// ECDSA on secp256k1. Only SHA-256 is supported.
    EcdsaSecp256k1(DigestAlgorithm),
}

impl SignatureScheme {
    pub const fn digest_algorithm(self) -> DigestAlgorithm {
        match self {
            SignatureScheme::RsaPkcs1(alg) | SignatureScheme::EcdsaSecp256k1(alg) => alg,
        }
    }

    /// The record label for this scheme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScheme`] for ECDSA with anything but SHA-256.
    pub fn algorithm(self) -> Result<SignatureAlgorithm> {
        match self {
            SignatureScheme::RsaPkcs1(DigestAlgorithm::Sha256) => {
                Ok(SignatureAlgorithm::Sha256WithRsaEncryption)
            }
            SignatureScheme::RsaPkcs1(DigestAlgorithm::Sha1) => {
                Ok(SignatureAlgorithm::Sha1WithRsaEncryption)
            }
            SignatureScheme::EcdsaSecp256k1(DigestAlgorithm::Sha256) => {
                Ok(SignatureAlgorithm::EcdsaWithSha256)
            }
            SignatureScheme::EcdsaSecp256k1(alg) => Err(Error::UnsupportedScheme(format!(
                "ECDSA secp256k1 with {}",
                alg
            ))),
        }
    }
}

/// Public half of the signing key, in the shape verifiers consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ecdsa(EcPoint),
}

/// Affine coordinates of an uncompressed secp256k1 point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcPoint {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl EcPoint {
    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let encoded = key.to_encoded_point(false);
        // 0x04 || x || y
        let bytes = encoded.as_bytes();
        let mut point = EcPoint {
            x: [0u8; 32],
            y: [0u8; 32],
        };
        point.x.copy_from_slice(&bytes[1..33]);
        point.y.copy_from_slice(&bytes[33..65]);
        point
    }

    fn to_verifying_key(self) -> Result<VerifyingKey> {
        let mut sec1 = Vec::with_capacity(65);
        sec1.push(0x04);
        sec1.extend_from_slice(&self.x);
        sec1.extend_from_slice(&self.y);
        VerifyingKey::from_sec1_bytes(&sec1)
            .map_err(|e| Error::Key(format!("Invalid secp256k1 point: {}", e)))
    }
}

/// Raw signature output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// PKCS#1 v1.5 signature, modulus-sized.
    Rsa(Vec<u8>),
    /// Compact ECDSA signature halves.
    Ecdsa { r: [u8; 32], s: [u8; 32] },
}

/// Result of one signing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// Signs signed-attribute bytes under a [`SignatureScheme`].
///
/// Without injected keys every call generates a fresh key pair. With a seed,
/// fresh keys are derived from it instead, so repeated calls are reproducible.
///
/// # Example
///
/// ```
/// use sodgen::crypto::{verify, DigestAlgorithm, SignatureEngine, SignatureScheme};
///
/// let scheme = SignatureScheme::EcdsaSecp256k1(DigestAlgorithm::Sha256);
/// let signed = SignatureEngine::new().sign(b"payload", scheme)?;
/// assert!(verify(&signed.public_key, b"payload", &signed.signature, scheme)?);
/// # Ok::<(), sodgen::Error>(())
/// ```
#[derive(Clone)]
pub struct SignatureEngine {
    rsa_key: Option<RsaPrivateKey>,
    ecdsa_key: Option<EcdsaSigningKey>,
    seed: Option<u64>,
    rsa_bits: usize,
}

impl std::fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("rsa_key", &self.rsa_key.is_some())
            .field("ecdsa_key", &self.ecdsa_key.is_some())
            .field("seed", &self.seed.is_some())
            .field("rsa_bits", &self.rsa_bits)
            .finish()
    }
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureEngine {
    pub fn new() -> Self {
        Self {
            rsa_key: None,
            ecdsa_key: None,
            seed: None,
            rsa_bits: RSA_DEFAULT_BITS,
        }
    }

    /// Use a fixed key for the schemes of its type.
    pub fn with_key(mut self, key: SigningKey) -> Self {
        match key {
            SigningKey::Rsa(key) => self.rsa_key = Some(key),
            SigningKey::Ecdsa(key) => self.ecdsa_key = Some(key),
        }
        self
    }

    /// Derive keys that were not injected from `seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Modulus size for generated RSA keys.
    pub fn rsa_bits(mut self, bits: usize) -> Self {
        self.rsa_bits = bits;
        self
    }

    /// Check the RSA key size, injected or configured.
    ///
    /// Records signed outside these bounds would not rebuild into a verifying key.
    pub fn validate(&self) -> Result<()> {
        match &self.rsa_key {
            Some(key) => keys::check_rsa_bits(key.n().bits()),
            None => keys::check_rsa_bits(self.rsa_bits),
        }
    }

    /// Sign `e_content` and return the signature with its public key.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedScheme`] for ECDSA with a digest other than SHA-256
    /// - [`Error::Key`] if the RSA key size is out of bounds or generation fails
    /// - [`Error::SigningFailure`] if the primitive rejects the digest
    pub fn sign(&self, e_content: &[u8], scheme: SignatureScheme) -> Result<Signed> {
        let algorithm = scheme.algorithm()?;
        let digest = scheme.digest_algorithm().digest(e_content);
        debug!(%algorithm, e_content_len = e_content.len(), "signing signed attributes");

        match scheme {
            SignatureScheme::RsaPkcs1(alg) => {
                let key = self.rsa_private_key()?;
                let signature = key
                    .sign(pkcs1v15(alg), &digest)
                    .map_err(|e| Error::SigningFailure(format!("RSA PKCS#1 v1.5: {}", e)))?;
                Ok(Signed {
                    public_key: PublicKey::Rsa(key.to_public_key()),
                    signature: Signature::Rsa(signature),
                })
            }
            SignatureScheme::EcdsaSecp256k1(_) => {
                let key = self.ecdsa_signing_key();
                let signature: EcdsaSignature = key
                    .sign_prehash(&digest)
                    .map_err(|e| Error::SigningFailure(format!("ECDSA secp256k1: {}", e)))?;

                let bytes = signature.to_bytes();
                let mut r = [0u8; 32];
                let mut s = [0u8; 32];
                r.copy_from_slice(&bytes[..32]);
                s.copy_from_slice(&bytes[32..]);

                Ok(Signed {
                    public_key: PublicKey::Ecdsa(EcPoint::from_verifying_key(
                        key.verifying_key(),
                    )),
                    signature: Signature::Ecdsa { r, s },
                })
            }
        }
    }

    fn rsa_private_key(&self) -> Result<RsaPrivateKey> {
        if let Some(key) = &self.rsa_key {
            return Ok(key.clone());
        }
        keys::check_rsa_bits(self.rsa_bits)?;
        debug!(bits = self.rsa_bits, seeded = self.seed.is_some(), "generating RSA key");
        match self.seed {
            Some(seed) => keys::generate_rsa(&mut keys::seeded_rng(seed), self.rsa_bits),
            None => keys::generate_rsa(&mut OsRng, self.rsa_bits),
        }
    }

    fn ecdsa_signing_key(&self) -> EcdsaSigningKey {
        if let Some(key) = &self.ecdsa_key {
            return key.clone();
        }
        match self.seed {
            Some(seed) => keys::generate_ecdsa(&mut keys::seeded_rng(seed)),
            None => keys::generate_ecdsa(&mut OsRng),
        }
    }
}

fn pkcs1v15(alg: DigestAlgorithm) -> Pkcs1v15Sign {
    match alg {
        DigestAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
    }
}

/// Check `signature` over `e_content` under `scheme`.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify.
///
/// # Errors
///
/// - [`Error::UnsupportedScheme`] if the key or signature shape does not belong to `scheme`
/// - [`Error::Key`] if the EC point is not on the curve
pub fn verify(
    public_key: &PublicKey,
    e_content: &[u8],
    signature: &Signature,
    scheme: SignatureScheme,
) -> Result<bool> {
    scheme.algorithm()?;
    let digest = scheme.digest_algorithm().digest(e_content);

    match (scheme, public_key, signature) {
        (SignatureScheme::RsaPkcs1(alg), PublicKey::Rsa(key), Signature::Rsa(sig)) => {
            if key.e() != &BigUint::from(RSA_PUBLIC_EXPONENT) {
                return Ok(false);
            }
            Ok(key.verify(pkcs1v15(alg), &digest, sig).is_ok())
        }
        (SignatureScheme::EcdsaSecp256k1(_), PublicKey::Ecdsa(point), Signature::Ecdsa { r, s }) => {
            let key = point.to_verifying_key()?;
            let mut compact = [0u8; 64];
            compact[..32].copy_from_slice(r);
            compact[32..].copy_from_slice(s);
            let Ok(sig) = EcdsaSignature::from_slice(&compact) else {
                return Ok(false);
            };
            Ok(key.verify_prehash(&digest, &sig).is_ok())
        }
        _ => Err(Error::UnsupportedScheme(format!(
            "{:?} cannot verify this key/signature pair",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    const RSA_SHA256: SignatureScheme = SignatureScheme::RsaPkcs1(DigestAlgorithm::Sha256);
    const RSA_SHA1: SignatureScheme = SignatureScheme::RsaPkcs1(DigestAlgorithm::Sha1);
    const ECDSA: SignatureScheme = SignatureScheme::EcdsaSecp256k1(DigestAlgorithm::Sha256);

    fn test_rsa_key() -> SigningKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        let key = KEY.get_or_init(|| keys::generate_rsa(&mut keys::seeded_rng(42), 2048).unwrap());
        SigningKey::Rsa(key.clone())
    }

    fn fixed_engine() -> SignatureEngine {
        SignatureEngine::new()
            .with_key(test_rsa_key())
            .with_key(SigningKey::ecdsa_from_bytes(&[0x11; 32]).unwrap())
    }

    #[test]
    fn test_rsa_sha256_sign_verify() {
        let signed = fixed_engine().sign(b"econtent", RSA_SHA256).unwrap();
        match &signed.signature {
            Signature::Rsa(sig) => assert_eq!(sig.len(), 256),
            other => panic!("expected RSA signature, got {other:?}"),
        }
        assert!(verify(&signed.public_key, b"econtent", &signed.signature, RSA_SHA256).unwrap());
    }

    #[test]
    fn test_rsa_sha1_sign_verify() {
        let signed = fixed_engine().sign(b"econtent", RSA_SHA1).unwrap();
        assert!(verify(&signed.public_key, b"econtent", &signed.signature, RSA_SHA1).unwrap());
        // Same key, other digest: must not verify.
        assert!(!verify(&signed.public_key, b"econtent", &signed.signature, RSA_SHA256).unwrap());
    }

    #[test]
    fn test_rsa_public_exponent() {
        let signed = fixed_engine().sign(b"econtent", RSA_SHA256).unwrap();
        let PublicKey::Rsa(key) = signed.public_key else {
            panic!("expected RSA public key");
        };
        assert_eq!(key.e(), &BigUint::from(65537u32));
        assert_eq!(key.n().bits(), 2048);
    }

    #[test]
    fn test_rsa_fixed_key_is_deterministic() {
        let engine = fixed_engine();
        let a = engine.sign(b"econtent", RSA_SHA256).unwrap();
        let b = engine.sign(b"econtent", RSA_SHA256).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ecdsa_sign_verify() {
        let signed = fixed_engine().sign(b"econtent", ECDSA).unwrap();
        assert!(matches!(signed.signature, Signature::Ecdsa { .. }));
        assert!(verify(&signed.public_key, b"econtent", &signed.signature, ECDSA).unwrap());
        assert!(!verify(&signed.public_key, b"tampered", &signed.signature, ECDSA).unwrap());
    }

    #[test]
    fn test_ecdsa_fresh_keys_differ() {
        let engine = SignatureEngine::new();
        let a = engine.sign(b"econtent", ECDSA).unwrap();
        let b = engine.sign(b"econtent", ECDSA).unwrap();
        assert_ne!(a.public_key, b.public_key);
        assert!(verify(&b.public_key, b"econtent", &b.signature, ECDSA).unwrap());
    }

    #[test]
    fn test_seeded_engine_reproduces_keys() {
        let a = SignatureEngine::new().seed(9).sign(b"x", ECDSA).unwrap();
        let b = SignatureEngine::new().seed(9).sign(b"y", ECDSA).unwrap();
        assert_eq!(a.public_key, b.public_key);
    }

    #[test]
    fn test_rsa_key_too_small_is_signing_failure() {
        let key = keys::generate_rsa(&mut keys::seeded_rng(1), 256).unwrap();
        let engine = SignatureEngine::new().with_key(SigningKey::Rsa(key));
        assert!(matches!(
            engine.sign(b"econtent", RSA_SHA256),
            Err(Error::SigningFailure(_))
        ));
        assert!(matches!(engine.validate(), Err(Error::Key(_))));
    }

    #[test]
    fn test_oversized_rsa_bits_rejected_before_generation() {
        let engine = SignatureEngine::new().seed(3).rsa_bits(4104);
        assert!(matches!(engine.validate(), Err(Error::Key(_))));
        assert!(matches!(
            engine.sign(b"econtent", RSA_SHA256),
            Err(Error::Key(_))
        ));
        // ECDSA does not depend on the RSA size.
        assert!(engine.sign(b"econtent", ECDSA).is_ok());
    }

    #[test]
    fn test_ecdsa_with_sha1_unsupported() {
        let scheme = SignatureScheme::EcdsaSecp256k1(DigestAlgorithm::Sha1);
        let err = fixed_engine().sign(b"econtent", scheme).unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)));
    }

    #[test]
    fn test_verify_rejects_mismatched_shapes() {
        let signed = fixed_engine().sign(b"econtent", ECDSA).unwrap();
        let err = verify(&signed.public_key, b"econtent", &signed.signature, RSA_SHA256).unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)));
    }

    #[test]
    fn test_verify_zero_signature_is_false() {
        let signed = fixed_engine().sign(b"econtent", ECDSA).unwrap();
        let zero = Signature::Ecdsa {
            r: [0u8; 32],
            s: [0u8; 32],
        };
        assert!(!verify(&signed.public_key, b"econtent", &zero, ECDSA).unwrap());
    }

    #[test]
    fn test_scheme_labels() {
        assert_eq!(
            RSA_SHA256.algorithm().unwrap(),
            SignatureAlgorithm::Sha256WithRsaEncryption
        );
        assert_eq!(RSA_SHA1.algorithm().unwrap(), SignatureAlgorithm::Sha1WithRsaEncryption);
        assert_eq!(ECDSA.algorithm().unwrap(), SignatureAlgorithm::EcdsaWithSha256);
        for alg in SignatureAlgorithm::ALL {
            assert_eq!(alg.scheme().algorithm().unwrap(), alg);
        }
    }
}
