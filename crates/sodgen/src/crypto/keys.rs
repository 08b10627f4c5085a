//! Signing key material for RSA and secp256k1.
//!
//! Keys are either generated per call (the default for fixtures), derived from a
//! `u64` seed for reproducible output, or loaded from PKCS#8 PEM.
//!
//! # Examples
//!
//! ```no_run
//! use sodgen::crypto::SigningKey;
//!
//! let pem = std::fs::read_to_string("issuer_key.pem")?;
//! let key = SigningKey::from_pkcs8_pem(&pem)?;
//! # Ok::<(), sodgen::Error>(())
//! ```

use std::fmt;

use k256::ecdsa::SigningKey as EcdsaSigningKey;
use pkcs8::DecodePrivateKey;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey};

use crate::{Error, Result};

/// Modulus size used when no size is configured.
pub const RSA_DEFAULT_BITS: usize = 2048;

/// Public exponent of every RSA key this crate generates or accepts.
pub const RSA_PUBLIC_EXPONENT: u64 = 65537;

/// Smallest modulus that fits a PKCS#1 v1.5 SHA-256 DigestInfo.
pub const RSA_MIN_BITS: usize = 512;

/// Largest modulus a verifier will rebuild from a record.
pub const RSA_MAX_BITS: usize = 4096;

/// Private key for signing security objects.
///
/// # Variants
///
/// * [`Rsa`](SigningKey::Rsa) - RSA private key, used for both PKCS#1 v1.5 digests
/// * [`Ecdsa`](SigningKey::Ecdsa) - secp256k1 private key
#[allow(clippy::large_enum_variant)]
#[derive(Clone)]
pub enum SigningKey {
    Rsa(RsaPrivateKey),
    Ecdsa(EcdsaSigningKey),
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&self.kind()).finish()
    }
}

impl SigningKey {
    pub fn kind(&self) -> &'static str {
        match self {
            SigningKey::Rsa(_) => "rsa",
            SigningKey::Ecdsa(_) => "secp256k1",
        }
    }

    /// Return the key if its [`kind`](Self::kind) is `kind`.
    pub fn ensure_kind(self, kind: &str) -> Result<Self> {
        if self.kind() != kind {
            return Err(Error::Key(format!(
                "expected {} key, got {}",
                kind,
                self.kind()
            )));
        }
        Ok(self)
    }

    /// Load a PKCS#8 PEM private key, RSA or secp256k1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Key`] if the PEM is neither, or if an RSA key does not
    /// use the public exponent 65537.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        if let Ok(rsa_key) = RsaPrivateKey::from_pkcs8_pem(pem) {
            return Self::checked_rsa(rsa_key);
        }
        if let Ok(ecdsa_key) = EcdsaSigningKey::from_pkcs8_pem(pem) {
            return Ok(SigningKey::Ecdsa(ecdsa_key));
        }
        Err(Error::Key(
            "Failed to parse private key as RSA or secp256k1 PKCS#8".into(),
        ))
    }

    /// Load a PKCS#8 DER private key, RSA or secp256k1.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        if let Ok(rsa_key) = RsaPrivateKey::from_pkcs8_der(der) {
            return Self::checked_rsa(rsa_key);
        }
        if let Ok(ecdsa_key) = EcdsaSigningKey::from_pkcs8_der(der) {
            return Ok(SigningKey::Ecdsa(ecdsa_key));
        }
        Err(Error::Key(
            "Failed to parse private key as RSA or secp256k1 PKCS#8".into(),
        ))
    }

    /// Wrap a raw 32-byte secp256k1 scalar.
    pub fn ecdsa_from_bytes(secret: &[u8]) -> Result<Self> {
        let key = EcdsaSigningKey::from_slice(secret)
            .map_err(|e| Error::Key(format!("Invalid secp256k1 scalar: {}", e)))?;
        Ok(SigningKey::Ecdsa(key))
    }

    fn checked_rsa(key: RsaPrivateKey) -> Result<Self> {
        if key.e() != &BigUint::from(RSA_PUBLIC_EXPONENT) {
            return Err(Error::Key(format!(
                "RSA public exponent must be {}, got {}",
                RSA_PUBLIC_EXPONENT,
                key.e()
            )));
        }
        Ok(SigningKey::Rsa(key))
    }
}

/// Generate an RSA key with exponent 65537 from `rng`.
pub fn generate_rsa<R: RngCore + CryptoRng>(rng: &mut R, bits: usize) -> Result<RsaPrivateKey> {
    let exp = BigUint::from(RSA_PUBLIC_EXPONENT);
    RsaPrivateKey::new_with_exp(rng, bits, &exp)
        .map_err(|e| Error::Key(format!("RSA key generation failed: {}", e)))
}

/// Check an RSA modulus size against [`RSA_MIN_BITS`]..=[`RSA_MAX_BITS`].
pub fn check_rsa_bits(bits: usize) -> Result<()> {
    if !(RSA_MIN_BITS..=RSA_MAX_BITS).contains(&bits) {
        return Err(Error::Key(format!(
            "RSA modulus must be {}-{} bits, got {}",
            RSA_MIN_BITS, RSA_MAX_BITS, bits
        )));
    }
    Ok(())
}

/// Generate a secp256k1 key from `rng`.
pub fn generate_ecdsa<R: RngCore + CryptoRng>(rng: &mut R) -> EcdsaSigningKey {
    EcdsaSigningKey::random(rng)
}

/// Deterministic RNG for seeded key derivation.
///
/// The same seed always yields the same keys, which is what makes fixtures
/// reproducible without shipping private keys.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkcs8::{EncodePrivateKey, LineEnding};

    #[test]
    fn test_check_rsa_bits_bounds() {
        assert!(check_rsa_bits(RSA_MIN_BITS).is_ok());
        assert!(check_rsa_bits(RSA_DEFAULT_BITS).is_ok());
        assert!(check_rsa_bits(RSA_MAX_BITS).is_ok());
        assert!(matches!(check_rsa_bits(256), Err(Error::Key(_))));
        assert!(matches!(check_rsa_bits(4104), Err(Error::Key(_))));
    }

    #[test]
    fn test_seeded_ecdsa_is_reproducible() {
        let a = generate_ecdsa(&mut seeded_rng(7));
        let b = generate_ecdsa(&mut seeded_rng(7));
        let c = generate_ecdsa(&mut seeded_rng(8));
        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_ne!(a.to_bytes(), c.to_bytes());
    }

    #[test]
    fn test_ecdsa_pem_round_trip() {
        let key = generate_ecdsa(&mut seeded_rng(1));
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let loaded = SigningKey::from_pkcs8_pem(&pem).unwrap();
        match loaded {
            SigningKey::Ecdsa(loaded) => assert_eq!(loaded.to_bytes(), key.to_bytes()),
            other => panic!("expected secp256k1 key, got {other:?}"),
        }
    }

    #[test]
    fn test_rsa_pem_round_trip() {
        let key = generate_rsa(&mut seeded_rng(2), 1024).unwrap();
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let loaded = SigningKey::from_pkcs8_pem(&pem).unwrap();
        match loaded {
            SigningKey::Rsa(loaded) => {
                assert_eq!(loaded.n(), key.n());
                assert_eq!(loaded.e(), &BigUint::from(RSA_PUBLIC_EXPONENT));
            }
            other => panic!("expected RSA key, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_kind_rejects_other_key_type() {
        let pem = generate_ecdsa(&mut seeded_rng(1))
            .to_pkcs8_pem(LineEnding::LF)
            .unwrap();
        let key = SigningKey::from_pkcs8_pem(&pem).unwrap();

        assert!(matches!(key.clone().ensure_kind("rsa"), Err(Error::Key(_))));
        assert_eq!(key.ensure_kind("secp256k1").unwrap().kind(), "secp256k1");
    }

    #[test]
    fn test_from_pem_invalid() {
        let result = SigningKey::from_pkcs8_pem("not a key");
        assert!(matches!(result, Err(Error::Key(_))));
    }

    #[test]
    fn test_ecdsa_from_bytes_rejects_zero() {
        assert!(SigningKey::ecdsa_from_bytes(&[0u8; 32]).is_err());
        assert!(SigningKey::ecdsa_from_bytes(&[1u8; 32]).is_ok());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = SigningKey::Ecdsa(generate_ecdsa(&mut seeded_rng(3)));
        assert_eq!(format!("{key:?}"), "SigningKey(\"secp256k1\")");
    }
}
