//! Output records in the wire shape consumed by verifiers.
//!
//! RSA and ECDSA records differ in their `pubKey` and signature fields, so
//! [`PassportRecord`] is a sum type over the two shapes with the shared fields in
//! [`RecordBase`]. Serialized, the shape itself is the discriminant:
//!
//! ```text
//! RSA:   { mrz, signatureAlgorithm, pubKey: { modulus, exponent }, dataGroupHashes,
//!          eContent, encryptedDigest, photoBase64 }
//! ECDSA: { mrz, signatureAlgorithm, pubKey: { x, y }, dataGroupHashes,
//!          eContent, signature: { r, s }, photoBase64 }
//! ```
//!
//! Modulus and exponent are decimal strings; byte fields are arrays of 0–255.

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::crypto::{self, EcPoint, PublicKey, Signature, SignatureAlgorithm, Signed};
use crate::lds::{DataGroupHashTable, SignedAttributes};
use crate::{Error, Result};

/// Fields shared by every record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBase {
    pub mrz: String,
    pub signature_algorithm: SignatureAlgorithm,
    /// Serialized LDSSecurityObject (data group hash table).
    pub data_group_hashes: Vec<u8>,
    /// DER signed attributes, the signed bytes.
    pub e_content: Vec<u8>,
    pub photo_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPubKey {
    pub modulus: String,
    pub exponent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcPubKey {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaRecord {
    #[serde(flatten)]
    pub base: RecordBase,
    pub pub_key: RsaPubKey,
    /// PKCS#1 v1.5 signature over the eContent.
    pub encrypted_digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcdsaRecord {
    #[serde(flatten)]
    pub base: RecordBase,
    pub pub_key: EcPubKey,
    pub signature: EcSignature,
}

/// One generated mock passport security object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassportRecord {
    Rsa(RsaRecord),
    Ecdsa(EcdsaRecord),
}

impl PassportRecord {
    /// Aggregate pipeline outputs into a record.
    ///
    /// # Errors
    ///
    /// - [`Error::DigestLengthMismatch`] if the table's digests are not the size of
    ///   `algorithm`'s digest
    /// - [`Error::UnsupportedScheme`] if the key/signature shape does not match `algorithm`
    pub fn compose(
        mrz: &str,
        algorithm: SignatureAlgorithm,
        table: &DataGroupHashTable,
        e_content: Vec<u8>,
        signed: Signed,
        photo: &str,
    ) -> Result<Self> {
        let expected = algorithm.digest_algorithm().output_len();
        if table.digest_len() != expected {
            return Err(Error::DigestLengthMismatch {
                expected,
                actual: table.digest_len(),
            });
        }

        let base = RecordBase {
            mrz: mrz.to_string(),
            signature_algorithm: algorithm,
            data_group_hashes: table.serialize(),
            e_content,
            photo_base64: photo.to_string(),
        };

        match (algorithm, signed.public_key, signed.signature) {
            (
                SignatureAlgorithm::Sha256WithRsaEncryption
                | SignatureAlgorithm::Sha1WithRsaEncryption,
                PublicKey::Rsa(key),
                Signature::Rsa(signature),
            ) => Ok(PassportRecord::Rsa(RsaRecord {
                base,
                pub_key: RsaPubKey {
                    modulus: key.n().to_string(),
                    exponent: key.e().to_string(),
                },
                encrypted_digest: signature,
            })),
            (
                SignatureAlgorithm::EcdsaWithSha256,
                PublicKey::Ecdsa(point),
                Signature::Ecdsa { r, s },
            ) => Ok(PassportRecord::Ecdsa(EcdsaRecord {
                base,
                pub_key: EcPubKey {
                    x: point.x,
                    y: point.y,
                },
                signature: EcSignature { r, s },
            })),
            (algorithm, _, _) => Err(Error::UnsupportedScheme(format!(
                "key and signature do not match {}",
                algorithm
            ))),
        }
    }

    pub fn base(&self) -> &RecordBase {
        match self {
            PassportRecord::Rsa(record) => &record.base,
            PassportRecord::Ecdsa(record) => &record.base,
        }
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.base().signature_algorithm
    }

    pub fn e_content(&self) -> &[u8] {
        &self.base().e_content
    }

    /// Decode the eContent back into its attributes.
    pub fn signed_attributes(&self) -> Result<SignedAttributes> {
        SignedAttributes::decode(self.e_content())
    }

    /// Public key as carried on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Key`] if the modulus or exponent is not a decimal number.
    pub fn public_key(&self) -> Result<PublicKey> {
        match self {
            PassportRecord::Rsa(record) => {
                let n = parse_decimal(&record.pub_key.modulus)?;
                let e = parse_decimal(&record.pub_key.exponent)?;
                let key = RsaPublicKey::new(n, e)
                    .map_err(|e| Error::Key(format!("Invalid RSA public key: {}", e)))?;
                Ok(PublicKey::Rsa(key))
            }
            PassportRecord::Ecdsa(record) => Ok(PublicKey::Ecdsa(EcPoint {
                x: record.pub_key.x,
                y: record.pub_key.y,
            })),
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            PassportRecord::Rsa(record) => Signature::Rsa(record.encrypted_digest.clone()),
            PassportRecord::Ecdsa(record) => Signature::Ecdsa {
                r: record.signature.r,
                s: record.signature.s,
            },
        }
    }

    /// Verify the signature over the eContent using only the record's own fields.
    pub fn verify(&self) -> Result<bool> {
        crypto::verify(
            &self.public_key()?,
            self.e_content(),
            &self.signature(),
            self.signature_algorithm().scheme(),
        )
    }
}

fn parse_decimal(value: &str) -> Result<BigUint> {
    BigUint::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| Error::Key(format!("not a decimal integer: {:?}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{DigestAlgorithm, SignatureEngine, SigningKey};
    use crate::lds::{assemble, DataGroupHash};

    fn table(alg: DigestAlgorithm) -> DataGroupHashTable {
        let len = alg.output_len();
        DataGroupHashTable::build(&vec![1u8; len], &[DataGroupHash::new(2, vec![2u8; len])]).unwrap()
    }

    fn ecdsa_record() -> PassportRecord {
        let table = table(DigestAlgorithm::Sha256);
        let e_content = assemble(
            &table.content_digest(DigestAlgorithm::Sha256).unwrap(),
            "191216172238Z",
        )
        .unwrap();
        let signed = SignatureEngine::new()
            .with_key(SigningKey::ecdsa_from_bytes(&[3u8; 32]).unwrap())
            .sign(&e_content, SignatureAlgorithm::EcdsaWithSha256.scheme())
            .unwrap();
        PassportRecord::compose(
            "P<UTO",
            SignatureAlgorithm::EcdsaWithSha256,
            &table,
            e_content,
            signed,
            "photo",
        )
        .unwrap()
    }

    #[test]
    fn test_compose_ecdsa_shape() {
        let record = ecdsa_record();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["signatureAlgorithm"], "ecdsa-with-SHA256");
        assert_eq!(json["mrz"], "P<UTO");
        assert_eq!(json["photoBase64"], "photo");
        assert_eq!(json["pubKey"]["x"].as_array().unwrap().len(), 32);
        assert_eq!(json["signature"]["r"].as_array().unwrap().len(), 32);
        assert!(json.get("encryptedDigest").is_none());
        assert!(json["eContent"].is_array());
        assert!(json["dataGroupHashes"].is_array());
    }

    #[test]
    fn test_json_round_trip_keeps_variant() {
        let record = ecdsa_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PassportRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, PassportRecord::Ecdsa(_)));
        assert_eq!(parsed, record);
        assert!(parsed.verify().unwrap());
    }

    #[test]
    fn test_rsa_record_parses_from_wire() {
        let json = r#"{
            "mrz": "P<UTO",
            "signatureAlgorithm": "sha1WithRSAEncryption",
            "pubKey": { "modulus": "3233", "exponent": "65537" },
            "dataGroupHashes": [48, 0],
            "eContent": [49, 0],
            "encryptedDigest": [1, 2, 3],
            "photoBase64": "x"
        }"#;
        let parsed: PassportRecord = serde_json::from_str(json).unwrap();
        let PassportRecord::Rsa(rsa) = &parsed else {
            panic!("expected RSA record");
        };
        assert_eq!(rsa.pub_key.modulus, "3233");
        assert_eq!(parsed.signature_algorithm(), SignatureAlgorithm::Sha1WithRsaEncryption);
    }

    #[test]
    fn test_compose_rejects_digest_size() {
        let table = table(DigestAlgorithm::Sha1);
        let signed = SignatureEngine::new()
            .sign(b"x", SignatureAlgorithm::EcdsaWithSha256.scheme())
            .unwrap();
        let err = PassportRecord::compose(
            "P<UTO",
            SignatureAlgorithm::EcdsaWithSha256,
            &table,
            vec![],
            signed,
            "",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DigestLengthMismatch {
                expected: 32,
                actual: 20
            }
        ));
    }

    #[test]
    fn test_compose_rejects_mismatched_signature() {
        let table = table(DigestAlgorithm::Sha256);
        let signed = SignatureEngine::new()
            .sign(b"x", SignatureAlgorithm::EcdsaWithSha256.scheme())
            .unwrap();
        let err = PassportRecord::compose(
            "P<UTO",
            SignatureAlgorithm::Sha256WithRsaEncryption,
            &table,
            vec![],
            signed,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)));
    }

    #[test]
    fn test_bad_modulus_is_key_error() {
        let mut record = ecdsa_record();
        let base = record.base().clone();
        record = PassportRecord::Rsa(RsaRecord {
            base,
            pub_key: RsaPubKey {
                modulus: "12ab".into(),
                exponent: "65537".into(),
            },
            encrypted_digest: vec![],
        });
        assert!(matches!(record.verify(), Err(Error::Key(_))));
    }
}
