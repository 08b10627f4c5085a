//! Signed attributes (eContent) assembly and decoding.
//!
//! The signed attributes are the bytes the document signer actually signs:
//!
//! ```text
//! SET {
//!   SEQUENCE { OID messageDigest, SET { OCTET STRING contentDigest } }
//!   SEQUENCE { OID signingTime,   SET { UTCTime "YYMMDDHHMMSSZ" } }
//! }
//! ```
//!
//! Optionally a contentType attribute naming id-ldsSecurityObject is placed in
//! front. Attributes are emitted in this fixed order rather than DER SET OF
//! sort order.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::constants::*;
use super::der::{encode_octet_string, encode_oid, encode_sequence, encode_set, encode_tlv, DerReader};
use crate::{Error, Result};

/// A validated `YYMMDDHHMMSSZ` UTCTime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcTime([u8; UTC_TIME_LEN]);

impl UtcTime {
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestampFormat`] unless `value` is twelve digits
    /// forming a valid month, day, hour, minute and second, followed by `Z`.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimestampFormat(value.to_string());

        let bytes: [u8; UTC_TIME_LEN] = value.as_bytes().try_into().map_err(|_| invalid())?;
        if bytes[12] != b'Z' || !bytes[..12].iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let field = |i: usize| (bytes[i] - b'0') as u32 * 10 + (bytes[i + 1] - b'0') as u32;
        let (month, day, hour, minute, second) = (field(2), field(4), field(6), field(8), field(10));
        if !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return Err(invalid());
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Validated ASCII on construction.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for UtcTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical content of the signed attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAttributes {
    /// Emit the contentType (id-ldsSecurityObject) attribute first.
    pub content_type: bool,
    /// Digest of the serialized data group hashes.
    pub message_digest: Vec<u8>,
    pub signing_time: UtcTime,
}

impl SignedAttributes {
    pub fn new(message_digest: impl Into<Vec<u8>>, signing_time: UtcTime) -> Self {
        Self {
            content_type: false,
            message_digest: message_digest.into(),
            signing_time,
        }
    }

    pub fn with_content_type(mut self, enabled: bool) -> Self {
        self.content_type = enabled;
        self
    }

    /// DER encoding of the attribute set.
    ///
    /// Every attribute is encoded completely before the outer SET length is
    /// computed from their combined size.
    pub fn encode(&self) -> Vec<u8> {
        let mut attributes: Vec<Vec<u8>> = Vec::with_capacity(3);

        if self.content_type {
            attributes.push(attribute(CONTENT_TYPE_OID, &encode_oid(LDS_SECURITY_OBJECT_OID)));
        }
        attributes.push(attribute(
            MESSAGE_DIGEST_OID,
            &encode_octet_string(&self.message_digest),
        ));
        attributes.push(attribute(
            SIGNING_TIME_OID,
            &encode_tlv(&[DER_TAG_UTC_TIME], self.signing_time.as_bytes()),
        ));

        let parts: Vec<&[u8]> = attributes.iter().map(Vec::as_slice).collect();
        let e_content = encode_set(&parts);
        debug!(
            e_content_len = e_content.len(),
            digest_len = self.message_digest.len(),
            "assembled signed attributes"
        );
        e_content
    }

    /// Take encoded signed attributes apart again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Der`] if the bytes are not a SET of attributes with
    /// exactly one message digest and one signing time, or carry an
    /// unexpected attribute.
    pub fn decode(e_content: &[u8]) -> Result<Self> {
        let mut outer = DerReader::new(e_content);
        let set = outer.read(DER_TAG_SET)?;
        outer.finish()?;

        let mut content_type = false;
        let mut message_digest = None;
        let mut signing_time = None;

        let mut attributes = DerReader::new(set);
        while !attributes.is_empty() {
            let mut attr = DerReader::new(attributes.read(DER_TAG_SEQUENCE)?);
            let oid = attr.read(DER_TAG_OID)?;
            let mut values = DerReader::new(attr.read(DER_TAG_SET)?);
            attr.finish()?;

            match oid {
                CONTENT_TYPE_OID if !content_type => {
                    if values.read(DER_TAG_OID)? != LDS_SECURITY_OBJECT_OID {
                        return Err(Error::Der("content type is not id-ldsSecurityObject".into()));
                    }
                    content_type = true;
                }
                MESSAGE_DIGEST_OID if message_digest.is_none() => {
                    message_digest = Some(values.read(DER_TAG_OCTET_STRING)?.to_vec());
                }
                SIGNING_TIME_OID if signing_time.is_none() => {
                    let raw = values.read(DER_TAG_UTC_TIME)?;
                    let text = std::str::from_utf8(raw)
                        .map_err(|_| Error::Der("signing time is not ASCII".into()))?;
                    signing_time = Some(UtcTime::parse(text)?);
                }
                other => {
                    return Err(Error::Der(format!(
                        "unexpected or repeated attribute {}",
                        hex::encode(other)
                    )))
                }
            }
            values.finish()?;
        }

        Ok(Self {
            content_type,
            message_digest: message_digest
                .ok_or_else(|| Error::Der("missing messageDigest attribute".into()))?,
            signing_time: signing_time
                .ok_or_else(|| Error::Der("missing signingTime attribute".into()))?,
        })
    }
}

/// `SEQUENCE { OID, SET { value } }`
fn attribute(oid: &[u8], value: &[u8]) -> Vec<u8> {
    encode_sequence(&[&encode_oid(oid), &encode_set(&[value])])
}

/// Assemble the two-attribute eContent for `content_digest` signed at `signing_time`.
///
/// ```
/// let e_content = sodgen::lds::assemble(&[0u8; 32], "191216172238Z")?;
/// assert_eq!(&e_content[..2], &[0x31, 0x4f]);
/// # Ok::<(), sodgen::Error>(())
/// ```
pub fn assemble(content_digest: &[u8], signing_time: &str) -> Result<Vec<u8>> {
    let signing_time = UtcTime::parse(signing_time)?;
    Ok(SignedAttributes::new(content_digest, signing_time).encode())
}
