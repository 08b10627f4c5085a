//! DER tags and object identifiers used in LDS security objects.
//!
//! OIDs are stored as their DER content octets (without the 0x06 tag and length),
//! which is how they are spliced into encoded structures.

/// DER tag for INTEGER
pub const DER_TAG_INTEGER: u8 = 0x02;

/// DER tag for OCTET STRING
pub const DER_TAG_OCTET_STRING: u8 = 0x04;

/// DER tag for OBJECT IDENTIFIER
pub const DER_TAG_OID: u8 = 0x06;

/// DER tag for UTCTime
pub const DER_TAG_UTC_TIME: u8 = 0x17;

/// DER tag for SEQUENCE / SEQUENCE OF
pub const DER_TAG_SEQUENCE: u8 = 0x30;

/// DER tag for SET / SET OF
pub const DER_TAG_SET: u8 = 0x31;

/// DG1 application tag (`[APPLICATION 1]`, constructed)
pub const DG1_TAG: u8 = 0x61;

/// MRZ data element tag (`5F1F`)
pub const MRZ_INFO_TAG: [u8; 2] = [0x5f, 0x1f];

/// LDSSecurityObject version (V0, no LDS version info)
pub const LDS_SECURITY_OBJECT_VERSION: u64 = 0;

/// SHA-1 OID: 1.3.14.3.2.26
pub const SHA1_OID: &[u8] = &[0x2b, 0x0e, 0x03, 0x02, 0x1a];

/// SHA-256 OID: 2.16.840.1.101.3.4.2.1
pub const SHA256_OID: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

/// CMS contentType attribute OID: 1.2.840.113549.1.9.3
pub const CONTENT_TYPE_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x03];

/// CMS messageDigest attribute OID: 1.2.840.113549.1.9.4
pub const MESSAGE_DIGEST_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x04];

/// CMS signingTime attribute OID: 1.2.840.113549.1.9.5
pub const SIGNING_TIME_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x05];

/// ICAO id-ldsSecurityObject: 2.23.136.1.1.1
pub const LDS_SECURITY_OBJECT_OID: &[u8] = &[0x67, 0x81, 0x08, 0x01, 0x01, 0x01];

/// Data group number reserved for the MRZ (DG1)
pub const MRZ_DATA_GROUP: u8 = 1;

/// Length of a UTCTime value in `YYMMDDHHMMSSZ` form
pub const UTC_TIME_LEN: usize = 13;
