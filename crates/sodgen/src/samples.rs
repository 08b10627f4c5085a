//! Read-only sample inputs for mock passport fixtures.
//!
//! The data group digests are arbitrary but fixed, so generated security
//! objects differ only in the MRZ digest and the signing key.

use hex_literal::hex;

use crate::crypto::DigestAlgorithm;
use crate::lds::DataGroupHash;

/// TD3 MRZ of the fictional French passport holder used in all fixtures.
pub const SAMPLE_MRZ: &str =
    "P<FRADUPONT<<ALPHONSE<HUGUES<ALBERT<<<<<<<<<24HB818324FRA0402111M3111115<<<<<<<<<<<<<<02";

/// Signing time of the sample security object: 2019-12-16 17:22:38 UTC.
pub const SAMPLE_SIGNING_TIME: &str = "191216172238Z";

/// Truncated base64 PNG standing in for the DG2 face image.
pub const PHOTO_PLACEHOLDER: &str =
    "iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAABjElEQVR42mL8//8/AyUYiBQYmIw3...";

const SHA256_DATA_GROUPS: [(u8, [u8; 32]); 6] = [
    (2, hex!("be52b4ebde214f3298888e2374e006f29c8d80f80a3d6256f82dcfd25ae8af26")),
    (3, hex!("00c2686cedf661e674c6456e1a5711596ec76cfa241527576e66fad5ae83abae")),
    (11, hex!("889b57906f0f987f55199a51143a334bc174ea003c1e1d1eb78d48f7ffcb647c")),
    (12, hex!("29ea6a4e1f0b7289ed115c47862f3e4ebde9c9d635042fbdc98506792283408e")),
    (13, hex!("5bded2c13ede685224298afd460f94d09c2d69abf1c3b92bd9a292c9de59ee26")),
    (14, hex!("4c7bd80d33e348f53bc1eea6673117a4abbcc2c59cbbf91cc65f450fb6383626")),
];

const SHA1_DATA_GROUPS: [(u8, [u8; 20]); 3] = [
    (2, hex!("be52b4ebde214f3298888e2374e006f29c8d80f8")),
    (3, hex!("00c2686cedf661e674c6456e1a5711596ec76cfa")),
    (14, hex!("4c7bd80d33e348f53bc1eea6673117a4abbcc2c5")),
];

/// A fresh copy of the sample data group digests (DG1 excluded) for `algorithm`.
pub fn data_group_hashes(algorithm: DigestAlgorithm) -> Vec<DataGroupHash> {
    match algorithm {
        DigestAlgorithm::Sha256 => SHA256_DATA_GROUPS
            .iter()
            .map(|(number, digest)| DataGroupHash::new(*number, *digest))
            .collect(),
        DigestAlgorithm::Sha1 => SHA1_DATA_GROUPS
            .iter()
            .map(|(number, digest)| DataGroupHash::new(*number, *digest))
            .collect(),
    }
}
