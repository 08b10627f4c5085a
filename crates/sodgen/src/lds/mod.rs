//! Logical Data Structure pieces of the document security object.

pub mod constants;
pub mod data_groups;
pub mod der;
pub mod mrz;
pub mod signed_attrs;

pub use data_groups::{content_digest, DataGroupHash, DataGroupHashTable};
pub use mrz::{canonicalize, mrz_digest};
pub use signed_attrs::{assemble, SignedAttributes, UtcTime};
