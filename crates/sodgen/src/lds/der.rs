//! DER (Distinguished Encoding Rules) writer and reader
//!
//! The writer side builds every structure inner-first: content is fully encoded
//! before its tag and length are emitted, so lengths are always derived from the
//! bytes that actually follow them.
//!
//! The reader side is a minimal TLV walker, enough to take signed attributes
//! apart again. It only accepts single-byte tags and definite lengths.

use super::constants::*;
use crate::{Error, Result};

/// Encode a length value in DER format.
///
/// For lengths < 128, uses short form (1 byte).
/// For lengths >= 128, uses long form (1 + n bytes).
pub fn encode_length(output: &mut Vec<u8>, length: usize) {
    if length < 128 {
        output.push(length as u8);
    } else {
        let bytes_needed = (64 - (length as u64).leading_zeros() as usize).div_ceil(8);

        // First byte: 0x80 | number of length bytes
        output.push(0x80 | bytes_needed as u8);

        for i in (0..bytes_needed).rev() {
            output.push(((length >> (i * 8)) & 0xFF) as u8);
        }
    }
}

/// Wrap already-encoded content in a tag and its derived length.
pub fn encode_tlv(tag: &[u8], content: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(tag.len() + 5 + content.len());
    output.extend_from_slice(tag);
    encode_length(&mut output, content.len());
    output.extend_from_slice(content);
    output
}

/// SEQUENCE over the concatenation of `parts`.
pub fn encode_sequence(parts: &[&[u8]]) -> Vec<u8> {
    encode_tlv(&[DER_TAG_SEQUENCE], &parts.concat())
}

/// SET over the concatenation of `parts`, kept in the given order.
pub fn encode_set(parts: &[&[u8]]) -> Vec<u8> {
    encode_tlv(&[DER_TAG_SET], &parts.concat())
}

pub fn encode_oid(oid: &[u8]) -> Vec<u8> {
    encode_tlv(&[DER_TAG_OID], oid)
}

pub fn encode_octet_string(data: &[u8]) -> Vec<u8> {
    encode_tlv(&[DER_TAG_OCTET_STRING], data)
}

/// Encode a non-negative INTEGER.
///
/// A leading zero byte is added when the most significant bit is set, so the
/// value is never read back as negative.
pub fn encode_unsigned_integer(val: u64) -> Vec<u8> {
    if val == 0 {
        return vec![DER_TAG_INTEGER, 0x01, 0x00];
    }

    let significant_bits = 64 - val.leading_zeros() as usize;
    let bytes_needed = significant_bits.div_ceil(8);
    let needs_sign_pad = (val >> ((bytes_needed * 8) - 1)) & 1 == 1;

    let mut content = Vec::with_capacity(bytes_needed + 1);
    if needs_sign_pad {
        content.push(0x00);
    }
    for i in (0..bytes_needed).rev() {
        content.push(((val >> (i * 8)) & 0xFF) as u8);
    }

    encode_tlv(&[DER_TAG_INTEGER], &content)
}

/// One decoded tag-length-value element, borrowing its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub content: &'a [u8],
}

/// Sequential reader over a run of concatenated TLVs.
pub struct DerReader<'a> {
    input: &'a [u8],
}

impl<'a> DerReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Read the next element, whatever its tag.
    pub fn read_any(&mut self) -> Result<Tlv<'a>> {
        let (&tag, rest) = self
            .input
            .split_first()
            .ok_or_else(|| Error::Der("unexpected end of input".into()))?;
        let (length, rest) = decode_length(rest)?;
        if rest.len() < length {
            return Err(Error::Der(format!(
                "tag 0x{tag:02x} declares {length} bytes, {} available",
                rest.len()
            )));
        }
        let (content, rest) = rest.split_at(length);
        self.input = rest;
        Ok(Tlv { tag, content })
    }

    /// Read the next element and require `tag`.
    pub fn read(&mut self, tag: u8) -> Result<&'a [u8]> {
        let tlv = self.read_any()?;
        if tlv.tag != tag {
            return Err(Error::Der(format!(
                "expected tag 0x{tag:02x}, found 0x{:02x}",
                tlv.tag
            )));
        }
        Ok(tlv.content)
    }

    /// Require that all input has been consumed.
    pub fn finish(self) -> Result<()> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(Error::Der(format!("{} trailing bytes", self.input.len())))
        }
    }
}

fn decode_length(input: &[u8]) -> Result<(usize, &[u8])> {
    let (&first, rest) = input
        .split_first()
        .ok_or_else(|| Error::Der("missing length".into()))?;

    if first < 0x80 {
        return Ok((first as usize, rest));
    }

    let count = (first & 0x7f) as usize;
    if count == 0 || count > std::mem::size_of::<usize>() {
        return Err(Error::Der(format!("unsupported length form 0x{first:02x}")));
    }
    if rest.len() < count {
        return Err(Error::Der("truncated length".into()));
    }

    let (bytes, rest) = rest.split_at(count);
    let length = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    Ok((length, rest))
}
