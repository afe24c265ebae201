//! Hash Codec
//!
//! Packed, width-typed encoding of value tuples and keccak-256 hashing.
//! The encoding matches Solidity's `abi.encodePacked`: values are laid out
//! in declaration order at their declared width with no length prefixes,
//! so the same tuple must always be encoded with the same field order on
//! every side that hashes it.

pub mod abi;
pub mod leaf;

use crate::error::CodecError;
use crate::types::{strip_hex_prefix, Address, Digest, Role, U256};
use sha3::{Digest as _, Keccak256};

pub use leaf::{parse_eligibility_list, LeafEncoding, LeafRecord};

/// A typed value in a packed tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// 20-byte address
    Address(Address),
    /// Unsigned integer of `bits` width (8..=256, multiple of 8)
    Uint { bits: usize, value: U256 },
    /// Fixed `bytesN`, left-aligned and zero padded to `size`
    FixedBytes { size: usize, data: Vec<u8> },
    /// Dynamic bytes, written raw
    Bytes(Vec<u8>),
    /// UTF-8 string, written raw
    String(String),
    /// Single byte 0x00 / 0x01
    Bool(bool),
}

impl Token {
    pub fn uint256(value: U256) -> Self {
        Token::Uint { bits: 256, value }
    }

    pub fn bytes32(data: Digest) -> Self {
        Token::FixedBytes {
            size: 32,
            data: data.to_vec(),
        }
    }
}

/// Packed encoding of a token tuple
///
/// Fails if any value does not fit its declared width.
pub fn encode_packed(tokens: &[Token]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(tokens.len() * 32);
    for token in tokens {
        match token {
            Token::Address(address) => out.extend_from_slice(address.as_bytes()),
            Token::Uint { bits, value } => {
                if *bits == 0 || *bits > 256 || bits % 8 != 0 {
                    return Err(CodecError::Encoding(format!(
                        "invalid integer width uint{}",
                        bits
                    )));
                }
                if value.bits() > *bits {
                    return Err(CodecError::Encoding(format!(
                        "value {} does not fit in uint{}",
                        value, bits
                    )));
                }
                let mut word = [0u8; 32];
                value.to_big_endian(&mut word);
                out.extend_from_slice(&word[32 - bits / 8..]);
            }
            Token::FixedBytes { size, data } => {
                if *size == 0 || *size > 32 {
                    return Err(CodecError::Encoding(format!(
                        "invalid fixed bytes width bytes{}",
                        size
                    )));
                }
                if data.len() > *size {
                    return Err(CodecError::Encoding(format!(
                        "{} bytes do not fit in bytes{}",
                        data.len(),
                        size
                    )));
                }
                out.extend_from_slice(data);
                out.resize(out.len() + (size - data.len()), 0);
            }
            Token::Bytes(data) => out.extend_from_slice(data),
            Token::String(s) => out.extend_from_slice(s.as_bytes()),
            Token::Bool(b) => out.push(u8::from(*b)),
        }
    }
    Ok(out)
}

/// Keccak-256 of raw bytes
pub fn keccak256(data: &[u8]) -> Digest {
    Keccak256::digest(data).into()
}

/// Keccak-256 of the packed encoding of `tokens`
pub fn hash_packed(tokens: &[Token]) -> Result<Digest, CodecError> {
    let encoded = encode_packed(tokens)?;
    Ok(keccak256(&encoded))
}

/// Role identifier for a role name: keccak-256 of the UTF-8 name
pub fn role_id(name: &str) -> Role {
    keccak256(name.as_bytes())
}

/// Left-aligned `bytes32` form of a short contract type name
pub fn contract_type_id(name: &str) -> Result<Digest, CodecError> {
    let bytes = name.as_bytes();
    if bytes.len() > 32 {
        return Err(CodecError::Encoding(format!(
            "contract type '{}' is longer than 32 bytes",
            name
        )));
    }
    let mut id = [0u8; 32];
    id[..bytes.len()].copy_from_slice(bytes);
    Ok(id)
}

/// Readable name of a `bytes32` contract type (trailing zero bytes trimmed)
pub fn contract_type_name(id: &Digest) -> String {
    let end = id.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    match std::str::from_utf8(&id[..end]) {
        Ok(name) => name.to_string(),
        Err(_) => format!("0x{}", hex::encode(id)),
    }
}

/// Parse an unsigned integer given in decimal or `0x` hex
pub fn parse_uint(s: &str) -> Result<U256, CodecError> {
    let trimmed = s.trim();
    if let Some(hex_digits) = strip_hex_prefix(trimmed) {
        if hex_digits.len() > 64 {
            return Err(CodecError::Encoding(format!(
                "value {} does not fit in uint256",
                trimmed
            )));
        }
        U256::from_str_radix(hex_digits, 16)
            .map_err(|e| CodecError::InvalidHex(format!("{}: {:?}", trimmed, e)))
    } else {
        U256::from_dec_str(trimmed)
            .map_err(|e| CodecError::Encoding(format!("invalid integer {}: {:?}", trimmed, e)))
    }
}
