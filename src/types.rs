//! Core primitive types shared across the crate.

use crate::error::CodecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use primitive_types::U256;

/// 32-byte keccak-256 digest
pub type Digest = [u8; 32];

/// Caller-chosen CREATE2 salt
pub type Salt = [u8; 32];

/// Role identifier: keccak-256 of the role name
pub type Role = [u8; 32];

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let raw: [u8; 20] = bytes.try_into().map_err(|_| {
            CodecError::Encoding(format!("address must be 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Address(raw))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl From<[u8; 20]> for Address {
    fn from(raw: [u8; 20]) -> Self {
        Address(raw)
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let cleaned = strip_hex_prefix(trimmed).unwrap_or(trimmed);
        if cleaned.len() != 40 {
            return Err(CodecError::InvalidHex(format!(
                "address must be 40 hex chars, got {}",
                cleaned.len()
            )));
        }
        let mut raw = [0u8; 20];
        hex::decode_to_slice(cleaned, &mut raw)
            .map_err(|e| CodecError::InvalidHex(format!("{}: {}", trimmed, e)))?;
        Ok(Address(raw))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Digits after a `0x` or `0X` prefix, if there is one
pub(crate) fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Parse a 32-byte digest from hex, with or without the `0x` prefix
pub fn parse_digest(s: &str) -> Result<Digest, CodecError> {
    let trimmed = s.trim();
    let cleaned = strip_hex_prefix(trimmed).unwrap_or(trimmed);
    if cleaned.len() != 64 {
        return Err(CodecError::InvalidHex(format!(
            "digest must be 64 hex chars, got {}",
            cleaned.len()
        )));
    }
    let mut digest = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut digest)
        .map_err(|e| CodecError::InvalidHex(format!("{}: {}", trimmed, e)))?;
    Ok(digest)
}

/// Format a digest as `0x`-prefixed lowercase hex
pub fn format_digest(digest: &Digest) -> String {
    format!("0x{}", hex::encode(digest))
}
