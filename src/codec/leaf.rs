//! Leaf record schemas for allowlist trees.
//!
//! Two schemas are in use and carry no tag inside the encoded bytes, so a
//! tree must be built from records of a single schema. `LeafEncoding` makes
//! the schema explicit on the Rust side.

use super::{hash_packed, parse_uint, Token};
use crate::error::CodecError;
use crate::types::{Address, Digest, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field layout of a leaf record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafEncoding {
    /// `(address claimant, uint256 quantity, uint256 pricePerUnit, address currency)`
    Claim,
    /// `(address claimant, uint256 amount)`
    Airdrop,
}

impl fmt::Display for LeafEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafEncoding::Claim => write!(f, "claim"),
            LeafEncoding::Airdrop => write!(f, "airdrop"),
        }
    }
}

impl FromStr for LeafEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "claim" => Ok(LeafEncoding::Claim),
            "airdrop" => Ok(LeafEncoding::Airdrop),
            other => Err(CodecError::Decode(format!(
                "unknown leaf encoding '{}' (expected 'claim' or 'airdrop')",
                other
            ))),
        }
    }
}

/// One eligibility entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum LeafRecord {
    Claim {
        claimant: Address,
        quantity: U256,
        price_per_unit: U256,
        currency: Address,
    },
    Airdrop {
        claimant: Address,
        amount: U256,
    },
}

impl LeafRecord {
    pub fn encoding(&self) -> LeafEncoding {
        match self {
            LeafRecord::Claim { .. } => LeafEncoding::Claim,
            LeafRecord::Airdrop { .. } => LeafEncoding::Airdrop,
        }
    }

    pub fn claimant(&self) -> Address {
        match self {
            LeafRecord::Claim { claimant, .. } | LeafRecord::Airdrop { claimant, .. } => {
                *claimant
            }
        }
    }

    /// Tokens in canonical field order
    pub fn tokens(&self) -> Vec<Token> {
        match self {
            LeafRecord::Claim {
                claimant,
                quantity,
                price_per_unit,
                currency,
            } => vec![
                Token::Address(*claimant),
                Token::uint256(*quantity),
                Token::uint256(*price_per_unit),
                Token::Address(*currency),
            ],
            LeafRecord::Airdrop { claimant, amount } => {
                vec![Token::Address(*claimant), Token::uint256(*amount)]
            }
        }
    }

    /// Leaf digest: keccak-256 of the packed record
    pub fn digest(&self) -> Result<Digest, CodecError> {
        hash_packed(&self.tokens())
    }

    /// Parse one comma-separated line: `address,amount` or
    /// `address,quantity,price,currency`
    pub fn from_csv_line(line: &str) -> Result<Self, CodecError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [claimant, amount] => Ok(LeafRecord::Airdrop {
                claimant: claimant.parse()?,
                amount: parse_uint(amount)?,
            }),
            [claimant, quantity, price, currency] => Ok(LeafRecord::Claim {
                claimant: claimant.parse()?,
                quantity: parse_uint(quantity)?,
                price_per_unit: parse_uint(price)?,
                currency: currency.parse()?,
            }),
            _ => Err(CodecError::Decode(format!(
                "expected 2 or 4 comma-separated fields, got {}: '{}'",
                fields.len(),
                line.trim()
            ))),
        }
    }
}

/// Parse an eligibility list, one record per line
///
/// Blank lines and lines starting with `#` are skipped. Line numbers in
/// errors are 1-based.
pub fn parse_eligibility_list(text: &str) -> Result<Vec<LeafRecord>, CodecError> {
    let mut records = Vec::new();
    for (line_num, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = LeafRecord::from_csv_line(trimmed).map_err(|e| {
            CodecError::Decode(format!("line {}: {}", line_num + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}
