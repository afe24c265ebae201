//! Standard (head/tail) ABI encoding for the proof tool's output.
//!
//! Only the shapes handed to claim transactions are supported: a single
//! `bytes32` and a dynamic `bytes32[]`.

use crate::error::CodecError;
use crate::types::{Digest, U256};

const WORD: usize = 32;

fn word_from_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    U256::from(value).to_big_endian(&mut word);
    word
}

fn usize_from_word(word: &[u8]) -> Result<usize, CodecError> {
    let value = U256::from_big_endian(word);
    if value > U256::from(usize::MAX) {
        return Err(CodecError::Decode(format!("word {} overflows usize", value)));
    }
    Ok(value.as_usize())
}

/// `abi.encode(bytes32)`
pub fn encode_bytes32(value: &Digest) -> Vec<u8> {
    value.to_vec()
}

/// `abi.encode(bytes32[])`: offset word, length word, then the elements
pub fn encode_bytes32_array(values: &[Digest]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD * (2 + values.len()));
    out.extend_from_slice(&word_from_usize(WORD));
    out.extend_from_slice(&word_from_usize(values.len()));
    for value in values {
        out.extend_from_slice(value);
    }
    out
}

/// Inverse of [`encode_bytes32_array`]
pub fn decode_bytes32_array(data: &[u8]) -> Result<Vec<Digest>, CodecError> {
    if data.len() < WORD * 2 || data.len() % WORD != 0 {
        return Err(CodecError::Decode(format!(
            "bytes32[] payload has invalid length {}",
            data.len()
        )));
    }
    let offset = usize_from_word(&data[..WORD])?;
    let len_end = offset
        .checked_add(WORD)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| CodecError::Decode(format!("array offset {} out of range", offset)))?;
    let count = usize_from_word(&data[offset..len_end])?;
    let body_end = count
        .checked_mul(WORD)
        .and_then(|size| size.checked_add(len_end))
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            CodecError::Decode(format!("array of {} elements exceeds payload", count))
        })?;

    Ok(data[len_end..body_end]
        .chunks_exact(WORD)
        .map(|chunk| {
            let mut digest = [0u8; WORD];
            digest.copy_from_slice(chunk);
            digest
        })
        .collect())
}
