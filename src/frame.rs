// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wire framing of proof entries.
//!
//! The mint service verifies signatures over raw concatenated bytes, so the
//! layout below is a compatibility contract, not a serialization choice.
//!
//! ```text
//! increment   u32 BE
//! parallelism u32 BE
//! input_len   u64 BE
//! input       [u8; input_len]
//! output_len  u64 BE
//! output      [u8; output_len]
//! ```

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::error::{KernelError, KernelResult};
use crate::types::DataTimeProof;

/// Fixed part of an entry: two u32 and two u64 length prefixes.
pub const ENTRY_OVERHEAD: usize = 4 + 4 + 8 + 8;

pub fn encoded_len(proof: &DataTimeProof) -> usize {
    ENTRY_OVERHEAD + proof.input.len() + proof.output.len()
}

pub fn encode_proof_entry(proof: &DataTimeProof) -> Vec<u8> {
    let mut p = Vec::with_capacity(encoded_len(proof));
    // Writes into a Vec cannot fail.
    let _ = p.write_u32::<BigEndian>(proof.increment);
    let _ = p.write_u32::<BigEndian>(proof.parallelism);
    let _ = p.write_u64::<BigEndian>(proof.input.len() as u64);
    p.extend_from_slice(&proof.input);
    let _ = p.write_u64::<BigEndian>(proof.output.len() as u64);
    p.extend_from_slice(&proof.output);
    p
}

fn take<'a>(buf: &'a [u8], pos: &mut usize, len: usize) -> KernelResult<&'a [u8]> {
    let available = buf.len() - *pos;
    if len > available {
        return Err(KernelError::Truncated { needed: len, available });
    }
    let out = &buf[*pos..*pos + len];
    *pos += len;
    Ok(out)
}

fn take_len(buf: &[u8], pos: &mut usize) -> KernelResult<usize> {
    let raw = BigEndian::read_u64(take(buf, pos, 8)?);
    let available = buf.len() - *pos;
    usize::try_from(raw)
        .ok()
        .filter(|len| *len <= available)
        .ok_or(KernelError::Truncated { needed: raw as usize, available })
}

/// Parses exactly one entry. Trailing bytes are an error.
pub fn decode_proof_entry(buf: &[u8]) -> KernelResult<DataTimeProof> {
    let mut pos = 0;
    let increment = BigEndian::read_u32(take(buf, &mut pos, 4)?);
    let parallelism = BigEndian::read_u32(take(buf, &mut pos, 4)?);
    let input_len = take_len(buf, &mut pos)?;
    let input = take(buf, &mut pos, input_len)?.to_vec();
    let output_len = take_len(buf, &mut pos)?;
    let output = take(buf, &mut pos, output_len)?.to_vec();

    if pos != buf.len() {
        return Err(KernelError::TrailingBytes(buf.len() - pos));
    }

    Ok(DataTimeProof { increment, parallelism, input, output })
}
