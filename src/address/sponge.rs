// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Byte sponge over a field-element hash.
//!
//! Messages are absorbed in 31-byte big-endian chunks, sixteen per frame.
//! A full frame is hashed and its digest becomes input 0 of the next frame.
//!
//! ```text
//! msg:    | c0 | c1 | ... | c15 | c16 | ... | tail |
//! frame0: [c0, c1, ..., c15]              -> h0
//! frame1: [h0, c16, ..., tail||0.., 0, 0] -> h1
//! ```

use crate::config::{SPONGE_CHUNK, SPONGE_FRAME};
use crate::error::KernelResult;

/// A field element as a 32-byte big-endian integer.
pub type FieldElement = [u8; 32];

pub const ZERO_ELEMENT: FieldElement = [0u8; 32];

/// Hash of a frame of field elements into one field element.
///
/// Implementations must reject frames they cannot hash rather than pad or
/// truncate them.
pub trait FieldHasher: Send + Sync {
    fn hash(&self, inputs: &[FieldElement]) -> KernelResult<FieldElement>;
}

impl<T: FieldHasher + ?Sized> FieldHasher for Box<T> {
    fn hash(&self, inputs: &[FieldElement]) -> KernelResult<FieldElement> {
        (**self).hash(inputs)
    }
}

/// Reads up to 31 bytes as a big-endian integer. A short chunk is right-padded
/// with zeros first, so `[0xab]` reads as `0xab00..00`.
fn chunk_element(chunk: &[u8]) -> FieldElement {
    debug_assert!(chunk.len() <= SPONGE_CHUNK);
    let mut element = ZERO_ELEMENT;
    element[1..1 + chunk.len()].copy_from_slice(chunk);
    element
}

/// Absorbs `msg` and returns the final digest. The empty message hashes to zero.
pub fn hash_bytes<H: FieldHasher + ?Sized>(hasher: &H, msg: &[u8]) -> KernelResult<FieldElement> {
    let mut frame = [ZERO_ELEMENT; SPONGE_FRAME];
    let mut digest = ZERO_ELEMENT;
    let mut slot = 0;
    let mut dirty = false;

    let mut chunks = msg.chunks_exact(SPONGE_CHUNK);
    for chunk in &mut chunks {
        dirty = true;
        frame[slot] = chunk_element(chunk);
        if slot == SPONGE_FRAME - 1 {
            digest = hasher.hash(&frame)?;
            dirty = false;
            frame = [ZERO_ELEMENT; SPONGE_FRAME];
            frame[0] = digest;
            slot = 1;
        } else {
            slot += 1;
        }
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        frame[slot] = chunk_element(tail);
        dirty = true;
    }

    if dirty {
        digest = hasher.hash(&frame)?;
    }

    Ok(digest)
}
