// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! BLAKE3 frame hasher.
//!
//! Cheap deterministic hasher for tests and local tooling. It does not match
//! the network's addresses; use [`super::PoseidonFieldHasher`] for that. Inputs are absorbed as 32-byte big-endian words under a fixed derivation
//! context, and the digest is cut to 253 bits so it is always a valid input
//! for the next frame.

use super::sponge::{FieldElement, FieldHasher};
use crate::config::SPONGE_FRAME;
use crate::error::{KernelError, KernelResult};

const CONTEXT: &str = "predusk 2024-06 field hash v1";

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3FieldHasher;

impl FieldHasher for Blake3FieldHasher {
    fn hash(&self, inputs: &[FieldElement]) -> KernelResult<FieldElement> {
        if inputs.is_empty() || inputs.len() > SPONGE_FRAME {
            return Err(KernelError::InvalidHashInput(inputs.len()));
        }

        let mut hasher = blake3::Hasher::new_derive_key(CONTEXT);
        hasher.update(&(inputs.len() as u32).to_be_bytes());
        for input in inputs {
            hasher.update(input);
        }

        let mut out = *hasher.finalize().as_bytes();
        out[0] &= 0x1f;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::sponge::ZERO_ELEMENT;

    #[test]
    fn test_rejects_bad_frame_width() {
        let h = Blake3FieldHasher;
        assert_eq!(h.hash(&[]), Err(KernelError::InvalidHashInput(0)));
        let wide = vec![ZERO_ELEMENT; SPONGE_FRAME + 1];
        assert_eq!(h.hash(&wide), Err(KernelError::InvalidHashInput(SPONGE_FRAME + 1)));
    }

    #[test]
    fn test_output_fits_253_bits() {
        let h = Blake3FieldHasher;
        for i in 0..64u8 {
            let mut e = ZERO_ELEMENT;
            e[31] = i;
            let out = h.hash(&[e]).unwrap();
            assert!(out[0] < 0x20);
        }
    }
}
