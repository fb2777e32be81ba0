// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Poseidon frame hasher over BN254, compatible with circomlib / iden3.
//!
//! Elements travel as 32-byte big-endian integers and must be below the field
//! modulus.

use ff::{PrimeField, PrimeFieldRepr};
use poseidon_rs::{Fr, Poseidon};

use super::sponge::{FieldElement, FieldHasher};
use crate::config::SPONGE_FRAME;
use crate::error::{KernelError, KernelResult};

type Repr = <Fr as PrimeField>::Repr;

pub struct PoseidonFieldHasher {
    poseidon: Poseidon,
}

impl PoseidonFieldHasher {
    pub fn new() -> Self {
        Self { poseidon: Poseidon::new() }
    }
}

impl Default for PoseidonFieldHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PoseidonFieldHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PoseidonFieldHasher")
    }
}

fn to_fr(element: &FieldElement) -> KernelResult<Fr> {
    let mut repr = Repr::default();
    repr.read_be(&element[..])
        .map_err(|_| KernelError::InvalidFieldElement(hex::encode(element)))?;
    Fr::from_repr(repr).map_err(|_| KernelError::InvalidFieldElement(hex::encode(element)))
}

fn from_fr(value: Fr) -> KernelResult<FieldElement> {
    let mut out = [0u8; 32];
    value
        .into_repr()
        .write_be(&mut out[..])
        .map_err(|e| KernelError::InvalidFieldElement(e.to_string()))?;
    Ok(out)
}

impl FieldHasher for PoseidonFieldHasher {
    fn hash(&self, inputs: &[FieldElement]) -> KernelResult<FieldElement> {
        if inputs.is_empty() || inputs.len() > SPONGE_FRAME {
            return Err(KernelError::InvalidHashInput(inputs.len()));
        }
        let frame = inputs.iter().map(to_fr).collect::<KernelResult<Vec<_>>>()?;
        let digest = self
            .poseidon
            .hash(frame)
            .map_err(|_| KernelError::InvalidHashInput(inputs.len()))?;
        from_fr(digest)
    }
}
