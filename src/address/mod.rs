// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Content addressing.
//!
//! Two addresses matter to the migration:
//! - the *self address*, under which the mint service tracks this identity's
//!   submission history, and
//! - the *proof address*, the ledger identifier of a minted pre-coin proof.
//!
//! Both must match the consensus engine's computation bit for bit: Poseidon
//! over BN254 behind the byte sponge, with the byte layout fixed here.

pub mod blake3;
pub mod poseidon;
pub mod sponge;

use byteorder::{BigEndian, WriteBytesExt};

pub use self::blake3::Blake3FieldHasher;
pub use self::poseidon::PoseidonFieldHasher;
pub use sponge::{hash_bytes, FieldElement, FieldHasher};

use crate::error::KernelResult;
use crate::types::{Address, PreCoinProof};

/// Derivation context of [`default_token_domain`].
const TOKEN_DOMAIN_CONTEXT: &str = "predusk 2024-06 token application address";

/// Domain tag prefixed to every proof address preimage unless the host
/// supplies the network's own.
pub fn default_token_domain() -> [u8; 32] {
    ::blake3::derive_key(TOKEN_DOMAIN_CONTEXT, b"")
}

/// Byte string hashed into a proof address.
///
/// ```text
/// token_domain || amount || index (u32 BE) || index_proof || commitment
///   || proof || parallelism (u32 BE) || difficulty (u32 BE) || 0u32
///   || owner implicit address
/// ```
pub fn proof_address_preimage(token_domain: &[u8], proof: &PreCoinProof) -> Vec<u8> {
    let owner = proof.owner.implicit_address();
    let mut eval = Vec::with_capacity(
        token_domain.len()
            + proof.amount.len()
            + proof.index_proof.len()
            + proof.commitment.len()
            + proof.proof.len()
            + owner.len()
            + 16,
    );
    eval.extend_from_slice(token_domain);
    eval.extend_from_slice(&proof.amount);
    // Writes into a Vec cannot fail.
    let _ = eval.write_u32::<BigEndian>(proof.index);
    eval.extend_from_slice(&proof.index_proof);
    eval.extend_from_slice(&proof.commitment);
    eval.extend_from_slice(&proof.proof);
    let _ = eval.write_u32::<BigEndian>(proof.parallelism);
    let _ = eval.write_u32::<BigEndian>(proof.difficulty);
    let _ = eval.write_u32::<BigEndian>(0);
    eval.extend_from_slice(owner);
    eval
}

/// Computes self and proof addresses with a fixed hasher and token domain.
pub struct AddressDeriver {
    hasher: Box<dyn FieldHasher>,
    token_domain: [u8; 32],
}

impl AddressDeriver {
    pub fn new(hasher: Box<dyn FieldHasher>, token_domain: [u8; 32]) -> Self {
        Self { hasher, token_domain }
    }

    pub fn token_domain(&self) -> &[u8; 32] {
        &self.token_domain
    }

    /// Address of this node's own submission history, from its raw peer identity.
    pub fn self_address(&self, identity: &[u8]) -> KernelResult<Address> {
        hash_bytes(&self.hasher, identity).map(Address)
    }

    /// Canonical ledger address of a pre-coin proof.
    pub fn proof_address(&self, proof: &PreCoinProof) -> KernelResult<Address> {
        let eval = proof_address_preimage(&self.token_domain, proof);
        hash_bytes(&self.hasher, &eval).map(Address)
    }
}

impl Default for AddressDeriver {
    fn default() -> Self {
        Self::new(Box::new(PoseidonFieldHasher::new()), default_token_domain())
    }
}

impl core::fmt::Debug for AddressDeriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AddressDeriver")
            .field("token_domain", &hex::encode(self.token_domain))
            .finish_non_exhaustive()
    }
}
