// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity key material.

use std::path::Path;

use ed25519_dalek::{Signer, SigningKey};

use crate::errors::WorkerError;
use crate::identity::PeerId;

/// Signs batches on behalf of this node's identity.
///
/// `peer_id` must be derived from the same key that signs, with
/// [`PeerId::from_public_key`] for its key type.
pub trait MessageSigner: Send + Sync {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WorkerError>;
    fn public_key(&self) -> Vec<u8>;
    fn peer_id(&self) -> PeerId;
}

pub struct Ed25519Signer {
    key: SigningKey,
}

impl Ed25519Signer {
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self { key: SigningKey::from_bytes(seed) }
    }

    /// Loads a hex-encoded 32-byte seed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WorkerError::Config(format!("{}: {}", path.display(), e)))?;
        let seed = hex::decode(raw.trim())
            .map_err(|e| WorkerError::Config(format!("{}: {}", path.display(), e)))?;
        let seed: [u8; 32] = seed.as_slice().try_into().map_err(|_| {
            WorkerError::Config(format!("{}: expected a 32-byte seed", path.display()))
        })?;
        Ok(Self::from_seed(&seed))
    }

    pub fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.key.verifying_key()
    }
}

impl MessageSigner for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WorkerError> {
        self.key
            .try_sign(message)
            .map(|sig| sig.to_bytes().to_vec())
            .map_err(|e| WorkerError::Signing(e.to_string()))
    }

    fn public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_bytes().to_vec()
    }

    fn peer_id(&self) -> PeerId {
        PeerId::from_ed25519(self.key.verifying_key().as_bytes())
    }
}
