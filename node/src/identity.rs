// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Peer identities.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};

use crate::errors::WorkerError;

/// Key types of the protobuf `PublicKey` message peer ids are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Ed25519 = 1,
    Ed448 = 4,
}

impl KeyType {
    pub fn key_len(self) -> usize {
        match self {
            KeyType::Ed25519 => 32,
            KeyType::Ed448 => 57,
        }
    }
}

/// Encoded keys up to this size are inlined into the peer id.
const MAX_INLINE_KEY_LEN: usize = 42;
const MULTIHASH_IDENTITY: u8 = 0x00;
const MULTIHASH_SHA2_256: u8 = 0x12;

fn push_varint(buf: &mut Vec<u8>, mut n: usize) {
    while n >= 0x80 {
        buf.push((n as u8) | 0x80);
        n >>= 7;
    }
    buf.push(n as u8);
}

/// `PublicKey { Type = 1, Data = 2 }` in protobuf wire format.
fn encode_public_key(key_type: KeyType, key: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(key.len() + 4);
    buf.push(0x08);
    push_varint(&mut buf, key_type as usize);
    buf.push(0x12);
    push_varint(&mut buf, key.len());
    buf.extend_from_slice(key);
    buf
}

/// Raw peer id bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PeerId(Vec<u8>);

impl PeerId {
    /// Multihash of the protobuf-encoded public key: the identity hash when the
    /// encoding is at most 42 bytes, sha2-256 otherwise.
    pub fn from_public_key(key_type: KeyType, key: &[u8]) -> Self {
        let encoded = encode_public_key(key_type, key);
        let mut bytes = Vec::with_capacity(encoded.len().max(32) + 2);
        if encoded.len() <= MAX_INLINE_KEY_LEN {
            bytes.push(MULTIHASH_IDENTITY);
            push_varint(&mut bytes, encoded.len());
            bytes.extend_from_slice(&encoded);
        } else {
            bytes.push(MULTIHASH_SHA2_256);
            bytes.push(32);
            bytes.extend_from_slice(&Sha256::digest(&encoded));
        }
        PeerId(bytes)
    }

    pub fn from_ed25519(public_key: &[u8; 32]) -> Self {
        Self::from_public_key(KeyType::Ed25519, public_key)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        PeerId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.to_hex())
    }
}

/// Peer id of the genesis beacon, from its hex-encoded public key.
///
/// The key type follows from its length: 32 bytes is Ed25519, 57 bytes is
/// Ed448. Malformed key material is fatal: without it there is nobody to
/// submit to.
pub fn beacon_peer_id(public_key_hex: &str) -> Result<PeerId, WorkerError> {
    let raw = hex::decode(public_key_hex.trim())
        .map_err(|e| WorkerError::GenesisKey(e.to_string()))?;
    match raw.len() {
        32 => {
            let mut key = [0u8; 32];
            key.copy_from_slice(&raw);
            VerifyingKey::from_bytes(&key).map_err(|e| WorkerError::GenesisKey(e.to_string()))?;
            Ok(PeerId::from_ed25519(&key))
        }
        57 => Ok(PeerId::from_public_key(KeyType::Ed448, &raw)),
        n => Err(WorkerError::GenesisKey(format!("expected 32 or 57 key bytes, got {}", n))),
    }
}
