// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wire types for the beacon's mint service and the local node RPC.
//!
//! Byte fields travel as lowercase hex strings.

use predusk_kernel::{Address, PreCoinProof};
use serde::{Deserialize, Serialize};

use crate::consensus::EngineState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfoResponse {
    pub peer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintStatusRequest {
    pub owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintStatusResponse {
    /// Resume token. Zero when nothing was accepted yet.
    pub address: Address,
    pub increment: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePayload {
    #[serde(with = "hex")]
    pub public_key: Vec<u8>,
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintCoinRequest {
    /// Batch entries: tag, resume token, then framed proofs.
    #[serde(with = "hex_list")]
    pub proofs: Vec<Vec<u8>>,
    pub signature: SignaturePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintCoinResponse {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusStateResponse {
    pub state: EngineState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverTriesResponse {
    #[serde(with = "hex_list")]
    pub tries: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreCoinProofsResponse {
    pub proofs: Vec<PreCoinProof>,
}

pub mod hex_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
