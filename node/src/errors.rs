// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use predusk_kernel::KernelError;
use predusk_persistence::PersistenceError;
use thiserror::Error;

/// Result of a query against a local store or the node's RPC.
///
/// `NotFound` is an expected answer that drives state transitions. It is not
/// a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not found")]
    NotFound,
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<PersistenceError> for StoreError {
    fn from(e: PersistenceError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Failures talking to the mint service. All of them are transient: the
/// worker logs, waits and tries again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel unavailable: {0}")]
    Unavailable(String),
    #[error("Peer {got} is not the expected beacon {expected}")]
    Unauthenticated { expected: String, got: String },
    #[error("RPC failed: {0}")]
    Rpc(String),
    #[error("Message of {size} bytes exceeds limit of {limit}")]
    MessageTooLarge { size: usize, limit: usize },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Conditions that end the worker. None of these are retried.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Missing data time proof for peer {peer_id} at increment {increment}")]
    MissingProof { peer_id: String, increment: u32 },
    #[error("Proof store error: {0}")]
    Store(StoreError),
    #[error("Ownership store error: {0}")]
    Ownership(StoreError),
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Invalid genesis beacon key: {0}")]
    GenesisKey(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
