// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Lifecycle of the consensus engine, in start-up order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Stopped,
    Starting,
    Loading,
    Collecting,
    Proving,
    Publishing,
    Verifying,
    Stopping,
}

impl EngineState {
    /// True once the engine has reached or passed `Collecting`.
    pub fn is_operational(self) -> bool {
        self >= EngineState::Collecting
    }
}

/// Read-only view of the consensus engine.
#[async_trait]
pub trait ConsensusView: Send + Sync {
    async fn lifecycle_state(&self) -> Result<EngineState, StoreError>;

    /// Roots of the engine's current frame prover tries. Empty until the
    /// engine has ingested enough history.
    async fn prover_tries(&self) -> Result<Vec<Vec<u8>>, StoreError>;
}
