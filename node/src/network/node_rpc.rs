// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use async_trait::async_trait;
use predusk_kernel::{Address, PreCoinProof};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::{ConsensusStateResponse, PreCoinProofsResponse, ProverTriesResponse};
use crate::consensus::{ConsensusView, EngineState};
use crate::errors::StoreError;
use crate::store::OwnershipStore;

/// Consensus and ledger queries against the local node's RPC.
#[derive(Debug, Clone)]
pub struct NodeRpcClient {
    base_url: String,
    client: Client,
}

impl NodeRpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { base_url: url.trim_end_matches('/').to_string(), client })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(StoreError::Backend(format!("{} returned {}", path, resp.status())));
        }

        resp.json().await.map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl ConsensusView for NodeRpcClient {
    async fn lifecycle_state(&self) -> Result<EngineState, StoreError> {
        let resp: ConsensusStateResponse = self.get("/v1/consensus/state").await?;
        Ok(resp.state)
    }

    async fn prover_tries(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        let resp: ProverTriesResponse = self.get("/v1/consensus/prover-tries").await?;
        Ok(resp.tries)
    }
}

#[async_trait]
impl OwnershipStore for NodeRpcClient {
    async fn pre_coin_proofs_for_owner(&self, owner: &Address) -> Result<Vec<PreCoinProof>, StoreError> {
        let resp: PreCoinProofsResponse = self.get(&format!("/v1/coins/pre-coin-proofs/{}", owner)).await?;
        Ok(resp.proofs)
    }
}
