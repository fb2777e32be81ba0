// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use predusk_kernel::{Address, DataTimeProof, PreCoinProof};
use predusk_persistence::{log_path_for, ProofLog};

use crate::errors::StoreError;

/// Local history of legacy proofs, keyed by identity and increment.
pub trait ProofStore: Send + Sync {
    fn latest_proof(&self, identity: &[u8]) -> Result<DataTimeProof, StoreError>;
    fn proof_at(&self, identity: &[u8], increment: u32) -> Result<DataTimeProof, StoreError>;
}

/// Ledger query for proofs already minted to an owner.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    async fn pre_coin_proofs_for_owner(&self, owner: &Address) -> Result<Vec<PreCoinProof>, StoreError>;
}

/// [`ProofStore`] over per-identity proof logs in one directory.
///
/// Logs are opened on first use. An identity without a log has no proofs.
pub struct FileProofStore {
    dir: PathBuf,
    logs: Mutex<HashMap<Vec<u8>, Arc<ProofLog>>>,
}

impl FileProofStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), logs: Mutex::new(HashMap::new()) }
    }

    fn log_for(&self, identity: &[u8]) -> Result<Arc<ProofLog>, StoreError> {
        let mut logs = self
            .logs
            .lock()
            .map_err(|_| StoreError::Backend("proof store lock poisoned".to_string()))?;
        if let Some(log) = logs.get(identity) {
            return Ok(log.clone());
        }

        let path = log_path_for(&self.dir, identity);
        if !path.exists() {
            return Err(StoreError::NotFound);
        }
        let log = Arc::new(ProofLog::open(&path)?);
        tracing::debug!("Opened proof log {:?} with {} proofs", path, log.len());
        logs.insert(identity.to_vec(), log.clone());
        Ok(log)
    }
}

impl ProofStore for FileProofStore {
    fn latest_proof(&self, identity: &[u8]) -> Result<DataTimeProof, StoreError> {
        self.log_for(identity)?.latest()?.ok_or(StoreError::NotFound)
    }

    fn proof_at(&self, identity: &[u8], increment: u32) -> Result<DataTimeProof, StoreError> {
        self.log_for(identity)?.get(increment)?.ok_or(StoreError::NotFound)
    }
}
