// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use predusk_kernel::address::{default_token_domain, AddressDeriver, PoseidonFieldHasher};
use serde::{Deserialize, Serialize};

use crate::errors::WorkerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Directory of per-identity proof logs.
    pub proof_store_dir: PathBuf,
    /// Hex-encoded Ed25519 seed of this node's identity.
    pub signing_key_path: PathBuf,
    /// Hex-encoded Ed25519 public key of the genesis beacon.
    pub beacon_public_key: String,
    pub beacon_url: String,
    pub node_rpc_url: String,
    pub retry_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Upper bound on request and response bodies exchanged with the beacon.
    pub max_message_bytes: usize,
    pub status_bind_addr: Option<SocketAddr>,
    /// Hex-encoded 32-byte token domain for proof addresses.
    pub token_domain: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            proof_store_dir: PathBuf::from("./data/proofs"),
            signing_key_path: PathBuf::from("./data/node.key"),
            beacon_public_key: String::new(),
            beacon_url: "http://127.0.0.1:8340".to_string(),
            node_rpc_url: "http://127.0.0.1:8338".to_string(),
            retry_interval_secs: 10,
            request_timeout_secs: 30,
            max_message_bytes: 1024 * 1024,
            status_bind_addr: None,
            token_domain: None,
        }
    }
}

impl WorkerConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkerError> {
        let path = path.as_ref();
        let raw = std::fs::read(path)
            .map_err(|e| WorkerError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_slice(&raw)
            .map_err(|e| WorkerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn address_deriver(&self) -> Result<AddressDeriver, WorkerError> {
        let domain = match &self.token_domain {
            None => default_token_domain(),
            Some(h) => {
                let raw = hex::decode(h).map_err(|e| WorkerError::Config(format!("token_domain: {}", e)))?;
                raw.try_into()
                    .map_err(|_| WorkerError::Config("token_domain must be 32 bytes".to_string()))?
            }
        };
        Ok(AddressDeriver::new(Box::new(PoseidonFieldHasher::new()), domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: WorkerConfig = serde_json::from_str(r#"{"beacon_url": "http://beacon:1"}"#).unwrap();
        assert_eq!(cfg.beacon_url, "http://beacon:1");
        assert_eq!(cfg.retry_interval(), Duration::from_secs(10));
        assert_eq!(cfg.max_message_bytes, 1 << 20);
    }

    #[test]
    fn test_token_domain_validation() {
        let mut cfg = WorkerConfig::default();
        cfg.token_domain = Some("abcd".to_string());
        assert!(matches!(cfg.address_deriver(), Err(WorkerError::Config(_))));

        cfg.token_domain = Some(hex::encode([7u8; 32]));
        assert_eq!(cfg.address_deriver().unwrap().token_domain(), &[7u8; 32]);
    }
}
