// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use predusk_node::config::WorkerConfig;
use predusk_node::identity::beacon_peer_id;
use predusk_node::network::{HttpDialer, NodeRpcClient};
use predusk_node::signer::{Ed25519Signer, MessageSigner};
use predusk_node::store::FileProofStore;
use predusk_node::worker::{MigrationWorker, WorkerDeps, WorkerSettings};
use predusk_node::{server, telemetry};

#[derive(Parser)]
#[command(name = "predusk-node")]
#[command(about = "Migrates pre-2.0 data time proofs into the mint service", long_about = None)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory holding the proof logs
    #[arg(long)]
    proof_dir: Option<PathBuf>,

    /// File with the hex-encoded Ed25519 seed of this node
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Hex-encoded public key of the genesis beacon
    #[arg(long)]
    beacon_key: Option<String>,

    #[arg(long)]
    beacon_url: Option<String>,

    #[arg(long)]
    node_rpc: Option<String>,

    /// Serve /v1/migration/status and /metrics on this address
    #[arg(long)]
    status_addr: Option<SocketAddr>,
}

impl Cli {
    fn apply(self, cfg: &mut WorkerConfig) {
        if let Some(v) = self.proof_dir { cfg.proof_store_dir = v; }
        if let Some(v) = self.key_file { cfg.signing_key_path = v; }
        if let Some(v) = self.beacon_key { cfg.beacon_public_key = v; }
        if let Some(v) = self.beacon_url { cfg.beacon_url = v; }
        if let Some(v) = self.node_rpc { cfg.node_rpc_url = v; }
        if let Some(v) = self.status_addr { cfg.status_bind_addr = Some(v); }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => WorkerConfig::load(path)?,
        None => WorkerConfig::default(),
    };
    cli.apply(&mut cfg);

    tracing::info!("Initializing pre-midnight proof worker with config: {:?}", cfg);

    let signer = Arc::new(Ed25519Signer::load(&cfg.signing_key_path)?);
    let beacon = beacon_peer_id(&cfg.beacon_public_key)?;
    tracing::info!(peer_id = %signer.peer_id(), beacon = %beacon, "Loaded identities");

    let rpc = Arc::new(NodeRpcClient::new(&cfg.node_rpc_url, cfg.request_timeout())?);
    let deps = WorkerDeps {
        signer,
        deriver: Arc::new(cfg.address_deriver()?),
        consensus: rpc.clone(),
        proofs: Arc::new(FileProofStore::new(&cfg.proof_store_dir)),
        ownership: rpc,
        dialer: Arc::new(HttpDialer::new(&cfg.beacon_url, cfg.request_timeout(), cfg.max_message_bytes)?),
    };
    let worker = MigrationWorker::new(
        deps,
        WorkerSettings { beacon, retry_interval: cfg.retry_interval() },
    );

    if let Some(addr) = cfg.status_bind_addr {
        let progress = worker.subscribe();
        tokio::spawn(async move {
            if let Err(e) = server::serve(addr, progress).await {
                tracing::error!("Status server failed: {}", e);
            }
        });
    }

    let outcome = worker.spawn().await??;
    tracing::info!(?outcome, "Done");
    Ok(())
}
