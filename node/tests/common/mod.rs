#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use predusk_kernel::config::{BATCH_TAG, SIGNING_TAG};
use predusk_kernel::frame::decode_proof_entry;
use predusk_kernel::{AccountRef, Address, AddressDeriver, DataTimeProof, PreCoinProof};
use predusk_node::api::{MintCoinRequest, MintCoinResponse, MintStatusRequest, MintStatusResponse};
use predusk_node::channel::{ChannelDialer, MintSession};
use predusk_node::consensus::{ConsensusView, EngineState};
use predusk_node::errors::{ChannelError, StoreError};
use predusk_node::identity::PeerId;
use predusk_node::signer::{Ed25519Signer, MessageSigner};
use predusk_node::store::{OwnershipStore, ProofStore};
use predusk_node::worker::{MigrationWorker, WorkerDeps, WorkerSettings};
use predusk_persistence::fixtures::sample_proof;

pub const NODE_SEED: [u8; 32] = [0x42; 32];
pub const BEACON_SEED: [u8; 32] = [0x07; 32];
pub const RETRY: Duration = Duration::from_secs(10);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("predusk_node=debug")
        .with_test_writer()
        .try_init();
}

pub fn beacon_peer() -> PeerId {
    Ed25519Signer::from_seed(&BEACON_SEED).peer_id()
}

// ---------------------------------------------------------------------------
// Consensus

#[derive(Default)]
pub struct FakeConsensus {
    /// Polls answered with `Starting` before reporting `Collecting`.
    pub not_ready_polls: AtomicUsize,
    /// Polls answered with no prover tries before reporting one.
    pub empty_trie_polls: AtomicUsize,
    pub state_calls: AtomicUsize,
    pub trie_calls: AtomicUsize,
}

impl FakeConsensus {
    pub fn ready() -> Self {
        Self::default()
    }

    pub fn slow(not_ready: usize, empty_tries: usize) -> Self {
        let c = Self::default();
        c.not_ready_polls.store(not_ready, Ordering::SeqCst);
        c.empty_trie_polls.store(empty_tries, Ordering::SeqCst);
        c
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl ConsensusView for FakeConsensus {
    async fn lifecycle_state(&self) -> Result<EngineState, StoreError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.not_ready_polls) {
            Ok(EngineState::Starting)
        } else {
            Ok(EngineState::Collecting)
        }
    }

    async fn prover_tries(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.trie_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.empty_trie_polls) {
            Ok(vec![])
        } else {
            Ok(vec![vec![0xaa; 32]])
        }
    }
}

// ---------------------------------------------------------------------------
// Stores

pub struct MemoryProofStore {
    identity: Vec<u8>,
    proofs: HashMap<u32, DataTimeProof>,
    pub reads: Mutex<Vec<u32>>,
}

impl MemoryProofStore {
    /// Proofs `0..=latest` for `identity`, minus `missing`.
    pub fn with_history(identity: &PeerId, latest: u32, missing: &[u32]) -> Self {
        let proofs = (0..=latest)
            .filter(|i| !missing.contains(i))
            .map(|i| (i, sample_proof(i)))
            .collect();
        Self { identity: identity.as_bytes().to_vec(), proofs, reads: Mutex::new(Vec::new()) }
    }

    pub fn empty(identity: &PeerId) -> Self {
        Self { identity: identity.as_bytes().to_vec(), proofs: HashMap::new(), reads: Mutex::new(Vec::new()) }
    }
}

impl ProofStore for MemoryProofStore {
    fn latest_proof(&self, identity: &[u8]) -> Result<DataTimeProof, StoreError> {
        if identity != self.identity.as_slice() {
            return Err(StoreError::NotFound);
        }
        self.proofs
            .keys()
            .max()
            .and_then(|i| self.proofs.get(i).cloned())
            .ok_or(StoreError::NotFound)
    }

    fn proof_at(&self, identity: &[u8], increment: u32) -> Result<DataTimeProof, StoreError> {
        self.reads.lock().unwrap().push(increment);
        if identity != self.identity.as_slice() {
            return Err(StoreError::NotFound);
        }
        self.proofs.get(&increment).cloned().ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryOwnership {
    pub records: Vec<PreCoinProof>,
    pub error: Option<StoreError>,
    pub queried: Mutex<Vec<Address>>,
}

impl MemoryOwnership {
    pub fn minted() -> Self {
        Self {
            records: vec![PreCoinProof {
                amount: vec![1],
                index: 0,
                index_proof: vec![],
                commitment: vec![],
                proof: vec![],
                parallelism: 1,
                difficulty: 1,
                owner: AccountRef::Implicit { address: vec![0; 32] },
            }],
            ..Self::default()
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self { error: Some(error), ..Self::default() }
    }
}

#[async_trait]
impl OwnershipStore for MemoryOwnership {
    async fn pre_coin_proofs_for_owner(&self, owner: &Address) -> Result<Vec<PreCoinProof>, StoreError> {
        self.queried.lock().unwrap().push(*owner);
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        if self.records.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(self.records.clone())
    }
}

// ---------------------------------------------------------------------------
// Beacon

/// A batch as the beacon received it.
#[derive(Debug, Clone)]
pub struct ReceivedBatch {
    pub resume: Address,
    pub increments: Vec<u32>,
    pub entries: Vec<Vec<u8>>,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

impl ReceivedBatch {
    pub fn signed_payload(&self) -> Vec<u8> {
        let mut payload = SIGNING_TAG.to_vec();
        for e in &self.entries {
            payload.extend_from_slice(e);
        }
        payload
    }
}

#[derive(Default)]
pub struct BeaconState {
    pub status: Option<MintStatusResponse>,
    pub fail_opens: usize,
    pub fail_status: usize,
    pub fail_mints: usize,
    pub opens: usize,
    pub closes: usize,
    pub status_calls: usize,
    pub mint_attempts: usize,
    pub batches: Vec<ReceivedBatch>,
    /// Resume tokens handed out, in order.
    pub issued: Vec<Address>,
}

impl BeaconState {
    pub fn new(status_address: Address, status_increment: u32) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            status: Some(MintStatusResponse { address: status_address, increment: status_increment }),
            ..Self::default()
        }))
    }
}

pub fn parse_batch(request: &MintCoinRequest) -> ReceivedBatch {
    assert!(request.proofs.len() >= 2, "batch without tag and resume token");
    assert_eq!(request.proofs[0], BATCH_TAG.to_vec());
    let resume = Address::from_slice(&request.proofs[1]).unwrap();
    let increments = request.proofs[2..]
        .iter()
        .map(|e| decode_proof_entry(e).unwrap().increment)
        .collect();
    ReceivedBatch {
        resume,
        increments,
        entries: request.proofs.clone(),
        public_key: request.signature.public_key.clone(),
        signature: request.signature.signature.clone(),
    }
}

pub struct FakeDialer {
    pub state: Arc<Mutex<BeaconState>>,
}

#[async_trait]
impl ChannelDialer for FakeDialer {
    async fn open(&self, peer: &PeerId) -> Result<Box<dyn MintSession>, ChannelError> {
        assert_eq!(peer, &beacon_peer());
        let mut state = self.state.lock().unwrap();
        if state.fail_opens > 0 {
            state.fail_opens -= 1;
            return Err(ChannelError::Unavailable("connection refused".to_string()));
        }
        state.opens += 1;
        Ok(Box::new(FakeSession { state: self.state.clone() }))
    }
}

pub struct FakeSession {
    state: Arc<Mutex<BeaconState>>,
}

#[async_trait]
impl MintSession for FakeSession {
    async fn get_status(&mut self, _request: &MintStatusRequest) -> Result<MintStatusResponse, ChannelError> {
        let mut state = self.state.lock().unwrap();
        state.status_calls += 1;
        if state.fail_status > 0 {
            state.fail_status -= 1;
            return Err(ChannelError::Rpc("deadline exceeded".to_string()));
        }
        state.status.clone().ok_or_else(|| ChannelError::InvalidResponse("empty".to_string()))
    }

    async fn handle_mint(&mut self, request: &MintCoinRequest) -> Result<MintCoinResponse, ChannelError> {
        let mut state = self.state.lock().unwrap();
        state.mint_attempts += 1;
        let batch = parse_batch(request);
        if state.fail_mints > 0 {
            state.fail_mints -= 1;
            state.batches.push(batch);
            return Err(ChannelError::Rpc("unavailable".to_string()));
        }
        state.batches.push(batch);
        let token = Address([0xa0 + state.issued.len() as u8; 32]);
        state.issued.push(token);
        Ok(MintCoinResponse { address: token })
    }

    fn close(&mut self) {
        self.state.lock().unwrap().closes += 1;
    }
}

// ---------------------------------------------------------------------------
// Harness

pub struct Harness {
    pub worker: MigrationWorker,
    pub beacon: Arc<Mutex<BeaconState>>,
    pub proofs: Arc<MemoryProofStore>,
    pub consensus: Arc<FakeConsensus>,
    pub ownership: Arc<MemoryOwnership>,
    pub signer: Arc<Ed25519Signer>,
}

pub fn node_signer() -> Arc<Ed25519Signer> {
    Arc::new(Ed25519Signer::from_seed(&NODE_SEED))
}

pub fn harness(
    proofs: MemoryProofStore,
    consensus: FakeConsensus,
    ownership: MemoryOwnership,
    beacon: Arc<Mutex<BeaconState>>,
) -> Harness {
    let signer = node_signer();
    let proofs = Arc::new(proofs);
    let consensus = Arc::new(consensus);
    let ownership = Arc::new(ownership);
    let deps = WorkerDeps {
        signer: signer.clone(),
        deriver: Arc::new(AddressDeriver::default()),
        consensus: consensus.clone(),
        proofs: proofs.clone(),
        ownership: ownership.clone(),
        dialer: Arc::new(FakeDialer { state: beacon.clone() }),
    };
    let worker = MigrationWorker::new(deps, WorkerSettings { beacon: beacon_peer(), retry_interval: RETRY });
    Harness { worker, beacon, proofs, consensus, ownership, signer }
}
