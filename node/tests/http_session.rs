mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::*;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use predusk_kernel::{Address, AddressDeriver};
use predusk_node::api::{
    MintCoinRequest, MintCoinResponse, MintStatusRequest, MintStatusResponse, PeerInfoResponse, SignaturePayload,
};
use predusk_node::channel::{ChannelDialer, MintSession};
use predusk_node::errors::ChannelError;
use predusk_node::network::HttpDialer;
use predusk_node::signer::MessageSigner;
use predusk_node::store::FileProofStore;
use predusk_node::worker::{MigrationOutcome, MigrationWorker, WorkerDeps, WorkerSettings};
use predusk_persistence::fixtures::generate_proof_history;
use tempfile::tempdir;

#[derive(Default)]
struct StubBeacon {
    batches: Mutex<Vec<ReceivedBatch>>,
    status_requests: Mutex<Vec<Address>>,
}

type Shared = Arc<StubBeacon>;

async fn peer_info() -> Json<PeerInfoResponse> {
    Json(PeerInfoResponse { peer_id: beacon_peer().to_hex() })
}

async fn status(State(s): State<Shared>, Json(req): Json<MintStatusRequest>) -> Json<MintStatusResponse> {
    s.status_requests.lock().unwrap().push(req.owner);
    Json(MintStatusResponse { address: Address([0x11; 32]), increment: 6 })
}

async fn mint(
    State(s): State<Shared>,
    Json(req): Json<MintCoinRequest>,
) -> Result<Json<MintCoinResponse>, StatusCode> {
    let batch = parse_batch(&req);
    let key_bytes: [u8; 32] = batch.public_key.clone().try_into().map_err(|_| StatusCode::BAD_REQUEST)?;
    let key = VerifyingKey::from_bytes(&key_bytes).map_err(|_| StatusCode::BAD_REQUEST)?;
    let sig = Signature::from_slice(&batch.signature).map_err(|_| StatusCode::BAD_REQUEST)?;
    key.verify(&batch.signed_payload(), &sig).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let mut batches = s.batches.lock().unwrap();
    batches.push(batch);
    Ok(Json(MintCoinResponse { address: Address([0xb0 + batches.len() as u8; 32]) }))
}

async fn spawn_beacon() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/v1/peer", get(peer_info))
        .route("/v1/pre-midnight/status", post(status))
        .route("/v1/pre-midnight/mint", post(mint))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    init_tracing();
    let (url, beacon) = spawn_beacon().await;
    let dir = tempdir().unwrap();

    let signer = node_signer();
    let identity = signer.peer_id();
    generate_proof_history(dir.path(), identity.as_bytes(), 6).unwrap();

    let deriver = Arc::new(AddressDeriver::default());
    let owner = deriver.self_address(identity.as_bytes()).unwrap();

    let deps = WorkerDeps {
        signer: signer.clone(),
        deriver,
        consensus: Arc::new(FakeConsensus::ready()),
        proofs: Arc::new(FileProofStore::new(dir.path())),
        ownership: Arc::new(MemoryOwnership::default()),
        dialer: Arc::new(HttpDialer::new(&url, Duration::from_secs(5), 1024 * 1024).unwrap()),
    };
    let settings = WorkerSettings { beacon: beacon_peer(), retry_interval: Duration::from_millis(10) };

    let outcome = MigrationWorker::new(deps, settings).run().await.unwrap();
    assert_eq!(outcome, MigrationOutcome::Completed { batches: 1, proofs: 6 });

    assert_eq!(*beacon.status_requests.lock().unwrap(), vec![owner]);
    let batches = beacon.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].resume, Address([0x11; 32]));
    assert_eq!(batches[0].increments, vec![5, 4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn test_wrong_peer_is_rejected() {
    let (url, _beacon) = spawn_beacon().await;
    let dialer = HttpDialer::new(&url, Duration::from_secs(5), 1024).unwrap();

    let impostor = node_signer().peer_id();
    let err = dialer.open(&impostor).await.err().unwrap();
    assert!(matches!(err, ChannelError::Unauthenticated { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_oversized_request_is_not_sent() {
    let (url, beacon) = spawn_beacon().await;
    let dialer = HttpDialer::new(&url, Duration::from_secs(5), 256).unwrap();
    let mut session = dialer.open(&beacon_peer()).await.unwrap();

    let request = MintCoinRequest {
        proofs: vec![vec![0u8; 512]],
        signature: SignaturePayload { public_key: vec![0; 32], signature: vec![0; 64] },
    };
    let err = session.handle_mint(&request).await.unwrap_err();
    assert!(matches!(err, ChannelError::MessageTooLarge { limit: 256, .. }), "got {err:?}");
    assert!(beacon.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_session_refuses_calls() {
    let (url, beacon) = spawn_beacon().await;
    let dialer = HttpDialer::new(&url, Duration::from_secs(5), 1024).unwrap();
    let mut session = dialer.open(&beacon_peer()).await.unwrap();
    session.close();

    let err = session.get_status(&MintStatusRequest { owner: Address::ZERO }).await.unwrap_err();
    assert!(matches!(err, ChannelError::Unavailable(_)), "got {err:?}");
    assert!(beacon.status_requests.lock().unwrap().is_empty());
}
