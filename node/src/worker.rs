// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Pre-2.0 proof migration worker.
//!
//! Walks this identity's legacy proofs from the highest unconfirmed increment
//! down to zero, submitting them to the beacon's mint service in signed
//! batches. Progress lives on the remote side: every restart asks the service
//! where to resume, and every accepted batch returns the next resume token.
//!
//! ```text
//! gate -> acquire session -> (zero token? status) -> batch -> sign -> submit
//!              ^                                                    |
//!              +------------------- accepted / failed --------------+
//! ```

use std::sync::Arc;
use std::time::Duration;

use predusk_kernel::{Address, AddressDeriver, Batch, DataTimeProof, KernelError, ResumeCursor};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{MintCoinRequest, SignaturePayload};
use crate::channel::{self, ChannelDialer, Session};
use crate::consensus::ConsensusView;
use crate::errors::{StoreError, WorkerError};
use crate::gate::{GateOutcome, ReadinessGate};
use crate::identity::PeerId;
use crate::progress::{MigrationProgress, Phase, ProgressReporter};
use crate::signer::MessageSigner;
use crate::store::{OwnershipStore, ProofStore};

/// External collaborators of the worker.
#[derive(Clone)]
pub struct WorkerDeps {
    pub signer: Arc<dyn MessageSigner>,
    pub deriver: Arc<AddressDeriver>,
    pub consensus: Arc<dyn ConsensusView>,
    pub proofs: Arc<dyn ProofStore>,
    pub ownership: Arc<dyn OwnershipStore>,
    pub dialer: Arc<dyn ChannelDialer>,
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Peer id of the genesis beacon hosting the mint service.
    pub beacon: PeerId,
    /// Fixed wait between polls and retries.
    pub retry_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    NoLegacyProofs,
    AlreadyMinted,
    Completed { batches: u64, proofs: u64 },
}

enum Submission {
    Accepted { proofs: usize },
    Failed,
}

pub struct MigrationWorker {
    deps: WorkerDeps,
    settings: WorkerSettings,
    cursor: Option<ResumeCursor>,
    progress: ProgressReporter,
}

impl MigrationWorker {
    pub fn new(deps: WorkerDeps, settings: WorkerSettings) -> Self {
        Self { deps, settings, cursor: None, progress: ProgressReporter::new() }
    }

    /// Starts from a known cursor instead of asking the service for status.
    pub fn with_cursor(mut self, cursor: ResumeCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<MigrationProgress> {
        self.progress.subscribe()
    }

    /// Runs the worker as a background task.
    pub fn spawn(self) -> JoinHandle<Result<MigrationOutcome, WorkerError>> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) -> Result<MigrationOutcome, WorkerError> {
        let result = self.drive().await;
        match &result {
            Ok(outcome) => {
                tracing::info!(?outcome, "Pre-midnight proof worker finished");
                self.progress.phase(Phase::Completed);
            }
            Err(e) => {
                tracing::error!(error = %e, "Pre-midnight proof worker stopped");
                self.progress.phase(Phase::Failed);
            }
        }
        result
    }

    async fn drive(&self) -> Result<MigrationOutcome, WorkerError> {
        let identity = self.deps.signer.peer_id();
        let owner = self.deps.deriver.self_address(identity.as_bytes())?;

        let gate = ReadinessGate {
            identity: identity.as_bytes(),
            owner,
            proofs: self.deps.proofs.as_ref(),
            consensus: self.deps.consensus.as_ref(),
            ownership: self.deps.ownership.as_ref(),
            poll_interval: self.settings.retry_interval,
        };

        let latest = match gate.run(&self.progress).await? {
            GateOutcome::NoLegacyProofs => return Ok(MigrationOutcome::NoLegacyProofs),
            GateOutcome::AlreadyMinted { .. } => return Ok(MigrationOutcome::AlreadyMinted),
            GateOutcome::Ready { latest_increment } => latest_increment,
        };

        let cursor = self.cursor.unwrap_or_else(|| ResumeCursor::fresh(latest));
        self.submit_history(&identity, owner, cursor).await
    }

    async fn submit_history(
        &self,
        identity: &PeerId,
        owner: Address,
        mut cursor: ResumeCursor,
    ) -> Result<MigrationOutcome, WorkerError> {
        let mut batches = 0u64;
        let mut proofs = 0u64;

        loop {
            self.progress.phase(Phase::AcquiringSession);
            let mut session = channel::acquire(
                self.deps.dialer.as_ref(),
                &self.settings.beacon,
                self.settings.retry_interval,
            )
            .await;

            if cursor.needs_status() {
                self.progress.phase(Phase::ResolvingResume);
                match session.get_status(owner).await {
                    Ok(status) => {
                        cursor.apply_status(status.address, status.increment);
                        tracing::info!(
                            remote_increment = status.increment,
                            next_increment = ?cursor.next_increment(),
                            "Resolved mint status"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Got error response, waiting...");
                        session.release();
                        self.wait_to_retry().await;
                        continue;
                    }
                }
            }

            if cursor.is_complete() {
                session.release();
                return Ok(MigrationOutcome::Completed { batches, proofs });
            }

            self.progress.phase(Phase::Submitting);
            match self.submit_next_batch(&mut session, identity, &mut cursor).await? {
                Submission::Accepted { proofs: n } => {
                    batches += 1;
                    proofs += n as u64;
                    self.progress.update(|p| {
                        p.batches_submitted = batches;
                        p.proofs_submitted = proofs;
                        p.next_increment = cursor.next_increment();
                        p.resume_token = cursor.resume_token();
                    });
                    session.release();

                    if cursor.is_complete() {
                        tracing::info!(batches, proofs, "Pre-midnight proofs submitted, returning");
                        return Ok(MigrationOutcome::Completed { batches, proofs });
                    }
                }
                Submission::Failed => {
                    session.release();
                    self.wait_to_retry().await;
                }
            }
        }
    }

    /// Reads, signs and submits the next batch below the cursor.
    ///
    /// A missing proof ends the worker; nothing past it can be submitted.
    async fn submit_next_batch(
        &self,
        session: &mut Session,
        identity: &PeerId,
        cursor: &mut ResumeCursor,
    ) -> Result<Submission, WorkerError> {
        let mut batch = Batch::new(cursor.resume_token());

        for i in cursor.pending() {
            let proof = match self.deps.proofs.proof_at(identity.as_bytes(), i) {
                Ok(proof) => proof,
                Err(StoreError::NotFound) => {
                    tracing::error!(
                        peer_id = %identity,
                        increment = i,
                        "Could not find data time proof for peer and increment, stopping worker"
                    );
                    return Err(WorkerError::MissingProof { peer_id: identity.to_hex(), increment: i });
                }
                Err(e) => return Err(WorkerError::Store(e)),
            };

            // Framed under the increment it was requested at.
            batch.push(&DataTimeProof { increment: i, ..proof })?;
            if batch.is_full() || i == 0 {
                break;
            }
        }

        let payload = batch.signing_payload()?;
        let lowest = batch.lowest_increment().ok_or(KernelError::EmptyBatch)?;
        let size = batch.len();
        tracing::info!(increment = lowest, batch_size = size, "Publishing proof batch");

        let signature = self.deps.signer.sign(&payload)?;
        let request = MintCoinRequest {
            proofs: batch.into_entries(),
            signature: SignaturePayload { public_key: self.deps.signer.public_key(), signature },
        };

        match session.handle_mint(&request).await {
            Ok(resp) => {
                cursor.record_submission(resp.address, lowest);
                metrics::increment_counter!("predusk_batches_submitted_total");
                metrics::counter!("predusk_proofs_submitted_total", size as u64);
                metrics::gauge!("predusk_next_increment", cursor.next_increment().map_or(-1.0, |n| n as f64));
                Ok(Submission::Accepted { proofs: size })
            }
            Err(e) => {
                tracing::error!(error = %e, increment = lowest, "Got error response, waiting...");
                metrics::increment_counter!("predusk_submission_failures_total");
                Ok(Submission::Failed)
            }
        }
    }

    async fn wait_to_retry(&self) {
        self.progress.phase(Phase::WaitingToRetry);
        tokio::time::sleep(self.settings.retry_interval).await;
    }
}
