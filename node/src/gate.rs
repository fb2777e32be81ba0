// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Decides whether a migration should run at all.
//!
//! ```text
//! ProbingLegacyHistory --not found--> NothingToDo
//!        |
//! WaitingForConsensusReady  (poll until >= Collecting)
//!        |
//! WaitingForProverData      (poll until prover tries appear)
//!        |
//! CheckingAlreadyMinted --records--> NothingToDo
//!        |
//!      Ready
//! ```

use std::time::Duration;

use predusk_kernel::Address;
use serde::Serialize;

use crate::consensus::ConsensusView;
use crate::errors::{StoreError, WorkerError};
use crate::progress::{Phase, ProgressReporter};
use crate::store::{OwnershipStore, ProofStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    ProbingLegacyHistory,
    WaitingForConsensusReady,
    WaitingForProverData,
    CheckingAlreadyMinted,
    Ready,
    NothingToDo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The identity has no legacy proofs.
    NoLegacyProofs,
    /// The ledger already holds minted proofs for the identity.
    AlreadyMinted { records: usize },
    /// Migration may start, walking down from `latest_increment`.
    Ready { latest_increment: u32 },
}

pub struct ReadinessGate<'a> {
    pub identity: &'a [u8],
    pub owner: Address,
    pub proofs: &'a dyn ProofStore,
    pub consensus: &'a dyn ConsensusView,
    pub ownership: &'a dyn OwnershipStore,
    pub poll_interval: Duration,
}

impl<'a> ReadinessGate<'a> {
    pub async fn run(&self, progress: &ProgressReporter) -> Result<GateOutcome, WorkerError> {
        let mut state = GateState::ProbingLegacyHistory;
        let mut latest = 0;
        let mut outcome = GateOutcome::NoLegacyProofs;

        loop {
            progress.phase(Phase::Gate(state));
            state = match state {
                GateState::ProbingLegacyHistory => {
                    tracing::info!("Checking for pre-2.0 proofs");
                    match self.proofs.latest_proof(self.identity) {
                        Ok(proof) => {
                            latest = proof.increment;
                            tracing::info!(latest_increment = latest, "Found pre-2.0 proofs");
                            GateState::WaitingForConsensusReady
                        }
                        Err(StoreError::NotFound) => {
                            tracing::info!("Could not find pre-2.0 proofs");
                            outcome = GateOutcome::NoLegacyProofs;
                            GateState::NothingToDo
                        }
                        Err(e) => return Err(WorkerError::Store(e)),
                    }
                }
                GateState::WaitingForConsensusReady => match self.consensus.lifecycle_state().await {
                    Ok(s) if s.is_operational() => GateState::WaitingForProverData,
                    Ok(s) => {
                        tracing::info!(state = ?s, "Waiting for node to finish starting");
                        tokio::time::sleep(self.poll_interval).await;
                        GateState::WaitingForConsensusReady
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not read consensus state, waiting...");
                        tokio::time::sleep(self.poll_interval).await;
                        GateState::WaitingForConsensusReady
                    }
                },
                GateState::WaitingForProverData => match self.consensus.prover_tries().await {
                    Ok(tries) if !tries.is_empty() => GateState::CheckingAlreadyMinted,
                    Ok(_) => {
                        tracing::info!("Waiting for more frame info to appear");
                        tokio::time::sleep(self.poll_interval).await;
                        GateState::WaitingForProverData
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not read prover tries, waiting...");
                        tokio::time::sleep(self.poll_interval).await;
                        GateState::WaitingForProverData
                    }
                },
                GateState::CheckingAlreadyMinted => {
                    match self.ownership.pre_coin_proofs_for_owner(&self.owner).await {
                        Ok(records) if !records.is_empty() => {
                            tracing::info!(records = records.len(), "Already completed pre-midnight mint");
                            outcome = GateOutcome::AlreadyMinted { records: records.len() };
                            GateState::NothingToDo
                        }
                        Ok(_) | Err(StoreError::NotFound) => GateState::Ready,
                        Err(e) => {
                            tracing::error!(error = %e, "Error while fetching pre-coin proofs");
                            return Err(WorkerError::Ownership(e));
                        }
                    }
                }
                GateState::Ready => return Ok(GateOutcome::Ready { latest_increment: latest }),
                GateState::NothingToDo => return Ok(outcome),
            };
        }
    }
}
