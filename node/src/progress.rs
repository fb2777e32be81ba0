// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use predusk_kernel::Address;
use serde::Serialize;
use tokio::sync::watch;

use crate::gate::GateState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Starting,
    Gate(GateState),
    AcquiringSession,
    ResolvingResume,
    Submitting,
    WaitingToRetry,
    Completed,
    Failed,
}

/// Snapshot of the worker's progress, published for the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationProgress {
    pub phase: Phase,
    pub next_increment: Option<u32>,
    pub resume_token: Address,
    pub batches_submitted: u64,
    pub proofs_submitted: u64,
}

impl Default for MigrationProgress {
    fn default() -> Self {
        Self {
            phase: Phase::Starting,
            next_increment: None,
            resume_token: Address::ZERO,
            batches_submitted: 0,
            proofs_submitted: 0,
        }
    }
}

/// Write side of the progress channel.
#[derive(Debug)]
pub struct ProgressReporter {
    tx: watch::Sender<MigrationProgress>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MigrationProgress::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<MigrationProgress> {
        self.tx.subscribe()
    }

    pub fn phase(&self, phase: Phase) {
        self.tx.send_modify(|p| p.phase = phase);
    }

    pub fn update(&self, f: impl FnOnce(&mut MigrationProgress)) {
        self.tx.send_modify(f);
    }

    pub fn current(&self) -> MigrationProgress {
        self.tx.borrow().clone()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
