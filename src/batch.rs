// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Batch accumulation.
//!
//! A batch is an ordered list of entries:
//!
//! ```text
//! [ BATCH_TAG, resume_token, proof(n), proof(n-1), ..., proof(n-k) ]
//! ```
//!
//! Proofs enter in strictly decreasing increment order and at most
//! [`MAX_BATCH_PROOFS`] fit. The signed payload is `SIGNING_TAG` followed by
//! every entry's bytes in the same order.

use crate::config::{BATCH_TAG, MAX_BATCH_PROOFS, SIGNING_TAG};
use crate::error::{KernelError, KernelResult};
use crate::frame::encode_proof_entry;
use crate::types::{Address, DataTimeProof};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    entries: Vec<Vec<u8>>,
    resume: Address,
    lowest: Option<u32>,
}

impl Batch {
    /// Opens an empty batch carrying `resume` as its second entry.
    pub fn new(resume: Address) -> Self {
        let mut entries = Vec::with_capacity(MAX_BATCH_PROOFS + 2);
        entries.push(BATCH_TAG.to_vec());
        entries.push(resume.0.to_vec());
        Self { entries, resume, lowest: None }
    }

    pub fn resume_token(&self) -> Address {
        self.resume
    }

    /// Number of proof entries, excluding tag and resume token.
    pub fn len(&self) -> usize {
        self.entries.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_BATCH_PROOFS
    }

    /// Lowest increment added so far.
    pub fn lowest_increment(&self) -> Option<u32> {
        self.lowest
    }

    pub fn push(&mut self, proof: &DataTimeProof) -> KernelResult<()> {
        if self.is_full() {
            return Err(KernelError::BatchFull(MAX_BATCH_PROOFS));
        }
        if let Some(previous) = self.lowest {
            if proof.increment >= previous {
                return Err(KernelError::OutOfOrder { previous, got: proof.increment });
            }
        }
        self.entries.push(encode_proof_entry(proof));
        self.lowest = Some(proof.increment);
        Ok(())
    }

    pub fn entries(&self) -> &[Vec<u8>] {
        &self.entries
    }

    /// Bytes handed to the signer. A batch without proofs is never signed.
    pub fn signing_payload(&self) -> KernelResult<Vec<u8>> {
        if self.is_empty() {
            return Err(KernelError::EmptyBatch);
        }
        let size = SIGNING_TAG.len() + self.entries.iter().map(Vec::len).sum::<usize>();
        let mut payload = Vec::with_capacity(size);
        payload.extend_from_slice(SIGNING_TAG);
        for entry in &self.entries {
            payload.extend_from_slice(entry);
        }
        Ok(payload)
    }

    pub fn into_entries(self) -> Vec<Vec<u8>> {
        self.entries
    }
}
