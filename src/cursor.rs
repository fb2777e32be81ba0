// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Submission progress.
//!
//! The mint service is the only durable record of how far a migration got.
//! The cursor mirrors it in memory and is rebuilt from a status query after
//! every restart.

use crate::types::Address;

/// Resume token plus the highest increment not yet confirmed.
///
/// `next_increment == None` means everything down to increment 0 was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeCursor {
    resume: Address,
    next_increment: Option<u32>,
}

impl ResumeCursor {
    /// A cursor with the zero token. The first session must ask for status.
    pub fn fresh(latest_increment: u32) -> Self {
        Self { resume: Address::ZERO, next_increment: Some(latest_increment) }
    }

    /// Carries over a known token, skipping the status query.
    pub fn resumed(resume: Address, next_increment: u32) -> Self {
        Self { resume, next_increment: Some(next_increment) }
    }

    pub fn resume_token(&self) -> Address {
        self.resume
    }

    pub fn next_increment(&self) -> Option<u32> {
        self.next_increment
    }

    pub fn needs_status(&self) -> bool {
        self.resume.is_zero()
    }

    pub fn is_complete(&self) -> bool {
        self.next_increment.is_none()
    }

    /// Adopts a status response.
    ///
    /// A remote increment `n > 0` resumes below it at `n - 1`. Zero resumes at
    /// increment 0, so only the first proof is left to submit.
    pub fn apply_status(&mut self, resume: Address, remote_increment: u32) {
        self.resume = resume;
        self.next_increment = Some(remote_increment.saturating_sub(1));
    }

    /// Records an accepted batch whose lowest increment was `lowest`.
    pub fn record_submission(&mut self, resume: Address, lowest: u32) {
        self.resume = resume;
        self.next_increment = lowest.checked_sub(1);
    }

    /// Increments still to submit, highest first, ending at 0 inclusive.
    pub fn pending(&self) -> Countdown {
        Countdown { next: self.next_increment }
    }
}

/// Strictly decreasing walk over `[0, start]`.
///
/// Yields 0 exactly once and then stops; it never wraps below zero.
#[derive(Debug, Clone)]
pub struct Countdown {
    next: Option<u32>,
}

impl Countdown {
    pub fn starting_at(start: u32) -> Self {
        Self { next: Some(start) }
    }
}

impl Iterator for Countdown {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let current = self.next?;
        self.next = current.checked_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.next.map_or(0, |n| (n as usize).saturating_add(1));
        (n, Some(n))
    }
}

impl ExactSizeIterator for Countdown {}
