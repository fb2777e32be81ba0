// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! predusk-kernel: deterministic core of the pre-2.0 proof migration.
//!
//! Content addressing, wire framing, batch accumulation and the resume cursor.
//! Nothing in here performs I/O.

pub mod config;
pub mod error;
pub mod types;
pub mod address;
pub mod frame;
pub mod batch;
pub mod cursor;

pub use address::{AddressDeriver, Blake3FieldHasher, FieldHasher, PoseidonFieldHasher};
pub use batch::Batch;
pub use cursor::{Countdown, ResumeCursor};
pub use error::{KernelError, KernelResult};
pub use types::{AccountRef, Address, DataTimeProof, PreCoinProof};

#[cfg(test)]
pub mod tests;
