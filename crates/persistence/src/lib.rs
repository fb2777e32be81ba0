//! File-backed store of legacy data time proofs.

pub mod error;
pub mod proof_log;
pub mod fixtures;

pub use error::{PersistenceError, Result};
pub use proof_log::{log_path_for, ProofLog};
