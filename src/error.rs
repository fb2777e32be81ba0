//! Error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The field hasher was handed a frame it cannot hash.
    #[error("invalid hash input length: {0}")]
    InvalidHashInput(usize),
    /// A batch already holds the maximum number of proofs.
    #[error("batch capacity exceeded ({0} proofs)")]
    BatchFull(usize),
    /// Proofs must enter a batch in strictly decreasing increment order.
    #[error("increment {got} out of order, previous was {previous}")]
    OutOfOrder { previous: u32, got: u32 },
    /// A framed entry ended before its declared length.
    #[error("truncated frame: needed {needed} bytes, had {available}")]
    Truncated { needed: usize, available: usize },
    /// A framed entry carried bytes past its declared end.
    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),
    /// A frame input is not a canonical field element.
    #[error("invalid field element: {0}")]
    InvalidFieldElement(String),
    /// A batch with no proofs cannot be signed or submitted.
    #[error("batch holds no proofs")]
    EmptyBatch,
    /// Hex or length mismatch when parsing an address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;
