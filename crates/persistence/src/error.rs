use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid magic bytes in header")]
    InvalidMagic,
    #[error("Unsupported log version {0}")]
    UnsupportedVersion(u32),
    #[error("Checksum mismatch at increment {increment}: expected {expected}, found {found}")]
    ChecksumMismatch {
        increment: u32,
        expected: u64,
        found: u64,
    },
    #[error("Increment {0} already present in log")]
    DuplicateIncrement(u32),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<predusk_kernel::KernelError> for PersistenceError {
    fn from(e: predusk_kernel::KernelError) -> Self {
        PersistenceError::InvalidFormat(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
