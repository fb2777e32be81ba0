pub mod address;
pub mod proof;

pub use address::Address;
pub use proof::{AccountRef, DataTimeProof, PreCoinProof};
