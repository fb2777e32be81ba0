//! Proof records.

use serde::{Deserialize, Serialize};

/// One increment of the legacy time-chain, as held by the local proof store.
///
/// Immutable once written. The worker only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTimeProof {
    pub increment: u32,
    /// Degree of parallel work used to produce the proof.
    pub parallelism: u32,
    /// Challenge.
    #[serde(with = "hex")]
    pub input: Vec<u8>,
    /// Response.
    #[serde(with = "hex")]
    pub output: Vec<u8>,
}

/// Reference to the account owning a pre-coin proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AccountRef {
    Implicit {
        #[serde(with = "hex")]
        address: Vec<u8>,
    },
    Original {
        #[serde(with = "hex")]
        address: Vec<u8>,
    },
}

impl AccountRef {
    /// Address bytes contributed to a proof address.
    ///
    /// Only implicit accounts contribute; every other reference contributes nothing.
    pub fn implicit_address(&self) -> &[u8] {
        match self {
            AccountRef::Implicit { address } => address,
            AccountRef::Original { .. } => &[],
        }
    }
}

/// A minted proof as recorded on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreCoinProof {
    #[serde(with = "hex")]
    pub amount: Vec<u8>,
    pub index: u32,
    #[serde(with = "hex")]
    pub index_proof: Vec<u8>,
    #[serde(with = "hex")]
    pub commitment: Vec<u8>,
    #[serde(with = "hex")]
    pub proof: Vec<u8>,
    pub parallelism: u32,
    pub difficulty: u32,
    pub owner: AccountRef,
}
