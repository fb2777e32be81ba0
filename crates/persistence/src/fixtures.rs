use crate::error::Result;
use crate::proof_log::{log_path_for, ProofLog};
use predusk_kernel::DataTimeProof;

use std::fs;
use std::path::{Path, PathBuf};

/// Deterministic proof for `increment`. Input and output sizes vary with the
/// increment so neighbouring frames differ in length.
pub fn sample_proof(increment: u32) -> DataTimeProof {
    let seed = increment.to_be_bytes();
    let input: Vec<u8> = seed.iter().cycle().take(8 + (increment % 5) as usize).copied().collect();
    let output: Vec<u8> = input.iter().rev().map(|b| b ^ 0x5a).chain([0xff]).collect();
    DataTimeProof {
        increment,
        parallelism: 1 + increment % 4,
        input,
        output,
    }
}

/// Writes `count` proofs (increments `0..count`) for `identity` under `dir`.
pub fn generate_proof_history(dir: &Path, identity: &[u8], count: u32) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = log_path_for(dir, identity);
    let mut log = ProofLog::open(&path)?;
    for i in 0..count {
        log.append(&sample_proof(i))?;
    }

    Ok(path)
}
