// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants.

/// Length in bytes of every content address and resume token.
pub const ADDRESS_LEN: usize = 32;

/// First entry of every batch. Identifies the batch as legacy proof history.
pub const BATCH_TAG: &[u8] = b"pre-dusk";

/// Prefix of the signed payload of a batch.
pub const SIGNING_TAG: &[u8] = b"mint";

/// Maximum number of proof entries carried by a single batch.
pub const MAX_BATCH_PROOFS: usize = 200;

/// Bytes absorbed per sponge input. 31 bytes always fit below the field modulus.
pub const SPONGE_CHUNK: usize = 31;

/// Number of inputs hashed together by one sponge frame.
pub const SPONGE_FRAME: usize = 16;
