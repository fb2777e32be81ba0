// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod api;
pub mod identity;
pub mod signer;
pub mod consensus;
pub mod store;
pub mod channel;
pub mod network;
pub mod progress;
pub mod gate;
pub mod worker;
pub mod server;
pub mod telemetry;
