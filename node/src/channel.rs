// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Point-to-point sessions with the beacon.

use std::time::Duration;

use async_trait::async_trait;
use predusk_kernel::Address;

use crate::api::{MintCoinRequest, MintCoinResponse, MintStatusRequest, MintStatusResponse};
use crate::errors::ChannelError;
use crate::identity::PeerId;

/// An open, authenticated session to the mint service.
#[async_trait]
pub trait MintSession: Send {
    async fn get_status(&mut self, request: &MintStatusRequest) -> Result<MintStatusResponse, ChannelError>;
    async fn handle_mint(&mut self, request: &MintCoinRequest) -> Result<MintCoinResponse, ChannelError>;
    /// Frees whatever the session holds. Called exactly once.
    fn close(&mut self);
}

#[async_trait]
pub trait ChannelDialer: Send + Sync {
    async fn open(&self, peer: &PeerId) -> Result<Box<dyn MintSession>, ChannelError>;
}

/// Owns a [`MintSession`] and closes it when released or dropped, whichever
/// comes first.
pub struct Session {
    peer: PeerId,
    inner: Option<Box<dyn MintSession>>,
}

impl Session {
    pub async fn open(dialer: &dyn ChannelDialer, peer: &PeerId) -> Result<Self, ChannelError> {
        let inner = dialer.open(peer).await?;
        tracing::debug!(peer_id = %peer, "Session opened");
        Ok(Self { peer: peer.clone(), inner: Some(inner) })
    }

    pub fn peer(&self) -> &PeerId {
        &self.peer
    }

    fn inner(&mut self) -> Result<&mut Box<dyn MintSession>, ChannelError> {
        self.inner
            .as_mut()
            .ok_or_else(|| ChannelError::Unavailable("session already released".to_string()))
    }

    pub async fn get_status(&mut self, owner: Address) -> Result<MintStatusResponse, ChannelError> {
        self.inner()?.get_status(&MintStatusRequest { owner }).await
    }

    pub async fn handle_mint(&mut self, request: &MintCoinRequest) -> Result<MintCoinResponse, ChannelError> {
        self.inner()?.handle_mint(request).await
    }

    pub fn release(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.close();
            tracing::debug!(peer_id = %self.peer, "Session released");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens a session to `peer`, waiting `retry_interval` between failed attempts.
///
/// Never gives up: the beacon being unreachable is always treated as temporary.
pub async fn acquire(dialer: &dyn ChannelDialer, peer: &PeerId, retry_interval: Duration) -> Session {
    loop {
        match Session::open(dialer, peer).await {
            Ok(session) => return session,
            Err(e) => {
                tracing::info!(error = %e, "Could not establish direct channel, waiting...");
                metrics::increment_counter!("predusk_channel_retries_total");
                tokio::time::sleep(retry_interval).await;
            }
        }
    }
}
