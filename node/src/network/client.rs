// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{MintCoinRequest, MintCoinResponse, MintStatusRequest, MintStatusResponse, PeerInfoResponse};
use crate::channel::{ChannelDialer, MintSession};
use crate::errors::ChannelError;
use crate::identity::PeerId;

/// Dials the beacon's mint service over HTTP.
///
/// Opening a session checks that the service answers with the expected peer
/// id before anything is submitted to it.
#[derive(Debug, Clone)]
pub struct HttpDialer {
    base_url: String,
    client: Client,
    max_message_bytes: usize,
}

impl HttpDialer {
    pub fn new(url: &str, timeout: Duration, max_message_bytes: usize) -> Result<Self, ChannelError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChannelError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
            max_message_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChannelDialer for HttpDialer {
    async fn open(&self, peer: &PeerId) -> Result<Box<dyn MintSession>, ChannelError> {
        let url = format!("{}/v1/peer", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| ChannelError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ChannelError::Unavailable(format!("Peer request failed: {}", resp.status())));
        }

        let info: PeerInfoResponse = resp.json().await
            .map_err(|e| ChannelError::InvalidResponse(e.to_string()))?;
        if info.peer_id != peer.to_hex() {
            return Err(ChannelError::Unauthenticated { expected: peer.to_hex(), got: info.peer_id });
        }

        Ok(Box::new(HttpSession {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            max_message_bytes: self.max_message_bytes,
            open: true,
        }))
    }
}

pub struct HttpSession {
    base_url: String,
    client: Client,
    max_message_bytes: usize,
    open: bool,
}

impl HttpSession {
    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, ChannelError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        if !self.open {
            return Err(ChannelError::Unavailable("session closed".to_string()));
        }

        let body = serde_json::to_vec(request).map_err(|e| ChannelError::Rpc(e.to_string()))?;
        if body.len() > self.max_message_bytes {
            return Err(ChannelError::MessageTooLarge { size: body.len(), limit: self.max_message_bytes });
        }

        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send().await
            .map_err(|e| ChannelError::Rpc(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ChannelError::Rpc(format!("{} returned {}", path, resp.status())));
        }

        let bytes = resp.bytes().await.map_err(|e| ChannelError::Rpc(e.to_string()))?;
        if bytes.len() > self.max_message_bytes {
            return Err(ChannelError::MessageTooLarge { size: bytes.len(), limit: self.max_message_bytes });
        }

        serde_json::from_slice(&bytes).map_err(|e| ChannelError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MintSession for HttpSession {
    async fn get_status(&mut self, request: &MintStatusRequest) -> Result<MintStatusResponse, ChannelError> {
        self.post_json("/v1/pre-midnight/status", request).await
    }

    async fn handle_mint(&mut self, request: &MintCoinRequest) -> Result<MintCoinResponse, ChannelError> {
        self.post_json("/v1/pre-midnight/mint", request).await
    }

    fn close(&mut self) {
        self.open = false;
    }
}
