// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Read-only Arweave gateway client.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use revenant_core::ledger::{is_well_formed_id, LedgerError, LedgerReader, Tag};

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    client: Client,
}

/// Tag names and values arrive base64url-encoded.
#[derive(Deserialize)]
struct EncodedTag {
    name: String,
    value: String,
}

#[derive(Deserialize)]
struct GatewayTx {
    #[serde(default)]
    tags: Vec<EncodedTag>,
}

impl GatewayClient {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, id: &str, url: String) -> Result<reqwest::Response, LedgerError> {
        if !is_well_formed_id(id) {
            return Err(LedgerError::NotFound(id.to_string()));
        }

        let resp = self.client.get(&url).send().await
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(LedgerError::NotFound(id.to_string())),
            // Gateways answer 202 while a transaction is still pending.
            StatusCode::ACCEPTED => Err(LedgerError::NotFound(format!("{} is pending", id))),
            s if !s.is_success() => Err(LedgerError::Rejected {
                status: s.as_u16(),
                message: format!("gateway request failed: {}", url),
            }),
            _ => Ok(resp),
        }
    }
}

fn decode_tag_part(part: &str) -> Result<String, LedgerError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .map_err(|e| LedgerError::Storage(format!("tag encoding: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| LedgerError::Storage(format!("tag encoding: {}", e)))
}

#[async_trait]
impl LedgerReader for GatewayClient {
    async fn read(&self, id: &str) -> Result<Vec<u8>, LedgerError> {
        let resp = self.get(id, format!("{}/{}", self.base_url, id)).await?;
        let bytes = resp.bytes().await.map_err(|e| LedgerError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn tags(&self, id: &str) -> Result<Vec<Tag>, LedgerError> {
        let resp = self.get(id, format!("{}/tx/{}", self.base_url, id)).await?;
        let body = resp.bytes().await.map_err(|e| LedgerError::Network(e.to_string()))?;
        let tx: GatewayTx = serde_json::from_slice(&body)
            .map_err(|e| LedgerError::Storage(format!("transaction header: {}", e)))?;

        tx.tags
            .iter()
            .map(|t| Ok(Tag::new(decode_tag_part(&t.name)?, decode_tag_part(&t.value)?)))
            .collect()
    }
}
