// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Minimal Solana JSON-RPC client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

use revenant_core::chain::{ChainError, ChainQuery, ParsedTransaction};

static RPC_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: T,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Clone)]
pub struct SolanaRpcClient {
    url: String,
    commitment: String,
    client: reqwest::Client,
}

impl SolanaRpcClient {
    pub fn new(url: impl Into<String>, commitment: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            commitment: commitment.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `Ok(None)` for a `null` result.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<Option<R>, ChainError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let payload = JsonRpcRequest {
            jsonrpc: "2.0",
            id: RPC_ID.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChainError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Network(format!("HTTP {} from {}", status, self.url)));
        }

        let body = response.bytes().await.map_err(|e| ChainError::Network(e.to_string()))?;
        let body: JsonRpcResponse<R> =
            serde_json::from_slice(&body).map_err(|e| ChainError::Decode(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(body.result)
    }
}

#[async_trait]
impl ChainQuery for SolanaRpcClient {
    async fn get_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, ChainError> {
        let params = json!([
            signature,
            {
                "encoding": "jsonParsed",
                "maxSupportedTransactionVersion": 0,
                "commitment": self.commitment,
            }
        ]);
        self.request("getTransaction", params).await
    }
}
