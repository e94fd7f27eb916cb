// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain query capability and the parsed transaction shape it returns.
//!
//! Field names follow the `jsonParsed` encoding of Solana's `getTransaction`,
//! so RPC responses deserialize straight into these types. Unknown fields are
//! ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    pub transaction: TransactionEnvelope,
}

impl ParsedTransaction {
    /// True when execution recorded an error.
    pub fn failed(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|m| m.err.as_ref())
            .map(|err| !err.is_null())
            .unwrap_or(false)
    }

    pub fn instructions(&self) -> &[ParsedInstruction] {
        &self.transaction.message.instructions
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionEnvelope {
    #[serde(default)]
    pub signatures: Vec<String>,
    pub message: ParsedMessage,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ParsedMessage {
    #[serde(default)]
    pub instructions: Vec<ParsedInstruction>,
}

/// A top-level instruction. `parsed` is present when the node knows the
/// program; it may be an object (`{"type", "info"}`) or a bare string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInstruction {
    pub program_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("network error: {0}")]
    Network(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// `Ok(None)` when the chain has no record of `signature`.
    async fn get_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, ChainError>;
}
