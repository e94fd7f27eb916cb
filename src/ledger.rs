// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Immutable blob ledger capabilities consumed by salvage and revival.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A key/value label attached to a ledger entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Collapse tags into a map. A repeated name keeps its last value.
pub fn tags_to_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.name.clone(), t.value.clone()))
        .collect()
}

/// Ledger ids are base64url or hex strings. Anything else is never looked up.
pub fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// What the ledger said about a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub id: String,
    pub status: u16,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Write-once storage. Every call creates a new entry with a new id.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    async fn write(&self, data: Vec<u8>, tags: &[Tag]) -> Result<WriteReceipt, LedgerError>;
}

#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn read(&self, id: &str) -> Result<Vec<u8>, LedgerError>;
    async fn tags(&self, id: &str) -> Result<Vec<Tag>, LedgerError>;
}
