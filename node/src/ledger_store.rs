// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Write-once blob ledger over an object store.
//!
//! # Layout
//! ```text
//! data/<id>        payload bytes
//! tags/<id>.json   [{"name": .., "value": ..}, ...]
//! ```
//! `id = blake3(salt || bytes)` with a fresh random salt per write, so equal
//! content written twice lands under two ids. Existing ids are never
//! overwritten.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use opendal::{services, ErrorKind, Operator};
use std::sync::Arc;

use revenant_core::ledger::{is_well_formed_id, LedgerError, LedgerReader, LedgerWriter, Tag, WriteReceipt};
use revenant_core::RevenantError;

use crate::config::LedgerCredential;

pub const SALT_TAG: &str = "Salt";

#[derive(Clone)]
pub struct ObjectLedger {
    op: Operator,
}

fn data_path(id: &str) -> String {
    format!("data/{}", id)
}

fn tags_path(id: &str) -> String {
    format!("tags/{}.json", id)
}

fn storage_error(id: &str, e: opendal::Error) -> LedgerError {
    if e.kind() == ErrorKind::NotFound {
        LedgerError::NotFound(id.to_string())
    } else {
        LedgerError::Storage(e.to_string())
    }
}

impl ObjectLedger {
    pub fn new(op: Operator) -> Self {
        Self { op }
    }

    pub fn from_credential(credential: &LedgerCredential) -> Result<Self, RevenantError> {
        let op = match credential {
            LedgerCredential::Fs { root } => {
                let builder = services::Fs::default().root(&root.to_string_lossy());
                Operator::new(builder).map(|b| b.finish())
            }
            LedgerCredential::S3 {
                bucket,
                access_key_id,
                secret_access_key,
                endpoint,
                region,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(region) = region {
                    builder = builder.region(region);
                }
                Operator::new(builder).map(|b| b.finish())
            }
        }
        .map_err(|e| RevenantError::Config(format!("ledger backend: {}", e)))?;

        Ok(Self::new(op))
    }

    /// Process-local ledger, for tests and local runs.
    pub fn memory() -> Result<Self, RevenantError> {
        let op = Operator::new(services::Memory::default())
            .map(|b| b.finish())
            .map_err(|e| RevenantError::Config(format!("ledger backend: {}", e)))?;
        Ok(Self::new(op))
    }
}

#[async_trait]
impl LedgerWriter for ObjectLedger {
    async fn write(&self, data: Vec<u8>, tags: &[Tag]) -> Result<WriteReceipt, LedgerError> {
        let salt: [u8; 16] = rand::random();
        let mut hasher = blake3::Hasher::new();
        hasher.update(&salt);
        hasher.update(&data);
        let id = hasher.finalize().to_hex().to_string();

        let path = data_path(&id);
        if self.op.exists(&path).await.map_err(|e| storage_error(&id, e))? {
            return Err(LedgerError::Rejected {
                status: 409,
                message: format!("{} already written", id),
            });
        }

        let mut stored = tags.to_vec();
        stored.push(Tag::new(SALT_TAG, URL_SAFE_NO_PAD.encode(salt)));
        let tags_json = serde_json::to_vec(&stored).map_err(|e| LedgerError::Storage(e.to_string()))?;

        // Tags go first: a visible blob always has its tags.
        self.op
            .write(&tags_path(&id), tags_json)
            .await
            .map_err(|e| storage_error(&id, e))?;
        self.op
            .write(&path, data)
            .await
            .map_err(|e| storage_error(&id, e))?;

        tracing::debug!("ObjectLedger: wrote {}", id);

        Ok(WriteReceipt { id, status: 200 })
    }
}

#[async_trait]
impl LedgerReader for ObjectLedger {
    async fn read(&self, id: &str) -> Result<Vec<u8>, LedgerError> {
        if !is_well_formed_id(id) {
            return Err(LedgerError::NotFound(id.to_string()));
        }
        let buf = self
            .op
            .read(&data_path(id))
            .await
            .map_err(|e| storage_error(id, e))?;
        Ok(buf.to_vec())
    }

    async fn tags(&self, id: &str) -> Result<Vec<Tag>, LedgerError> {
        if !is_well_formed_id(id) {
            return Err(LedgerError::NotFound(id.to_string()));
        }
        let buf = self
            .op
            .read(&tags_path(id))
            .await
            .map_err(|e| storage_error(id, e))?;
        serde_json::from_slice(&buf.to_vec()).map_err(|e| LedgerError::Storage(e.to_string()))
    }
}

/// Reads from `primary`, and from `fallback` for ids `primary` does not hold.
/// Only `NotFound` falls through; any other primary error is returned as is.
pub struct FallbackReader {
    primary: Arc<dyn LedgerReader>,
    fallback: Arc<dyn LedgerReader>,
}

impl FallbackReader {
    pub fn new(primary: Arc<dyn LedgerReader>, fallback: Arc<dyn LedgerReader>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl LedgerReader for FallbackReader {
    async fn read(&self, id: &str) -> Result<Vec<u8>, LedgerError> {
        match self.primary.read(id).await {
            Err(LedgerError::NotFound(_)) => {
                tracing::debug!("FallbackReader: {} not in primary ledger, trying fallback", id);
                self.fallback.read(id).await
            }
            other => other,
        }
    }

    async fn tags(&self, id: &str) -> Result<Vec<Tag>, LedgerError> {
        match self.primary.tags(id).await {
            Err(LedgerError::NotFound(_)) => self.fallback.tags(id).await,
            other => other,
        }
    }
}
