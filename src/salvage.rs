// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Salvage: persist a payload to the ledger.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{ACCEPTED_WRITE_STATUSES, CONTENT_DIGEST_TAG, SOURCE_TAG, STATE_TYPE_TAG};
use crate::demo::next_demo_id;
use crate::error::{RevenantError, Result};
use crate::ledger::{LedgerWriter, Tag};
use crate::payload::{content_digest, SalvagePayload};

/// Whether salvage may write. Resolved once when the protocol is built.
#[derive(Clone)]
pub enum WriteCapability {
    Live(Arc<dyn LedgerWriter>),
    Demo,
}

impl WriteCapability {
    pub fn is_live(&self) -> bool {
        matches!(self, WriteCapability::Live(_))
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SalvageStatus {
    Demo,
    Submitted,
}

impl SalvageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalvageStatus::Demo => "demo",
            SalvageStatus::Submitted => "submitted",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SalvageReceipt {
    pub id: String,
    pub status: SalvageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

pub struct SalvageProtocol {
    capability: WriteCapability,
}

impl SalvageProtocol {
    pub fn new(capability: WriteCapability) -> Self {
        Self { capability }
    }

    pub fn is_live(&self) -> bool {
        self.capability.is_live()
    }

    /// Write `payload` to the ledger. Not idempotent: identical payloads
    /// produce distinct ids and distinct entries.
    pub async fn salvage(&self, payload: &SalvagePayload) -> Result<SalvageReceipt> {
        let writer = match &self.capability {
            WriteCapability::Demo => {
                tracing::warn!("Salvage: no write credential configured, using demo mode");
                return Ok(SalvageReceipt {
                    id: next_demo_id(),
                    status: SalvageStatus::Demo,
                    message: Some("Demo mode - configure a ledger credential for real uploads".to_string()),
                    content_hash: None,
                    size: None,
                });
            }
            WriteCapability::Live(writer) => writer,
        };

        let data = payload.encode()?;
        let digest = content_digest(&data);
        let size = data.len();
        let tags = write_tags(&digest);

        let receipt = writer.write(data, &tags).await.map_err(|e| {
            tracing::error!("Salvage: ledger error: {}", e);
            RevenantError::LedgerWriteFailure(e.to_string())
        })?;

        if !ACCEPTED_WRITE_STATUSES.contains(&receipt.status) {
            tracing::error!("Salvage: ledger upload failed with status {}", receipt.status);
            return Err(RevenantError::LedgerWriteFailure(format!(
                "Ledger upload failed: {}",
                receipt.status
            )));
        }

        tracing::info!("Salvage: submitted {} bytes as {} ({})", size, receipt.id, digest);

        Ok(SalvageReceipt {
            id: receipt.id,
            status: SalvageStatus::Submitted,
            message: Some("Transaction submitted to the ledger".to_string()),
            content_hash: Some(digest),
            size: Some(size),
        })
    }
}

fn write_tags(digest: &str) -> Vec<Tag> {
    vec![
        Tag::new("App-Name", SOURCE_TAG),
        Tag::new("Type", STATE_TYPE_TAG),
        Tag::new("Content-Type", "application/json"),
        Tag::new("Timestamp", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        Tag::new(CONTENT_DIGEST_TAG, digest),
    ]
}
