// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Revival: rebuild salvaged state from a ledger id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::CONTENT_DIGEST_TAG;
use crate::demo::{demo_state, is_demo_id};
use crate::error::{RevenantError, Result};
use crate::ledger::{tags_to_map, LedgerReader};
use crate::payload::{content_digest, SalvagePayload};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RevivalStatus {
    Demo,
    Success,
}

impl RevivalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevivalStatus::Demo => "demo",
            RevivalStatus::Success => "success",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevivalMetadata {
    pub id: String,
    pub tags: BTreeMap<String, String>,
    pub retrieved_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Revival {
    pub state: SalvagePayload,
    pub metadata: RevivalMetadata,
    pub status: RevivalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct RevivalProtocol {
    reader: Arc<dyn LedgerReader>,
}

impl RevivalProtocol {
    pub fn new(reader: Arc<dyn LedgerReader>) -> Self {
        Self { reader }
    }

    pub async fn revive(&self, id: &str) -> Result<Revival> {
        if is_demo_id(id) {
            tracing::warn!("Revival: demo id {:?}, returning placeholder state", id);
            return Ok(Revival {
                state: demo_state(),
                metadata: RevivalMetadata {
                    id: id.to_string(),
                    tags: BTreeMap::new(),
                    retrieved_at: Utc::now(),
                },
                status: RevivalStatus::Demo,
                message: Some("Demo revival - provide a real ledger id for actual state".to_string()),
            });
        }

        let not_found = |reason: String| {
            tracing::error!("Revival: ledger read failed for {}: {}", id, reason);
            RevenantError::RevivalNotFound {
                id: id.to_string(),
                reason,
            }
        };
        let corrupt = |reason: String| {
            tracing::error!("Revival: content for {} is unusable: {}", id, reason);
            RevenantError::RevivalCorrupt {
                id: id.to_string(),
                reason,
            }
        };

        let data = self.reader.read(id).await.map_err(|e| not_found(e.to_string()))?;
        let state = SalvagePayload::parse(&data).map_err(|e| corrupt(e.to_string()))?;
        state.check_version()?;

        let tags = self.reader.tags(id).await.map_err(|e| not_found(e.to_string()))?;
        let tags = tags_to_map(&tags);

        if let Some(expected) = tags.get(CONTENT_DIGEST_TAG) {
            let actual = content_digest(&data);
            if *expected != actual {
                return Err(corrupt(format!("digest mismatch: tagged {}, got {}", expected, actual)));
            }
        }

        tracing::info!("Revival: restored {} ({} bytes)", id, data.len());

        Ok(Revival {
            state,
            metadata: RevivalMetadata {
                id: id.to_string(),
                tags,
                retrieved_at: Utc::now(),
            },
            status: RevivalStatus::Success,
            message: None,
        })
    }
}

/// Task string handed to the agent runtime so it can resume from `state`.
pub fn generate_spawn_command(state: &SalvagePayload) -> String {
    let summary = match state.file_paths() {
        Some(paths) => paths.join(", "),
        None => "unknown files".to_string(),
    };

    format!(
        "sessions_spawn({{ task: \"Revived agent with files: {}. Restore context and continue.\" }})",
        summary
    )
}
