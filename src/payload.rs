// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Salvage payload envelope.
//!
//! The envelope is JSON so that anything reading the ledger directly can
//! inspect it:
//! ```json
//! {"version":"1.0","timestamp":"...","files":[{"path":"..","content":".."}],
//!  "metadata":{"source":"RevenantBridge"}}
//! ```
//! A payload carries either `files` or `rawState`. When both are offered to
//! the builder, `files` wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{PAYLOAD_VERSION, SOURCE_TAG, SUPPORTED_MAJOR_VERSION};
use crate::error::{RevenantError, Result};

/// One file of agent working memory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StateFile {
    pub path: String,
    pub content: String,
}

impl StateFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalvagePayload {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Order and duplicate paths are preserved exactly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<StateFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_state: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl SalvagePayload {
    /// Build a file-list payload. Never fails, empty `files` included.
    pub fn build(files: Vec<StateFile>, metadata: Map<String, Value>) -> Self {
        Self {
            version: PAYLOAD_VERSION.to_string(),
            timestamp: Utc::now(),
            files: Some(files),
            raw_state: None,
            metadata: stamp_source(metadata),
        }
    }

    /// Build the raw-state wrapper used when no file list is supplied.
    pub fn from_raw_state(raw_state: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            version: PAYLOAD_VERSION.to_string(),
            timestamp: Utc::now(),
            files: None,
            raw_state: Some(raw_state.into()),
            metadata: stamp_source(metadata),
        }
    }

    /// Pick the envelope shape for a request that may carry either input.
    pub fn from_parts(
        files: Option<Vec<StateFile>>,
        raw_state: Option<String>,
        metadata: Map<String, Value>,
    ) -> Self {
        match (files, raw_state) {
            (Some(files), _) => Self::build(files, metadata),
            (None, Some(raw)) => Self::from_raw_state(raw, metadata),
            (None, None) => Self::build(Vec::new(), metadata),
        }
    }

    /// Serialize to the exact bytes handed to the ledger.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RevenantError::MalformedPayload(e.to_string()))
    }

    /// Decode ledger bytes. The `version` value is not checked here; see
    /// [`SalvagePayload::check_version`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| RevenantError::MalformedPayload(e.to_string()))
    }

    /// Reject envelopes whose major version this build does not understand.
    pub fn check_version(&self) -> Result<()> {
        let major = self
            .version
            .split('.')
            .next()
            .and_then(|m| m.trim().parse::<u32>().ok());

        match major {
            Some(SUPPORTED_MAJOR_VERSION) => Ok(()),
            _ => Err(RevenantError::UnsupportedVersion(self.version.clone())),
        }
    }

    pub fn file_paths(&self) -> Option<Vec<&str>> {
        self.files
            .as_ref()
            .map(|files| files.iter().map(|f| f.path.as_str()).collect())
    }
}

fn stamp_source(mut metadata: Map<String, Value>) -> Map<String, Value> {
    metadata.insert("source".to_string(), Value::String(SOURCE_TAG.to_string()));
    metadata
}

/// `blake3:<hex>` digest of the given bytes.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(bytes).to_hex())
}
