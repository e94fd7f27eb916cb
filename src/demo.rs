// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Demo mode: the no-network path shared by salvage and revival.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{DEMO_PREFIX, PAYLOAD_VERSION};
use crate::payload::{SalvagePayload, StateFile};

static DEMO_SEQ: AtomicU64 = AtomicU64::new(0);

/// `demo-<millis>-<seq><rand>`. The sequence and random suffix keep ids
/// apart when many calls land in the same millisecond.
pub fn next_demo_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = DEMO_SEQ.fetch_add(1, Ordering::Relaxed);
    let salt: u16 = rand::random();
    format!("{}{}-{:x}{:04x}", DEMO_PREFIX, millis, seq, salt)
}

/// Empty ids and anything under the sentinel prefix never hit the ledger.
pub fn is_demo_id(id: &str) -> bool {
    id.is_empty() || id.starts_with(DEMO_PREFIX)
}

/// Fixed placeholder state returned for demo revivals.
pub fn demo_state() -> SalvagePayload {
    let mut metadata = Map::new();
    metadata.insert("source".to_string(), Value::String("demo".to_string()));

    SalvagePayload {
        version: PAYLOAD_VERSION.to_string(),
        timestamp: Utc::now(),
        files: Some(vec![
            StateFile::new("MEMORY.md", "# Agent Memory\n\nDemo revival state."),
            StateFile::new("IDENTITY.md", "# Identity\n\nRevenant Agent"),
        ]),
        raw_state: None,
        metadata,
    }
}
