// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use revenant_core::payload::StateFile;
use revenant_core::revival::Revival;

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalvageRequest {
    #[serde(default)]
    pub files: Option<Vec<StateFile>>,
    /// Raw state. Non-string JSON is stored in its serialized form.
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    /// Required when the node charges for salvage.
    #[serde(default)]
    pub payment_signature: Option<String>,
}

impl SalvageRequest {
    pub fn raw_state(&self) -> Option<String> {
        match &self.state {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ReviveRequest {
    #[serde(default, alias = "txId")]
    pub id: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReviveResponse {
    #[serde(flatten)]
    pub revival: Revival,
    pub spawn_command: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePaymentRequest {
    pub signature: String,
    #[serde(default)]
    pub expected_amount: u64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub salvage_mode: String,
    pub version: String,
}
