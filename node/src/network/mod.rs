// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Outbound HTTP clients.

pub mod gateway;
pub mod rpc;

pub use gateway::GatewayClient;
pub use rpc::SolanaRpcClient;

use revenant_core::RevenantError;
use std::time::Duration;

/// Shared reqwest client. The timeout is applied here, by the caller of the
/// protocols, not inside them.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, RevenantError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RevenantError::Config(format!("http client: {}", e)))
}
