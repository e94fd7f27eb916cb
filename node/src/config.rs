// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;

use revenant_core::config::{CREATOR_WALLET, RUN_DECIMALS, RUN_MINT, RUN_SYMBOL};
use revenant_core::payment::PaymentConfig;
use revenant_core::RevenantError;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";

/// Credential material for the ledger. Absent means salvage runs in demo mode.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCredential {
    /// Local directory, for development.
    Fs { root: PathBuf },
    S3 {
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        endpoint: Option<String>,
        region: Option<String>,
    },
}

#[derive(Clone, PartialEq)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub rpc_url: String,
    pub commitment: String,
    pub gateway_url: String,
    pub ledger: Option<LedgerCredential>,
    pub mint: String,
    pub recipient: String,
    pub symbol: String,
    pub decimals: u8,
    /// Bearer token required on `/salvage` and `/revive` when set.
    pub api_token: Option<String>,
    /// Base units a salvage must pay when set.
    pub salvage_price: Option<u64>,
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: "confirmed".to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            ledger: None,
            mint: RUN_MINT.to_string(),
            recipient: CREATOR_WALLET.to_string(),
            symbol: RUN_SYMBOL.to_string(),
            decimals: RUN_DECIMALS,
            api_token: None,
            salvage_price: None,
            request_timeout_secs: 30,
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ledger = match &self.ledger {
            None => "demo".to_string(),
            Some(LedgerCredential::Fs { root }) => format!("fs:{}", root.display()),
            Some(LedgerCredential::S3 { bucket, .. }) => format!("s3:{}", bucket),
        };
        f.debug_struct("NodeConfig")
            .field("bind_addr", &self.bind_addr)
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment)
            .field("gateway_url", &self.gateway_url)
            .field("ledger", &ledger)
            .field("mint", &self.mint)
            .field("recipient", &self.recipient)
            .field("api_token", &self.api_token.as_ref().map(|_| "<set>"))
            .field("salvage_price", &self.salvage_price)
            .finish()
    }
}

impl NodeConfig {
    /// Read settings from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, RevenantError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`] with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RevenantError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(addr) = get("REVENANT_BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| RevenantError::Config(format!("REVENANT_BIND_ADDR {}: {}", addr, e)))?;
        }
        if let Some(url) = get("SOLANA_RPC_URL") {
            cfg.rpc_url = url;
        }
        if let Some(commitment) = get("SOLANA_COMMITMENT") {
            cfg.commitment = commitment;
        }
        if let Some(url) = get("ARWEAVE_GATEWAY_URL") {
            cfg.gateway_url = url;
        }

        cfg.ledger = if let Some(root) = get("LEDGER_FS_ROOT") {
            Some(LedgerCredential::Fs { root: PathBuf::from(root) })
        } else {
            match (
                get("LEDGER_S3_BUCKET"),
                get("LEDGER_S3_ACCESS_KEY_ID"),
                get("LEDGER_S3_SECRET_ACCESS_KEY"),
            ) {
                (Some(bucket), Some(access_key_id), Some(secret_access_key)) => Some(LedgerCredential::S3 {
                    bucket,
                    access_key_id,
                    secret_access_key,
                    endpoint: get("LEDGER_S3_ENDPOINT"),
                    region: get("LEDGER_S3_REGION"),
                }),
                (Some(_), _, _) => {
                    return Err(RevenantError::Config(
                        "LEDGER_S3_BUCKET set without LEDGER_S3_ACCESS_KEY_ID/LEDGER_S3_SECRET_ACCESS_KEY".into(),
                    ))
                }
                _ => None,
            }
        };

        if let Some(mint) = get("RUN_MINT") {
            cfg.mint = mint;
        }
        if let Some(wallet) = get("CREATOR_WALLET") {
            cfg.recipient = wallet;
        }
        if let Some(symbol) = get("PAYMENT_SYMBOL") {
            cfg.symbol = symbol;
        }
        if let Some(decimals) = get("PAYMENT_DECIMALS") {
            cfg.decimals = parse_number("PAYMENT_DECIMALS", &decimals)?;
        }

        cfg.api_token = get("REVENANT_API_TOKEN");
        if let Some(price) = get("SALVAGE_PRICE") {
            cfg.salvage_price = Some(parse_number("SALVAGE_PRICE", &price)?);
        }
        if let Some(secs) = get("REQUEST_TIMEOUT_SECS") {
            cfg.request_timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", &secs)?;
        }

        // Fail at startup rather than on the first payment request.
        cfg.payment_config()?;

        Ok(cfg)
    }

    pub fn payment_config(&self) -> Result<PaymentConfig, RevenantError> {
        PaymentConfig::new(&self.mint, &self.recipient, self.symbol.clone(), self.decimals)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, RevenantError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| RevenantError::Config(format!("{} {}: {}", key, value, e)))
}
