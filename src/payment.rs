// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Payment validation.
//!
//! Reads a transaction that a wallet outside our control already signed and
//! broadcast, and decides whether it moved enough of the payment token to the
//! recipient. Nothing is ever submitted, so validation can be retried freely.
//!
//! A non-matching transaction is a normal `valid: false` result. Only a
//! failed chain fetch is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_pubkey::Pubkey;
use std::sync::Arc;

use crate::address::{associated_token_address, parse_address};
use crate::chain::{ChainQuery, ParsedInstruction};
use crate::config::{
    ASSOCIATED_TOKEN_PROGRAM_ID, CREATOR_WALLET, RUN_DECIMALS, RUN_MINT, RUN_SYMBOL, TOKEN_PROGRAM_ID,
};
use crate::error::{RevenantError, Result};

/// Token and recipient the validator checks against.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfig {
    pub mint: Pubkey,
    pub recipient: Pubkey,
    pub token_program: Pubkey,
    pub associated_token_program: Pubkey,
    pub symbol: String,
    pub decimals: u8,
}

impl PaymentConfig {
    pub fn new(mint: &str, recipient: &str, symbol: impl Into<String>, decimals: u8) -> Result<Self> {
        Ok(Self {
            mint: parse_address("mint", mint)?,
            recipient: parse_address("recipient", recipient)?,
            token_program: parse_address("token program", TOKEN_PROGRAM_ID)?,
            associated_token_program: parse_address("associated token program", ASSOCIATED_TOKEN_PROGRAM_ID)?,
            symbol: symbol.into(),
            decimals,
        })
    }

    /// The built-in $RUN mint and creator wallet.
    pub fn run_token() -> Result<Self> {
        Self::new(RUN_MINT, CREATOR_WALLET, RUN_SYMBOL, RUN_DECIMALS)
    }

    pub fn recipient_token_account(&self) -> Pubkey {
        associated_token_address(
            &self.recipient,
            &self.mint,
            &self.token_program,
            &self.associated_token_program,
        )
    }
}

/// What a client needs to build the transfer itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub mint: String,
    pub destination: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    fn rejected(signature: &str, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            amount: None,
            signature: signature.to_string(),
            block_time: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransferKind {
    Transfer,
    TransferChecked,
}

/// A token-program transfer pulled out of one instruction.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub program_id: String,
    pub kind: TransferKind,
    pub destination: String,
    pub amount: u64,
}

impl TransferRecord {
    /// `None` unless `ix` is a parsed `transfer`/`transferChecked` issued to
    /// `token_program`.
    pub fn from_instruction(ix: &ParsedInstruction, token_program: &str) -> Option<Self> {
        if ix.program_id != token_program {
            return None;
        }

        let parsed = ix.parsed.as_ref()?.as_object()?;
        let kind = match parsed.get("type")?.as_str()? {
            "transfer" => TransferKind::Transfer,
            "transferChecked" => TransferKind::TransferChecked,
            _ => return None,
        };

        let info = parsed.get("info")?;
        let destination = info.get("destination")?.as_str()?.to_string();
        let amount = info
            .get("amount")
            .filter(|v| !v.is_null())
            .or_else(|| info.get("tokenAmount").and_then(|t| t.get("amount")))
            .map(parse_amount)
            .unwrap_or(0);

        Some(Self {
            program_id: ix.program_id.clone(),
            kind,
            destination,
            amount,
        })
    }
}

/// Base-unit amounts arrive as decimal strings; anything unreadable is 0.
fn parse_amount(value: &Value) -> u64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

pub struct PaymentValidator {
    chain: Arc<dyn ChainQuery>,
    config: PaymentConfig,
    token_program: String,
    recipient: String,
    recipient_token_account: String,
}

impl PaymentValidator {
    pub fn new(chain: Arc<dyn ChainQuery>, config: PaymentConfig) -> Self {
        let recipient_token_account = config.recipient_token_account().to_string();
        Self {
            chain,
            token_program: config.token_program.to_string(),
            recipient: config.recipient.to_string(),
            recipient_token_account,
            config,
        }
    }

    pub fn payment_info(&self) -> PaymentInfo {
        PaymentInfo {
            mint: self.config.mint.to_string(),
            destination: self.recipient.clone(),
            symbol: self.config.symbol.clone(),
            decimals: self.config.decimals,
        }
    }

    pub fn recipient_token_account(&self) -> &str {
        &self.recipient_token_account
    }

    /// The derived token account is the expected destination; the bare
    /// wallet address is accepted as well.
    fn pays_recipient(&self, destination: &str) -> bool {
        destination == self.recipient_token_account || destination == self.recipient
    }

    /// Decide whether `signature` paid at least `expected_amount` base units
    /// (0 accepts any matching transfer). When several instructions match, the
    /// last one's amount is the one checked.
    pub async fn validate(&self, signature: &str, expected_amount: u64) -> Result<ValidationResult> {
        let tx = self.chain.get_transaction(signature).await.map_err(|e| {
            tracing::error!("Payments: fetch of {} failed: {}", signature, e);
            RevenantError::ChainQueryFailure(e.to_string())
        })?;

        let Some(tx) = tx else {
            tracing::debug!("Payments: {} not found", signature);
            return Ok(ValidationResult::rejected(signature, "Transaction not found"));
        };

        if tx.failed() {
            return Ok(ValidationResult::rejected(signature, "Transaction failed"));
        }

        let mut amount = None;
        for ix in tx.instructions() {
            let Some(transfer) = TransferRecord::from_instruction(ix, &self.token_program) else {
                continue;
            };
            if self.pays_recipient(&transfer.destination) {
                tracing::debug!("Payments: {:?} of {} to {}", transfer.kind, transfer.amount, transfer.destination);
                amount = Some(transfer.amount);
            }
        }

        let Some(amount) = amount else {
            return Ok(ValidationResult::rejected(signature, "No transfer to recipient wallet found"));
        };

        if expected_amount > 0 && amount < expected_amount {
            return Ok(ValidationResult::rejected(
                signature,
                format!("Insufficient amount: got {}, expected {}", amount, expected_amount),
            ));
        }

        tracing::info!("Payments: {} verified, amount {}", signature, amount);

        Ok(ValidationResult {
            valid: true,
            amount: Some(amount),
            signature: signature.to_string(),
            block_time: tx.block_time,
            error: None,
        })
    }
}
