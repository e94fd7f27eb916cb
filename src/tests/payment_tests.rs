// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::chain::ParsedTransaction;
use crate::config::{CREATOR_WALLET, RUN_MINT, TOKEN_PROGRAM_ID};
use crate::error::ErrorKind;
use crate::payment::{PaymentConfig, PaymentValidator, TransferKind, TransferRecord};
use crate::tests::mocks::MockChain;

const SIG: &str = "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv";
const MEMO_PROGRAM: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";

fn recipient_ata() -> String {
    PaymentConfig::run_token().unwrap().recipient_token_account().to_string()
}

fn transfer_checked(destination: &str, amount: u64) -> Value {
    json!({
        "programId": TOKEN_PROGRAM_ID,
        "program": "spl-token",
        "parsed": {
            "type": "transferChecked",
            "info": {
                "source": "Fq7hGQWbNUCHhN9oJBgTC6Z8gBePo1AGDzwRjdAVpk7b",
                "mint": RUN_MINT,
                "destination": destination,
                "authority": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
                "tokenAmount": { "amount": amount.to_string(), "decimals": 9, "uiAmount": amount as f64 / 1e9 }
            }
        }
    })
}

fn transfer(destination: &str, amount: u64) -> Value {
    json!({
        "programId": TOKEN_PROGRAM_ID,
        "program": "spl-token",
        "parsed": {
            "type": "transfer",
            "info": { "source": "src", "destination": destination, "authority": "auth", "amount": amount.to_string() }
        }
    })
}

fn memo(text: &str) -> Value {
    json!({ "programId": MEMO_PROGRAM, "program": "spl-memo", "parsed": text })
}

fn tx(instructions: Vec<Value>, err: Value) -> ParsedTransaction {
    serde_json::from_value(json!({
        "slot": 250_000_000u64,
        "blockTime": 1_717_171_717i64,
        "meta": { "err": err, "fee": 5000 },
        "transaction": {
            "signatures": [SIG],
            "message": { "accountKeys": [], "instructions": instructions }
        }
    }))
    .unwrap()
}

fn validator(chain: MockChain) -> PaymentValidator {
    PaymentValidator::new(Arc::new(chain), PaymentConfig::run_token().unwrap())
}

#[tokio::test]
async fn test_transfer_checked_to_ata_is_valid() {
    let chain = MockChain::with_tx(SIG, tx(vec![transfer_checked(&recipient_ata(), 1_000_000)], Value::Null));
    let result = validator(chain).validate(SIG, 500_000).await.unwrap();

    assert!(result.valid);
    assert_eq!(result.amount, Some(1_000_000));
    assert_eq!(result.signature, SIG);
    assert_eq!(result.block_time, Some(1_717_171_717));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_insufficient_amount() {
    let chain = MockChain::with_tx(SIG, tx(vec![transfer_checked(&recipient_ata(), 1_000_000)], Value::Null));
    let result = validator(chain).validate(SIG, 2_000_000).await.unwrap();

    assert!(!result.valid);
    assert_eq!(
        result.error.as_deref(),
        Some("Insufficient amount: got 1000000, expected 2000000")
    );
}

#[tokio::test]
async fn test_unrelated_program_is_no_match() {
    let chain = MockChain::with_tx(SIG, tx(vec![memo("hello"), memo(&recipient_ata())], Value::Null));
    let result = validator(chain).validate(SIG, 0).await.unwrap();

    assert!(!result.valid);
    assert_eq!(result.error.as_deref(), Some("No transfer to recipient wallet found"));
}

#[tokio::test]
async fn test_transfer_to_someone_else_is_no_match() {
    let other = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    let chain = MockChain::with_tx(SIG, tx(vec![transfer_checked(other, 9_000_000)], Value::Null));
    let result = validator(chain).validate(SIG, 0).await.unwrap();
    assert_eq!(result.error.as_deref(), Some("No transfer to recipient wallet found"));
}

#[tokio::test]
async fn test_failed_transaction_short_circuits() {
    let err = json!({ "InstructionError": [0, { "Custom": 1 }] });
    let chain = MockChain::with_tx(SIG, tx(vec![transfer_checked(&recipient_ata(), 1_000_000)], err));
    let result = validator(chain).validate(SIG, 0).await.unwrap();

    assert!(!result.valid);
    assert_eq!(result.error.as_deref(), Some("Transaction failed"));
    assert!(result.amount.is_none());
}

#[tokio::test]
async fn test_missing_transaction() {
    let result = validator(MockChain::default()).validate(SIG, 0).await.unwrap();
    assert!(!result.valid);
    assert_eq!(result.error.as_deref(), Some("Transaction not found"));
}

#[tokio::test]
async fn test_plain_transfer_to_wallet_is_accepted() {
    let chain = MockChain::with_tx(SIG, tx(vec![transfer(CREATOR_WALLET, 42)], Value::Null));
    let result = validator(chain).validate(SIG, 0).await.unwrap();
    assert!(result.valid);
    assert_eq!(result.amount, Some(42));
}

#[tokio::test]
async fn test_last_matching_instruction_wins() {
    let ata = recipient_ata();
    let chain = MockChain::with_tx(
        SIG,
        tx(
            vec![
                transfer_checked(&ata, 5_000_000),
                memo("between"),
                transfer_checked(&ata, 1_000),
            ],
            Value::Null,
        ),
    );
    let v = validator(chain);

    let result = v.validate(SIG, 0).await.unwrap();
    assert_eq!(result.amount, Some(1_000));

    // The larger earlier transfer does not count towards the threshold.
    let result = v.validate(SIG, 2_000).await.unwrap();
    assert!(!result.valid);
    assert_eq!(result.error.as_deref(), Some("Insufficient amount: got 1000, expected 2000"));
}

#[tokio::test]
async fn test_every_validation_requeries_chain() {
    let chain = Arc::new(MockChain::with_tx(SIG, tx(vec![transfer(CREATOR_WALLET, 1)], Value::Null)));
    let v = PaymentValidator::new(chain.clone(), PaymentConfig::run_token().unwrap());

    v.validate(SIG, 0).await.unwrap();
    v.validate(SIG, 0).await.unwrap();
    assert_eq!(chain.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_chain_is_an_error() {
    let chain = MockChain {
        unreachable: true,
        ..Default::default()
    };
    let err = validator(chain).validate(SIG, 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ChainQueryFailure);
}

#[test]
fn test_transfer_record_extraction() {
    let ix: crate::chain::ParsedInstruction = serde_json::from_value(transfer_checked("dest", 77)).unwrap();
    let record = TransferRecord::from_instruction(&ix, TOKEN_PROGRAM_ID).unwrap();
    assert_eq!(record.kind, TransferKind::TransferChecked);
    assert_eq!(record.destination, "dest");
    assert_eq!(record.amount, 77);

    // Other instruction kinds on the token program are not candidates.
    let close: crate::chain::ParsedInstruction = serde_json::from_value(json!({
        "programId": TOKEN_PROGRAM_ID,
        "parsed": { "type": "closeAccount", "info": { "destination": "dest" } }
    }))
    .unwrap();
    assert!(TransferRecord::from_instruction(&close, TOKEN_PROGRAM_ID).is_none());

    // Unparsed instructions carry no `parsed` field.
    let raw: crate::chain::ParsedInstruction = serde_json::from_value(json!({
        "programId": TOKEN_PROGRAM_ID,
        "accounts": [],
        "data": "3Bxs4h24hBtQy9rw"
    }))
    .unwrap();
    assert!(TransferRecord::from_instruction(&raw, TOKEN_PROGRAM_ID).is_none());
}

#[test]
fn test_null_amount_falls_back_to_token_amount() {
    let ix: crate::chain::ParsedInstruction = serde_json::from_value(json!({
        "programId": TOKEN_PROGRAM_ID,
        "parsed": { "type": "transferChecked", "info": {
            "destination": "dest",
            "amount": null,
            "tokenAmount": { "amount": "1234", "decimals": 9 }
        } }
    }))
    .unwrap();
    assert_eq!(TransferRecord::from_instruction(&ix, TOKEN_PROGRAM_ID).unwrap().amount, 1234);
}

#[test]
fn test_unreadable_amount_counts_as_zero() {
    let ix: crate::chain::ParsedInstruction = serde_json::from_value(json!({
        "programId": TOKEN_PROGRAM_ID,
        "parsed": { "type": "transfer", "info": { "destination": "dest", "amount": "lots" } }
    }))
    .unwrap();
    assert_eq!(TransferRecord::from_instruction(&ix, TOKEN_PROGRAM_ID).unwrap().amount, 0);
}

/// Associated token account of CREATOR_WALLET for RUN_MINT under the SPL
/// Token program.
const CREATOR_RUN_ATA: &str = "F3h7piNFkUPi43xgYmkgLkxiLjrePK27TuaA8Kzd3EKv";

#[test]
fn test_recipient_token_account_is_deterministic() {
    let a = PaymentConfig::run_token().unwrap().recipient_token_account();
    let b = PaymentConfig::run_token().unwrap().recipient_token_account();
    assert_eq!(a, b);
    assert_eq!(a.to_string(), CREATOR_RUN_ATA);
    assert_eq!(validator(MockChain::default()).recipient_token_account(), CREATOR_RUN_ATA);
}

#[test]
fn test_ata_seed_order_matters() {
    let cfg = PaymentConfig::run_token().unwrap();
    let swapped = crate::address::associated_token_address(
        &cfg.mint,
        &cfg.recipient,
        &cfg.token_program,
        &cfg.associated_token_program,
    );
    assert_ne!(swapped.to_string(), CREATOR_RUN_ATA);
}

#[tokio::test]
async fn test_literal_ata_destination_is_accepted() {
    let chain = MockChain::with_tx(SIG, tx(vec![transfer_checked(CREATOR_RUN_ATA, 5)], Value::Null));
    let result = validator(chain).validate(SIG, 5).await.unwrap();
    assert!(result.valid);
}

#[test]
fn test_payment_info() {
    let info = validator(MockChain::default()).payment_info();
    assert_eq!(info.mint, RUN_MINT);
    assert_eq!(info.destination, CREATOR_WALLET);
    assert_eq!(info.symbol, "$RUN");
    assert_eq!(info.decimals, 9);
}

#[test]
fn test_invalid_address_is_config_error() {
    let err = PaymentConfig::new("not-base58-0OIl", CREATOR_WALLET, "$RUN", 9).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
