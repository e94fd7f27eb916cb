// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use revenant_core::payment::{PaymentValidator, ValidationResult};

use super::table;

pub async fn run(validator: &PaymentValidator, signature: &str, expected: u64) -> anyhow::Result<ValidationResult> {
    let result = validator.validate(signature.trim(), expected).await?;

    let mut t = table(vec!["Field", "Value"]);
    t.add_row(vec!["Signature", result.signature.as_str()]);
    t.add_row(vec!["Valid", if result.valid { "yes" } else { "no" }]);
    if let Some(amount) = result.amount {
        t.add_row(vec!["Amount", &amount.to_string()]);
    }
    if let Some(block_time) = result.block_time {
        let when = chrono::DateTime::from_timestamp(block_time, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| block_time.to_string());
        t.add_row(vec!["Block time", &when]);
    }
    if let Some(error) = &result.error {
        t.add_row(vec!["Error", error.as_str()]);
    }
    println!("{t}");

    Ok(result)
}
