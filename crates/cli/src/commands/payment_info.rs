// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use revenant_core::payment::{PaymentInfo, PaymentValidator};

use super::table;

pub fn run(validator: &PaymentValidator) -> PaymentInfo {
    let info = validator.payment_info();

    let mut t = table(vec!["Field", "Value"]);
    t.add_row(vec!["Mint", info.mint.as_str()]);
    t.add_row(vec!["Destination", info.destination.as_str()]);
    t.add_row(vec!["Token account", validator.recipient_token_account()]);
    t.add_row(vec!["Symbol", info.symbol.as_str()]);
    t.add_row(vec!["Decimals", &info.decimals.to_string()]);
    println!("{t}");

    info
}
