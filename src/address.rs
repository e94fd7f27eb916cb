// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Address parsing and associated token account derivation.

use solana_pubkey::Pubkey;
use std::str::FromStr;

use crate::error::{RevenantError, Result};

/// Parse a base58 address, naming the setting it came from on failure.
pub fn parse_address(label: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| RevenantError::Config(format!("{} is not a valid address ({}): {:?}", label, value, e)))
}

/// Canonical token account for `(wallet, mint)` under `token_program`.
///
/// Seeds are `[wallet, token_program, mint]` against the associated token
/// account program; the result depends only on those inputs.
pub fn associated_token_address(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
    associated_token_program: &Pubkey,
) -> Pubkey {
    let seeds: &[&[u8]] = &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()];
    let (address, _bump) = Pubkey::find_program_address(seeds, associated_token_program);
    address
}
