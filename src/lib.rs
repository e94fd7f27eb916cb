// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! revenant-core: salvage agent memory to an immutable ledger, revive it by
//! id, and verify on-chain token payments.
//!
//! The protocols are plain async functions over injected clients
//! ([`ledger::LedgerWriter`], [`ledger::LedgerReader`], [`chain::ChainQuery`]).
//! Transport, configuration sources and HTTP framing live in `revenant-node`.

pub mod config;
pub mod error;
pub mod payload;
pub mod ledger;
pub mod chain;
pub mod address;
pub mod demo;
pub mod salvage;
pub mod revival;
pub mod payment;

pub use error::{ErrorKind, RevenantError, Result};

#[cfg(test)]
pub mod tests;
