// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// Failures surfaced by the salvage, revival and payment protocols.
///
/// A payment that does not match is *not* an error; it is a normal
/// [`ValidationResult`](crate::payment::ValidationResult) with `valid: false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevenantError {
    /// Payload bytes do not decode into a salvage envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    /// Payload decoded but carries a version this build cannot read.
    #[error("Unsupported payload version: {0}")]
    UnsupportedVersion(String),
    /// Ledger rejected the write, or the write never reached it.
    #[error("Ledger write failed: {0}")]
    LedgerWriteFailure(String),
    /// The id could not be read from the ledger.
    #[error("Failed to revive from id {id}: {reason}")]
    RevivalNotFound { id: String, reason: String },
    /// The id was read but its content is unusable.
    #[error("Revived content for id {id} is corrupt: {reason}")]
    RevivalCorrupt { id: String, reason: String },
    /// Transaction fetch failed at the transport level.
    #[error("Chain query failed: {0}")]
    ChainQueryFailure(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Stable discriminant for automated handling. Messages are for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedPayload,
    UnsupportedVersion,
    LedgerWriteFailure,
    RevivalNotFound,
    RevivalCorrupt,
    ChainQueryFailure,
    Config,
}

impl RevenantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RevenantError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            RevenantError::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            RevenantError::LedgerWriteFailure(_) => ErrorKind::LedgerWriteFailure,
            RevenantError::RevivalNotFound { .. } => ErrorKind::RevivalNotFound,
            RevenantError::RevivalCorrupt { .. } => ErrorKind::RevivalCorrupt,
            RevenantError::ChainQueryFailure(_) => ErrorKind::ChainQueryFailure,
            RevenantError::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = core::result::Result<T, RevenantError>;
