// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Envelope format written by this build.
pub const PAYLOAD_VERSION: &str = "1.0";

/// Major version accepted on revival.
pub const SUPPORTED_MAJOR_VERSION: u32 = 1;

/// Value of the `source` metadata key and the `App-Name` ledger tag.
pub const SOURCE_TAG: &str = "RevenantBridge";

/// Ledger tag describing what the blob is.
pub const STATE_TYPE_TAG: &str = "AgentState";

/// Ledger tag carrying `blake3:<hex>` of the written bytes.
pub const CONTENT_DIGEST_TAG: &str = "Content-Digest";

/// Prefix shared by every demo-mode identifier.
pub const DEMO_PREFIX: &str = "demo-";

/// $RUN token mint.
pub const RUN_MINT: &str = "GKimKDfu5hCWzg1ioAPnvFrahDeJVDKj2zPxozZ4BAGS";

/// Creator wallet receiving payments.
pub const CREATOR_WALLET: &str = "8QpjoTEmvqB816FeJUNwm6S6Ea5dyhTSKXWDjLM3aCMq";

pub const RUN_SYMBOL: &str = "$RUN";
pub const RUN_DECIMALS: u8 = 9;

/// SPL Token program (not Token-2022).
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJe1bTu";

/// Ledger write statuses treated as accepted.
pub const ACCEPTED_WRITE_STATUSES: [u16; 2] = [200, 202];
