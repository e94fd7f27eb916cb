// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs;
use std::path::Path;

use anyhow::Context;
use revenant_core::revival::{generate_spawn_command, Revival, RevivalProtocol};

use super::table;
use crate::files::write_files;

/// File name used for a revived raw-state payload.
pub const RAW_STATE_FILE: &str = "state.raw";

pub async fn run(protocol: &RevivalProtocol, id: &str, out: Option<&Path>) -> anyhow::Result<Revival> {
    let revival = protocol.revive(id.trim()).await?;

    println!(
        "Revived {} ({}), salvaged {}",
        revival.metadata.id,
        revival.status.as_str(),
        revival.state.timestamp.to_rfc3339()
    );
    if let Some(message) = &revival.message {
        println!("Note: {}", message);
    }

    let files = revival.state.files.as_deref().unwrap_or_default();
    if !files.is_empty() {
        let mut t = table(vec!["Path", "Bytes"]);
        for file in files {
            t.add_row(vec![file.path.as_str(), &file.content.len().to_string()]);
        }
        println!("{t}");
    }

    if let Some(out) = out {
        fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
        let written = write_files(out, files)?;
        if let Some(raw) = &revival.state.raw_state {
            let target = out.join(RAW_STATE_FILE);
            fs::write(&target, raw).with_context(|| format!("writing {}", target.display()))?;
        }
        println!("Restored {} file(s) to {}", written.len(), out.display());
    }

    println!("{}", generate_spawn_command(&revival.state));
    Ok(revival)
}
